//! Server response parser.
//!
//! Parses the subset of the RFC 3501 response grammar this client actually
//! receives: the greeting, tagged status responses, the `+` continuation,
//! and the untagged CAPABILITY / FLAGS / EXISTS / RECENT / SEARCH / FETCH
//! responses. Input is one complete response as framed by
//! [`FramedStream::read_response`](crate::FramedStream::read_response), so
//! literal octets appear inline right after their `{n}` announcement.
//!
//! Unknown FETCH data items and bracketed response codes are skipped rather
//! than rejected; servers routinely send more than was asked for.

use crate::types::{Flag, Flags, SeqNum};
use crate::{Error, Result};

/// Status word of a tagged or untagged status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Command completed successfully.
    Ok,
    /// Command failed.
    No,
    /// Command was malformed or invalid in this state.
    Bad,
    /// Server is closing the connection.
    Bye,
    /// Connection is pre-authenticated.
    PreAuth,
}

/// Bracketed response code inside a status response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseCode {
    /// Server capabilities announced in the code.
    Capability(Vec<String>),
    /// First unseen message in the selected mailbox.
    Unseen(SeqNum),
    /// A code this client does not interpret.
    Other(String),
}

/// A parsed server response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Tagged completion response.
    Tagged {
        /// Command tag this response answers.
        tag: String,
        /// Completion status.
        status: Status,
        /// Human-readable text.
        text: String,
    },
    /// Untagged (`*`) response.
    Untagged(UntaggedResponse),
    /// Continuation request (`+`), e.g. before literal data.
    Continuation {
        /// Text after the `+`.
        text: String,
    },
}

/// Untagged response data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UntaggedResponse {
    /// `* OK` status, possibly carrying a response code.
    Ok {
        /// Bracketed response code, if any.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// `* NO` status.
    No {
        /// Human-readable text.
        text: String,
    },
    /// `* BAD` status.
    Bad {
        /// Human-readable text.
        text: String,
    },
    /// `* BYE`, the server is disconnecting.
    Bye {
        /// Human-readable text.
        text: String,
    },
    /// `* PREAUTH` greeting.
    PreAuth {
        /// Human-readable text.
        text: String,
    },
    /// `* CAPABILITY` listing.
    Capability(Vec<String>),
    /// `* FLAGS` for the selected mailbox.
    Flags(Flags),
    /// `* n EXISTS`.
    Exists(u32),
    /// `* n RECENT`.
    Recent(u32),
    /// `* SEARCH` result listing.
    Search(Vec<SeqNum>),
    /// `* n FETCH` data.
    Fetch {
        /// Sequence number of the message.
        seq: SeqNum,
        /// Data items returned for the message.
        items: Vec<FetchItem>,
    },
}

/// A single FETCH data item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchItem {
    /// FLAGS item.
    Flags(Flags),
    /// INTERNALDATE item (kept as the server's string form).
    InternalDate(String),
    /// RFC822.SIZE item.
    Rfc822Size(u32),
    /// BODY[section] item; `data` is `None` when the server sent NIL.
    Body {
        /// Section specifier between the brackets (empty for the whole
        /// message).
        section: String,
        /// Raw message octets.
        data: Option<Vec<u8>>,
    },
}

/// Response parser entry point.
pub struct ResponseParser;

impl ResponseParser {
    /// Parses a single complete response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the input does not match the supported
    /// grammar.
    pub fn parse(input: &[u8]) -> Result<Response> {
        let mut cur = Cursor::new(input);
        match cur.peek() {
            Some(b'*') => {
                cur.advance();
                cur.expect_space()?;
                parse_untagged(&mut cur).map(Response::Untagged)
            }
            Some(b'+') => {
                cur.advance();
                if cur.peek() == Some(b' ') {
                    cur.advance();
                }
                Ok(Response::Continuation {
                    text: cur.read_text(),
                })
            }
            Some(_) => parse_tagged(&mut cur),
            None => Err(Error::Parse {
                position: 0,
                message: "empty response".to_string(),
            }),
        }
    }
}

fn parse_tagged(cur: &mut Cursor<'_>) -> Result<Response> {
    let tag = cur.read_atom()?.to_string();
    cur.expect_space()?;
    let status = parse_status(cur)?;
    if cur.peek() == Some(b' ') {
        cur.advance();
    }
    let (_code, text) = parse_resp_text(cur)?;
    Ok(Response::Tagged { tag, status, text })
}

fn parse_status(cur: &mut Cursor<'_>) -> Result<Status> {
    let word = cur.read_atom()?;
    match word.to_ascii_uppercase().as_str() {
        "OK" => Ok(Status::Ok),
        "NO" => Ok(Status::No),
        "BAD" => Ok(Status::Bad),
        "BYE" => Ok(Status::Bye),
        "PREAUTH" => Ok(Status::PreAuth),
        other => Err(cur.error(&format!("unknown status: {other}"))),
    }
}

fn parse_untagged(cur: &mut Cursor<'_>) -> Result<UntaggedResponse> {
    if cur.peek().is_some_and(|b| b.is_ascii_digit()) {
        let n = cur.read_number()?;
        cur.expect_space()?;
        let word = cur.read_atom()?.to_ascii_uppercase();
        return match word.as_str() {
            "EXISTS" => Ok(UntaggedResponse::Exists(n)),
            "RECENT" => Ok(UntaggedResponse::Recent(n)),
            "FETCH" => {
                let seq =
                    SeqNum::new(n).ok_or_else(|| cur.error("FETCH sequence number is zero"))?;
                cur.expect_space()?;
                let items = parse_fetch_items(cur)?;
                Ok(UntaggedResponse::Fetch { seq, items })
            }
            other => Err(cur.error(&format!("unsupported message-status response: {other}"))),
        };
    }

    let word = cur.read_atom()?.to_ascii_uppercase();
    match word.as_str() {
        "OK" => {
            if cur.peek() == Some(b' ') {
                cur.advance();
            }
            let (code, text) = parse_resp_text(cur)?;
            Ok(UntaggedResponse::Ok { code, text })
        }
        "NO" => {
            if cur.peek() == Some(b' ') {
                cur.advance();
            }
            let (_code, text) = parse_resp_text(cur)?;
            Ok(UntaggedResponse::No { text })
        }
        "BAD" => {
            if cur.peek() == Some(b' ') {
                cur.advance();
            }
            let (_code, text) = parse_resp_text(cur)?;
            Ok(UntaggedResponse::Bad { text })
        }
        "BYE" => {
            if cur.peek() == Some(b' ') {
                cur.advance();
            }
            let (_code, text) = parse_resp_text(cur)?;
            Ok(UntaggedResponse::Bye { text })
        }
        "PREAUTH" => {
            if cur.peek() == Some(b' ') {
                cur.advance();
            }
            let (_code, text) = parse_resp_text(cur)?;
            Ok(UntaggedResponse::PreAuth { text })
        }
        "CAPABILITY" => {
            let mut caps = Vec::new();
            while cur.peek() == Some(b' ') {
                cur.advance();
                caps.push(cur.read_atom()?.to_string());
            }
            Ok(UntaggedResponse::Capability(caps))
        }
        "FLAGS" => {
            cur.expect_space()?;
            parse_flag_list(cur).map(UntaggedResponse::Flags)
        }
        "SEARCH" => {
            let mut seqs = Vec::new();
            while cur.peek() == Some(b' ') {
                cur.advance();
                if !cur.peek().is_some_and(|b| b.is_ascii_digit()) {
                    break;
                }
                let n = cur.read_number()?;
                let seq =
                    SeqNum::new(n).ok_or_else(|| cur.error("SEARCH result contains zero"))?;
                seqs.push(seq);
            }
            Ok(UntaggedResponse::Search(seqs))
        }
        other => Err(cur.error(&format!("unsupported untagged response: {other}"))),
    }
}

/// Parses resp-text: an optional bracketed code followed by free text.
fn parse_resp_text(cur: &mut Cursor<'_>) -> Result<(Option<ResponseCode>, String)> {
    let code = if cur.peek() == Some(b'[') {
        cur.advance();
        let code = parse_resp_code(cur)?;
        cur.expect(b']')?;
        if cur.peek() == Some(b' ') {
            cur.advance();
        }
        Some(code)
    } else {
        None
    };
    Ok((code, cur.read_text()))
}

fn parse_resp_code(cur: &mut Cursor<'_>) -> Result<ResponseCode> {
    let name = cur.read_atom()?.to_ascii_uppercase();
    match name.as_str() {
        "CAPABILITY" => {
            let mut caps = Vec::new();
            while cur.peek() == Some(b' ') {
                cur.advance();
                caps.push(cur.read_atom()?.to_string());
            }
            Ok(ResponseCode::Capability(caps))
        }
        "UNSEEN" => {
            cur.expect_space()?;
            let n = cur.read_number()?;
            let seq = SeqNum::new(n).ok_or_else(|| cur.error("UNSEEN code contains zero"))?;
            Ok(ResponseCode::Unseen(seq))
        }
        _ => {
            // Keep the full code text but do not interpret it
            let mut raw = name;
            while let Some(b) = cur.peek() {
                if b == b']' || b == b'\r' {
                    break;
                }
                cur.advance();
                raw.push(char::from(b));
            }
            Ok(ResponseCode::Other(raw))
        }
    }
}

fn parse_flag_list(cur: &mut Cursor<'_>) -> Result<Flags> {
    cur.expect(b'(')?;
    let mut flags = Flags::new();
    loop {
        match cur.peek() {
            Some(b')') => {
                cur.advance();
                break;
            }
            Some(b' ') => {
                cur.advance();
            }
            Some(_) => flags.insert(Flag::parse(cur.read_atom()?)),
            None => return Err(cur.error("unterminated flag list")),
        }
    }
    Ok(flags)
}

fn parse_fetch_items(cur: &mut Cursor<'_>) -> Result<Vec<FetchItem>> {
    cur.expect(b'(')?;
    let mut items = Vec::new();
    loop {
        match cur.peek() {
            Some(b')') => {
                cur.advance();
                break;
            }
            Some(b' ') => {
                cur.advance();
            }
            Some(_) => items.extend(parse_fetch_item(cur)?),
            None => return Err(cur.error("unterminated FETCH item list")),
        }
    }
    Ok(items)
}

/// Parses one FETCH data item; returns `None` for items this client skips.
fn parse_fetch_item(cur: &mut Cursor<'_>) -> Result<Option<FetchItem>> {
    let name = cur.read_atom()?.to_ascii_uppercase();
    match name.as_str() {
        "FLAGS" => {
            cur.expect_space()?;
            parse_flag_list(cur).map(|f| Some(FetchItem::Flags(f)))
        }
        "INTERNALDATE" => {
            cur.expect_space()?;
            let date = cur.read_quoted()?;
            Ok(Some(FetchItem::InternalDate(date)))
        }
        "RFC822.SIZE" => {
            cur.expect_space()?;
            cur.read_number().map(|n| Some(FetchItem::Rfc822Size(n)))
        }
        "BODY" => {
            cur.expect(b'[')?;
            let mut section = String::new();
            while let Some(b) = cur.peek() {
                if b == b']' {
                    break;
                }
                cur.advance();
                section.push(char::from(b));
            }
            cur.expect(b']')?;
            cur.expect_space()?;
            let data = match cur.peek() {
                Some(b'{') => Some(cur.read_literal()?),
                Some(b'"') => Some(cur.read_quoted()?.into_bytes()),
                _ => {
                    let atom = cur.read_atom()?;
                    if atom.eq_ignore_ascii_case("NIL") {
                        None
                    } else {
                        return Err(cur.error("expected literal, quoted string, or NIL"));
                    }
                }
            };
            Ok(Some(FetchItem::Body { section, data }))
        }
        _ => {
            // Item we did not ask for (UID, MODSEQ, ...): skip its value
            if cur.peek() == Some(b' ') {
                cur.advance();
                cur.skip_value()?;
            }
            Ok(None)
        }
    }
}

/// Byte cursor over a single response.
struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    const fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn error(&self, message: &str) -> Error {
        Error::Parse {
            position: self.pos,
            message: message.to_string(),
        }
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        match self.advance() {
            Some(b) if b == expected => Ok(()),
            _ => Err(self.error(&format!("expected {:?}", char::from(expected)))),
        }
    }

    fn expect_space(&mut self) -> Result<()> {
        self.expect(b' ')
    }

    /// Reads an atom: any run of bytes up to a delimiter.
    fn read_atom(&mut self) -> Result<&'a str> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if is_atom_byte(b) {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.error("expected atom"));
        }
        std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| self.error("atom is not valid UTF-8"))
    }

    fn read_number(&mut self) -> Result<u32> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected number"));
        }
        std::str::from_utf8(&self.input[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| self.error("number out of range"))
    }

    /// Reads a quoted string, processing `\"` and `\\` escapes.
    fn read_quoted(&mut self) -> Result<String> {
        self.expect(b'"')?;
        let mut out = Vec::new();
        loop {
            match self.advance() {
                Some(b'"') => break,
                Some(b'\\') => match self.advance() {
                    Some(b @ (b'"' | b'\\')) => out.push(b),
                    _ => return Err(self.error("invalid escape in quoted string")),
                },
                Some(b) => out.push(b),
                None => return Err(self.error("unterminated quoted string")),
            }
        }
        String::from_utf8(out).map_err(|_| self.error("quoted string is not valid UTF-8"))
    }

    /// Reads a `{n}` literal announcement plus the n octets that follow it.
    fn read_literal(&mut self) -> Result<Vec<u8>> {
        self.expect(b'{')?;
        let len = self.read_number()? as usize;
        if self.peek() == Some(b'+') {
            self.advance();
        }
        self.expect(b'}')?;
        self.expect(b'\r')?;
        self.expect(b'\n')?;
        if self.pos + len > self.input.len() {
            return Err(self.error("literal data truncated"));
        }
        let data = self.input[self.pos..self.pos + len].to_vec();
        self.pos += len;
        Ok(data)
    }

    /// Returns the rest of the line with the trailing CRLF stripped.
    fn read_text(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'\r' {
                break;
            }
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    /// Skips one value of any supported shape (for unrequested FETCH items).
    fn skip_value(&mut self) -> Result<()> {
        match self.peek() {
            Some(b'(') => {
                let mut depth = 0usize;
                loop {
                    match self.advance() {
                        Some(b'(') => depth += 1,
                        Some(b')') => {
                            depth -= 1;
                            if depth == 0 {
                                return Ok(());
                            }
                        }
                        Some(b'"') => {
                            self.pos -= 1;
                            self.read_quoted()?;
                        }
                        Some(_) => {}
                        None => return Err(self.error("unterminated parenthesized value")),
                    }
                }
            }
            Some(b'"') => self.read_quoted().map(|_| ()),
            Some(b'{') => self.read_literal().map(|_| ()),
            _ => self.read_atom().map(|_| ()),
        }
    }
}

const fn is_atom_byte(b: u8) -> bool {
    !matches!(b, b' ' | b'(' | b')' | b'[' | b']' | b'{' | b'"' | b'\r' | b'\n') && b > 0x1F
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_greeting_with_capability_code() {
        let response =
            ResponseParser::parse(b"* OK [CAPABILITY IMAP4rev1 STARTTLS LOGINDISABLED] ready\r\n")
                .unwrap();
        let Response::Untagged(UntaggedResponse::Ok { code, text }) = response else {
            panic!("expected untagged OK");
        };
        assert_eq!(
            code,
            Some(ResponseCode::Capability(vec![
                "IMAP4rev1".to_string(),
                "STARTTLS".to_string(),
                "LOGINDISABLED".to_string(),
            ]))
        );
        assert_eq!(text, "ready");
    }

    #[test]
    fn parse_plain_greeting() {
        let response = ResponseParser::parse(b"* OK Dovecot ready.\r\n").unwrap();
        assert_eq!(
            response,
            Response::Untagged(UntaggedResponse::Ok {
                code: None,
                text: "Dovecot ready.".to_string(),
            })
        );
    }

    #[test]
    fn parse_bye_greeting() {
        let response = ResponseParser::parse(b"* BYE server shutting down\r\n").unwrap();
        assert_eq!(
            response,
            Response::Untagged(UntaggedResponse::Bye {
                text: "server shutting down".to_string(),
            })
        );
    }

    #[test]
    fn parse_tagged_ok() {
        let response = ResponseParser::parse(b"A0001 OK LOGIN completed\r\n").unwrap();
        assert_eq!(
            response,
            Response::Tagged {
                tag: "A0001".to_string(),
                status: Status::Ok,
                text: "LOGIN completed".to_string(),
            }
        );
    }

    #[test]
    fn parse_tagged_no_with_code() {
        let response =
            ResponseParser::parse(b"A0002 NO [AUTHENTICATIONFAILED] Invalid credentials\r\n")
                .unwrap();
        assert_eq!(
            response,
            Response::Tagged {
                tag: "A0002".to_string(),
                status: Status::No,
                text: "Invalid credentials".to_string(),
            }
        );
    }

    #[test]
    fn parse_continuation() {
        let response = ResponseParser::parse(b"+ Ready for literal data\r\n").unwrap();
        assert_eq!(
            response,
            Response::Continuation {
                text: "Ready for literal data".to_string(),
            }
        );
    }

    #[test]
    fn parse_capability() {
        let response = ResponseParser::parse(b"* CAPABILITY IMAP4rev1 IDLE\r\n").unwrap();
        assert_eq!(
            response,
            Response::Untagged(UntaggedResponse::Capability(vec![
                "IMAP4rev1".to_string(),
                "IDLE".to_string(),
            ]))
        );
    }

    #[test]
    fn parse_exists_and_recent() {
        assert_eq!(
            ResponseParser::parse(b"* 23 EXISTS\r\n").unwrap(),
            Response::Untagged(UntaggedResponse::Exists(23))
        );
        assert_eq!(
            ResponseParser::parse(b"* 2 RECENT\r\n").unwrap(),
            Response::Untagged(UntaggedResponse::Recent(2))
        );
    }

    #[test]
    fn parse_mailbox_flags() {
        let response =
            ResponseParser::parse(b"* FLAGS (\\Answered \\Flagged \\Seen)\r\n").unwrap();
        let Response::Untagged(UntaggedResponse::Flags(flags)) = response else {
            panic!("expected FLAGS");
        };
        assert_eq!(flags.len(), 3);
        assert!(flags.contains(&Flag::Seen));
    }

    #[test]
    fn parse_unseen_code() {
        let response = ResponseParser::parse(b"* OK [UNSEEN 12] Message 12 is first unseen\r\n")
            .unwrap();
        let Response::Untagged(UntaggedResponse::Ok { code, .. }) = response else {
            panic!("expected untagged OK");
        };
        assert_eq!(code, Some(ResponseCode::Unseen(SeqNum::new(12).unwrap())));
    }

    #[test]
    fn parse_unknown_code_is_opaque() {
        let response =
            ResponseParser::parse(b"* OK [PERMANENTFLAGS (\\Seen \\Draft)] Limited\r\n").unwrap();
        let Response::Untagged(UntaggedResponse::Ok { code, text }) = response else {
            panic!("expected untagged OK");
        };
        assert!(matches!(code, Some(ResponseCode::Other(_))));
        assert_eq!(text, "Limited");
    }

    #[test]
    fn parse_search_results() {
        let response = ResponseParser::parse(b"* SEARCH 2 5 9\r\n").unwrap();
        let Response::Untagged(UntaggedResponse::Search(seqs)) = response else {
            panic!("expected SEARCH");
        };
        let values: Vec<u32> = seqs.iter().map(|s| s.get()).collect();
        assert_eq!(values, vec![2, 5, 9]);
    }

    #[test]
    fn parse_empty_search() {
        let response = ResponseParser::parse(b"* SEARCH\r\n").unwrap();
        assert_eq!(
            response,
            Response::Untagged(UntaggedResponse::Search(vec![]))
        );
    }

    #[test]
    fn parse_fetch_with_body_literal() {
        let response =
            ResponseParser::parse(b"* 1 FETCH (BODY[] {5}\r\nhello)\r\n").unwrap();
        let Response::Untagged(UntaggedResponse::Fetch { seq, items }) = response else {
            panic!("expected FETCH");
        };
        assert_eq!(seq.get(), 1);
        assert_eq!(
            items,
            vec![FetchItem::Body {
                section: String::new(),
                data: Some(b"hello".to_vec()),
            }]
        );
    }

    #[test]
    fn parse_fetch_with_flags_and_body() {
        let response = ResponseParser::parse(
            b"* 7 FETCH (FLAGS (\\Seen) BODY[] {3}\r\nabc)\r\n",
        )
        .unwrap();
        let Response::Untagged(UntaggedResponse::Fetch { seq, items }) = response else {
            panic!("expected FETCH");
        };
        assert_eq!(seq.get(), 7);
        assert_eq!(items.len(), 2);
        assert!(matches!(&items[0], FetchItem::Flags(f) if f.is_seen()));
        assert!(
            matches!(&items[1], FetchItem::Body { data: Some(d), .. } if d.as_slice() == b"abc")
        );
    }

    #[test]
    fn parse_fetch_nil_body() {
        let response = ResponseParser::parse(b"* 3 FETCH (BODY[] NIL)\r\n").unwrap();
        let Response::Untagged(UntaggedResponse::Fetch { items, .. }) = response else {
            panic!("expected FETCH");
        };
        assert_eq!(
            items,
            vec![FetchItem::Body {
                section: String::new(),
                data: None,
            }]
        );
    }

    #[test]
    fn parse_fetch_skips_unrequested_items() {
        let response = ResponseParser::parse(
            b"* 4 FETCH (UID 991 RFC822.SIZE 120 BODY[] {2}\r\nhi)\r\n",
        )
        .unwrap();
        let Response::Untagged(UntaggedResponse::Fetch { items, .. }) = response else {
            panic!("expected FETCH");
        };
        // UID is skipped, RFC822.SIZE and BODY[] survive
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], FetchItem::Rfc822Size(120)));
    }

    #[test]
    fn parse_fetch_internaldate() {
        let response = ResponseParser::parse(
            b"* 2 FETCH (INTERNALDATE \"24-Aug-2026 10:00:00 +0000\")\r\n",
        )
        .unwrap();
        let Response::Untagged(UntaggedResponse::Fetch { items, .. }) = response else {
            panic!("expected FETCH");
        };
        assert_eq!(
            items,
            vec![FetchItem::InternalDate(
                "24-Aug-2026 10:00:00 +0000".to_string()
            )]
        );
    }

    #[test]
    fn parse_fetch_literal_with_crlf_inside() {
        let raw = b"* 9 FETCH (BODY[] {14}\r\nline1\r\nline2\r\n)\r\n";
        let response = ResponseParser::parse(raw).unwrap();
        let Response::Untagged(UntaggedResponse::Fetch { items, .. }) = response else {
            panic!("expected FETCH");
        };
        assert!(matches!(
            &items[0],
            FetchItem::Body { data: Some(d), .. } if d.as_slice() == b"line1\r\nline2\r\n"
        ));
    }

    #[test]
    fn truncated_literal_is_error() {
        let result = ResponseParser::parse(b"* 1 FETCH (BODY[] {100}\r\nshort)\r\n");
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn zero_sequence_number_is_error() {
        let result = ResponseParser::parse(b"* 0 FETCH (FLAGS ())\r\n");
        assert!(result.is_err());
    }

    #[test]
    fn empty_input_is_error() {
        assert!(ResponseParser::parse(b"").is_err());
    }
}
