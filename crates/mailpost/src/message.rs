//! Decoding fetched messages into a displayable form.

use thiserror::Error;

use mailpost_imap::SeqNum;

/// Per-message cap on how much body is kept after decoding.
pub const MAX_BODY_BYTES: usize = 4096;

/// Errors raised while decoding a fetched message.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The server returned no octets for the message.
    #[error("message is empty")]
    Empty,
    /// A header line is neither `name: value` nor a folded continuation.
    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),
}

/// One decoded message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    /// Sequence number the message was fetched under.
    pub seq: SeqNum,
    /// Sender, from the `From` header if present.
    pub from: Option<String>,
    /// Recipient, from the `To` header if present.
    pub to: Option<String>,
    /// Subject line, if present.
    pub subject: Option<String>,
    /// Body octets, capped at [`MAX_BODY_BYTES`].
    pub body: Vec<u8>,
}

impl Email {
    /// Decodes a raw RFC 5322 message.
    ///
    /// Headers are split from the body at the first blank line; folded
    /// header lines are unfolded. The body is truncated to
    /// [`MAX_BODY_BYTES`] octets. A message without a blank line is treated
    /// as headers only.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] for an empty message or a header line that
    /// cannot be parsed.
    pub fn decode(seq: SeqNum, raw: &[u8]) -> Result<Self, DecodeError> {
        if raw.is_empty() {
            return Err(DecodeError::Empty);
        }

        let (header_bytes, body) = split_at_blank_line(raw);
        let headers = parse_headers(header_bytes)?;

        let find = |name: &str| {
            headers
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone())
        };

        let mut body = body.to_vec();
        body.truncate(MAX_BODY_BYTES);

        Ok(Self {
            seq,
            from: find("From"),
            to: find("To"),
            subject: find("Subject"),
            body,
        })
    }

    /// Body rendered as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Splits a message at the first blank line (CRLF CRLF, or bare LF LF).
fn split_at_blank_line(raw: &[u8]) -> (&[u8], &[u8]) {
    if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
        (&raw[..pos], &raw[pos + 4..])
    } else if let Some(pos) = raw.windows(2).position(|w| w == b"\n\n") {
        (&raw[..pos], &raw[pos + 2..])
    } else {
        (raw, &[])
    }
}

/// Parses header lines, unfolding continuations onto the previous header.
fn parse_headers(bytes: &[u8]) -> Result<Vec<(String, String)>, DecodeError> {
    let text = String::from_utf8_lossy(bytes);
    let mut headers: Vec<(String, String)> = Vec::new();

    for line in text.lines() {
        if line.is_empty() {
            continue;
        }
        if line.starts_with(' ') || line.starts_with('\t') {
            // Folded continuation of the previous header
            match headers.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(line.trim_start());
                }
                None => return Err(DecodeError::MalformedHeader(line.to_string())),
            }
            continue;
        }
        match line.split_once(':') {
            Some((name, value)) => {
                headers.push((name.trim().to_string(), value.trim().to_string()));
            }
            None => return Err(DecodeError::MalformedHeader(line.to_string())),
        }
    }

    Ok(headers)
}
