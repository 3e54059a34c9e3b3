//! IMAP command builder.
//!
//! Commands are serialized to their exact wire form with a caller-supplied
//! tag. APPEND is special: [`Command::serialize`] produces only the command
//! line announcing the literal; the message octets are written by the client
//! after the server's continuation response.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, FixedOffset};

use crate::types::{Flag, Mailbox, SequenceSet};

/// Format for the INTERNALDATE argument of APPEND (RFC 3501 date-time).
const INTERNAL_DATE_FORMAT: &str = "%d-%b-%Y %H:%M:%S %z";

/// IMAP command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// CAPABILITY command.
    Capability,
    /// NOOP command.
    Noop,
    /// LOGOUT command.
    Logout,
    /// STARTTLS command.
    StartTls,
    /// LOGIN command.
    Login {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
    /// SELECT command (read-write).
    Select {
        /// Mailbox to select.
        mailbox: Mailbox,
    },
    /// EXAMINE command (read-only SELECT).
    Examine {
        /// Mailbox to examine.
        mailbox: Mailbox,
    },
    /// SEARCH command.
    Search {
        /// Search criteria.
        criteria: SearchCriteria,
    },
    /// FETCH command.
    Fetch {
        /// Sequence set.
        sequence: SequenceSet,
        /// Items to fetch.
        items: FetchItems,
    },
    /// APPEND command line (literal data follows after continuation).
    Append {
        /// Target mailbox.
        mailbox: Mailbox,
        /// Flags to set on the stored message.
        flags: Vec<Flag>,
        /// Internal date to record for the message.
        date: DateTime<FixedOffset>,
        /// Size of the message literal in octets.
        size: usize,
    },
}

impl Command {
    /// Serializes the command to wire bytes with the given tag.
    #[must_use]
    pub fn serialize(&self, tag: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(tag.as_bytes());
        buf.push(b' ');

        match self {
            Self::Capability => buf.extend_from_slice(b"CAPABILITY"),
            Self::Noop => buf.extend_from_slice(b"NOOP"),
            Self::Logout => buf.extend_from_slice(b"LOGOUT"),
            Self::StartTls => buf.extend_from_slice(b"STARTTLS"),

            Self::Login { username, password } => {
                buf.extend_from_slice(b"LOGIN ");
                write_astring(&mut buf, username);
                buf.push(b' ');
                write_astring(&mut buf, password);
            }

            Self::Select { mailbox } => {
                buf.extend_from_slice(b"SELECT ");
                write_astring(&mut buf, mailbox.as_str());
            }

            Self::Examine { mailbox } => {
                buf.extend_from_slice(b"EXAMINE ");
                write_astring(&mut buf, mailbox.as_str());
            }

            Self::Search { criteria } => {
                buf.extend_from_slice(b"SEARCH ");
                criteria.write(&mut buf);
            }

            Self::Fetch { sequence, items } => {
                buf.extend_from_slice(b"FETCH ");
                buf.extend_from_slice(sequence.to_string().as_bytes());
                buf.push(b' ');
                items.write(&mut buf);
            }

            Self::Append {
                mailbox,
                flags,
                date,
                size,
            } => {
                buf.extend_from_slice(b"APPEND ");
                write_astring(&mut buf, mailbox.as_str());
                if !flags.is_empty() {
                    buf.extend_from_slice(b" (");
                    for (i, flag) in flags.iter().enumerate() {
                        if i > 0 {
                            buf.push(b' ');
                        }
                        buf.extend_from_slice(flag.as_str().as_bytes());
                    }
                    buf.push(b')');
                }
                let stamp = date.format(INTERNAL_DATE_FORMAT);
                buf.extend_from_slice(format!(" \"{stamp}\" {{{size}}}").as_bytes());
            }
        }

        buf.extend_from_slice(b"\r\n");
        buf
    }
}

/// SEARCH criteria.
///
/// This client searches by the absence of a flag (e.g. messages not yet
/// seen); `All` matches every message in the mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriteria {
    /// All messages.
    All,
    /// Messages that do not carry the given flag.
    WithoutFlag(Flag),
}

impl SearchCriteria {
    fn write(&self, buf: &mut Vec<u8>) {
        match self {
            Self::All => buf.extend_from_slice(b"ALL"),
            Self::WithoutFlag(flag) => match flag {
                Flag::Seen => buf.extend_from_slice(b"UNSEEN"),
                Flag::Answered => buf.extend_from_slice(b"UNANSWERED"),
                Flag::Flagged => buf.extend_from_slice(b"UNFLAGGED"),
                Flag::Deleted => buf.extend_from_slice(b"UNDELETED"),
                Flag::Draft => buf.extend_from_slice(b"UNDRAFT"),
                // OLD is the RFC 3501 spelling of "not \Recent"
                Flag::Recent => buf.extend_from_slice(b"OLD"),
                Flag::Keyword(name) => {
                    buf.extend_from_slice(b"UNKEYWORD ");
                    write_astring(buf, name);
                }
            },
        }
    }
}

/// Items to request in a FETCH command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchItems {
    /// FAST macro (FLAGS INTERNALDATE RFC822.SIZE).
    Fast,
    /// Explicit list of attributes.
    Items(Vec<FetchAttribute>),
}

impl FetchItems {
    /// The full message body, marking it seen on servers that do so.
    #[must_use]
    pub fn body() -> Self {
        Self::Items(vec![FetchAttribute::Body { peek: false }])
    }

    fn write(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Fast => buf.extend_from_slice(b"FAST"),
            Self::Items(attrs) => {
                if let [single] = attrs.as_slice() {
                    single.write(buf);
                } else {
                    buf.push(b'(');
                    for (i, attr) in attrs.iter().enumerate() {
                        if i > 0 {
                            buf.push(b' ');
                        }
                        attr.write(buf);
                    }
                    buf.push(b')');
                }
            }
        }
    }
}

/// A single FETCH attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchAttribute {
    /// Message flags.
    Flags,
    /// Server-recorded internal date.
    InternalDate,
    /// Message size in octets.
    Rfc822Size,
    /// Full message body (`BODY[]`), or `BODY.PEEK[]` to leave flags alone.
    Body {
        /// Use BODY.PEEK to avoid setting `\Seen`.
        peek: bool,
    },
}

impl FetchAttribute {
    fn write(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Flags => buf.extend_from_slice(b"FLAGS"),
            Self::InternalDate => buf.extend_from_slice(b"INTERNALDATE"),
            Self::Rfc822Size => buf.extend_from_slice(b"RFC822.SIZE"),
            Self::Body { peek } => {
                if *peek {
                    buf.extend_from_slice(b"BODY.PEEK[]");
                } else {
                    buf.extend_from_slice(b"BODY[]");
                }
            }
        }
    }
}

/// Writes an astring (atom or quoted string).
pub(crate) fn write_astring(buf: &mut Vec<u8>, s: &str) {
    if s.is_empty() || s.bytes().any(needs_quoting) {
        buf.push(b'"');
        for b in s.bytes() {
            if b == b'"' || b == b'\\' {
                buf.push(b'\\');
            }
            buf.push(b);
        }
        buf.push(b'"');
    } else {
        buf.extend_from_slice(s.as_bytes());
    }
}

/// Returns true if the byte needs quoting.
const fn needs_quoting(b: u8) -> bool {
    matches!(b, b' ' | b'"' | b'\\' | b'(' | b')' | b'{' | b'%' | b'*') || b < 0x20 || b == 0x7F
}

/// Tag generator for IMAP commands.
///
/// Generates unique sequential tags in the format "A0000", "A0001", etc.
#[derive(Debug)]
pub struct TagGenerator {
    counter: AtomicU32,
    prefix: char,
}

impl TagGenerator {
    /// Creates a new tag generator with the given prefix.
    #[must_use]
    pub const fn new(prefix: char) -> Self {
        Self {
            counter: AtomicU32::new(0),
            prefix,
        }
    }

    /// Generates the next tag.
    ///
    /// # Panics
    ///
    /// Panics if the tag counter would overflow `u32::MAX`, which would
    /// require 4+ billion commands on one session.
    #[must_use]
    pub fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        assert!(n != u32::MAX, "tag counter overflow");
        format!("{}{:04}", self.prefix, n)
    }
}

impl Default for TagGenerator {
    fn default() -> Self {
        Self::new('A')
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn serialize_capability() {
        assert_eq!(Command::Capability.serialize("A0000"), b"A0000 CAPABILITY\r\n");
    }

    #[test]
    fn serialize_starttls() {
        assert_eq!(Command::StartTls.serialize("A0001"), b"A0001 STARTTLS\r\n");
    }

    #[test]
    fn serialize_login_plain() {
        let cmd = Command::Login {
            username: "user".to_string(),
            password: "pass".to_string(),
        };
        assert_eq!(cmd.serialize("A0002"), b"A0002 LOGIN user pass\r\n");
    }

    #[test]
    fn serialize_login_quotes_specials() {
        let cmd = Command::Login {
            username: "user@example.com".to_string(),
            password: "p\"a ss".to_string(),
        };
        assert_eq!(
            cmd.serialize("A0003"),
            b"A0003 LOGIN user@example.com \"p\\\"a ss\"\r\n"
        );
    }

    #[test]
    fn serialize_select() {
        let cmd = Command::Select {
            mailbox: Mailbox::inbox(),
        };
        assert_eq!(cmd.serialize("A0004"), b"A0004 SELECT INBOX\r\n");
    }

    #[test]
    fn serialize_examine_quotes_space() {
        let cmd = Command::Examine {
            mailbox: Mailbox::new("Sent Items"),
        };
        assert_eq!(cmd.serialize("A0005"), b"A0005 EXAMINE \"Sent Items\"\r\n");
    }

    #[test]
    fn serialize_search_unseen() {
        let cmd = Command::Search {
            criteria: SearchCriteria::WithoutFlag(Flag::Seen),
        };
        assert_eq!(cmd.serialize("A0006"), b"A0006 SEARCH UNSEEN\r\n");
    }

    #[test]
    fn serialize_search_unkeyword() {
        let cmd = Command::Search {
            criteria: SearchCriteria::WithoutFlag(Flag::Keyword("$Junk".to_string())),
        };
        assert_eq!(cmd.serialize("A0007"), b"A0007 SEARCH UNKEYWORD $Junk\r\n");
    }

    #[test]
    fn serialize_fetch_body() {
        let cmd = Command::Fetch {
            sequence: SequenceSet::range(1, 3).unwrap(),
            items: FetchItems::body(),
        };
        assert_eq!(cmd.serialize("A0008"), b"A0008 FETCH 1:3 BODY[]\r\n");
    }

    #[test]
    fn serialize_fetch_multiple_items() {
        let cmd = Command::Fetch {
            sequence: SequenceSet::single(2).unwrap(),
            items: FetchItems::Items(vec![
                FetchAttribute::Flags,
                FetchAttribute::Body { peek: true },
            ]),
        };
        assert_eq!(
            cmd.serialize("A0009"),
            b"A0009 FETCH 2 (FLAGS BODY.PEEK[])\r\n"
        );
    }

    #[test]
    fn serialize_append() {
        let date = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 8, 24, 10, 30, 0)
            .unwrap();
        let cmd = Command::Append {
            mailbox: Mailbox::new("Drafts"),
            flags: vec![Flag::Draft],
            date,
            size: 42,
        };
        assert_eq!(
            cmd.serialize("A0010"),
            b"A0010 APPEND Drafts (\\Draft) \"24-Aug-2026 10:30:00 +0000\" {42}\r\n"
        );
    }

    #[test]
    fn serialize_append_no_flags() {
        let date = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
            .unwrap();
        let cmd = Command::Append {
            mailbox: Mailbox::inbox(),
            flags: vec![],
            date,
            size: 7,
        };
        assert_eq!(
            cmd.serialize("A0011"),
            b"A0011 APPEND INBOX \"02-Jan-2026 03:04:05 +0100\" {7}\r\n"
        );
    }

    #[test]
    fn tag_generation() {
        let generator = TagGenerator::default();
        assert_eq!(generator.next(), "A0000");
        assert_eq!(generator.next(), "A0001");
        assert_eq!(generator.next(), "A0002");
    }

    #[test]
    fn tag_custom_prefix() {
        let generator = TagGenerator::new('T');
        assert_eq!(generator.next(), "T0000");
    }

    fn unquote(bytes: &[u8]) -> String {
        if bytes.first() != Some(&b'"') {
            return String::from_utf8(bytes.to_vec()).unwrap();
        }
        let inner = &bytes[1..bytes.len() - 1];
        let mut out = Vec::new();
        let mut escaped = false;
        for &b in inner {
            if escaped {
                out.push(b);
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else {
                out.push(b);
            }
        }
        String::from_utf8(out).unwrap()
    }

    proptest! {
        #[test]
        fn astring_round_trips(s in "[ -~]*") {
            let mut buf = Vec::new();
            write_astring(&mut buf, &s);
            prop_assert_eq!(unquote(&buf), s);
        }

        #[test]
        fn astring_never_embeds_crlf(s in "[ -~]*") {
            let mut buf = Vec::new();
            write_astring(&mut buf, &s);
            prop_assert!(!buf.windows(2).any(|w| w == b"\r\n"));
        }
    }
}
