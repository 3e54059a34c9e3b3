//! Draft message composition.

/// A draft message, composed locally and filed to the server via APPEND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    from: String,
    to: String,
    subject: String,
    body: String,
}

impl Draft {
    /// Starts a draft between two addresses with an empty subject and body.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: String::new(),
            body: String::new(),
        }
    }

    /// Sets the subject line.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Sets the body text.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Serializes the draft as an RFC 5322 message.
    ///
    /// Exactly three headers are written, in order: `From`, `To`,
    /// `Subject`. Lines are CRLF-terminated and a blank line separates
    /// the headers from the body.
    #[must_use]
    pub fn to_wire(&self) -> Vec<u8> {
        let mut wire = Vec::with_capacity(
            self.from.len() + self.to.len() + self.subject.len() + self.body.len() + 32,
        );
        wire.extend_from_slice(b"From: ");
        wire.extend_from_slice(self.from.as_bytes());
        wire.extend_from_slice(b"\r\nTo: ");
        wire.extend_from_slice(self.to.as_bytes());
        wire.extend_from_slice(b"\r\nSubject: ");
        wire.extend_from_slice(self.subject.as_bytes());
        wire.extend_from_slice(b"\r\n\r\n");
        wire.extend_from_slice(self.body.as_bytes());
        wire
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_is_exact() {
        let draft = Draft::new("alice@example.com", "bob@example.com")
            .subject("lunch")
            .body("noon at the usual place?");

        assert_eq!(
            draft.to_wire(),
            b"From: alice@example.com\r\nTo: bob@example.com\r\nSubject: lunch\r\n\r\nnoon at the usual place?"
        );
    }

    #[test]
    fn empty_subject_and_body_still_serialize() {
        let draft = Draft::new("a@b", "c@d");
        assert_eq!(draft.to_wire(), b"From: a@b\r\nTo: c@d\r\nSubject: \r\n\r\n");
    }

    #[test]
    fn wire_round_trips_through_decode() {
        let draft = Draft::new("alice@example.com", "bob@example.com")
            .subject("status")
            .body("all quiet");

        let wire = draft.to_wire();
        let seq = mailpost_imap::SeqNum::new(1).unwrap();
        let email = crate::message::Email::decode(seq, &wire).unwrap();

        assert_eq!(email.from.as_deref(), Some("alice@example.com"));
        assert_eq!(email.subject.as_deref(), Some("status"));
        assert_eq!(email.body, b"all quiet");
    }
}
