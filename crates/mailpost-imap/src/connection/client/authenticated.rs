//! Implementation for the authenticated state.

use chrono::Local;
use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::{Authenticated, Selected};
use crate::command::Command;
use crate::parser::{Response, ResponseCode, ResponseParser, Status, UntaggedResponse};
use crate::types::{Flag, Mailbox, MailboxStatus};
use crate::{Error, Result};

impl<S> Client<S, Authenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Selects a mailbox for read-write access.
    ///
    /// Consumes self and returns a selected client with the mailbox status.
    /// On rejection (e.g. the mailbox does not exist) the session is torn
    /// down before the error is returned.
    pub async fn select(self, mailbox: &str) -> Result<(Client<S, Selected>, MailboxStatus)> {
        self.open_mailbox(Command::Select {
            mailbox: Mailbox::new(mailbox),
        })
        .await
    }

    /// Examines a mailbox for read-only access.
    pub async fn examine(self, mailbox: &str) -> Result<(Client<S, Selected>, MailboxStatus)> {
        self.open_mailbox(Command::Examine {
            mailbox: Mailbox::new(mailbox),
        })
        .await
    }

    async fn open_mailbox(
        mut self,
        command: Command,
    ) -> Result<(Client<S, Selected>, MailboxStatus)> {
        let read_only = matches!(command, Command::Examine { .. });
        let tag = self.tag_gen.next();
        let cmd = command.serialize(&tag);

        self.stream.write_command(&cmd).await?;

        let responses = self.read_until_tagged(&tag).await?;
        let mut status = parse_mailbox_status(&responses);
        status.read_only = read_only;

        if let Err(e) = Self::check_tagged_ok(&responses, &tag) {
            self.abort().await;
            return Err(e);
        }

        Ok((self.into_state(), status))
    }

    /// Appends a complete RFC 5322 message to a mailbox.
    ///
    /// The message is stored with the given flags and an internal date taken
    /// from the wall clock at the moment of the upload. The target mailbox
    /// must already exist; a missing mailbox surfaces as the server's NO.
    pub async fn append(&mut self, mailbox: &str, flags: Vec<Flag>, message: &[u8]) -> Result<()> {
        let tag = self.tag_gen.next();
        let cmd = Command::Append {
            mailbox: Mailbox::new(mailbox),
            flags,
            date: Local::now().fixed_offset(),
            size: message.len(),
        }
        .serialize(&tag);

        self.stream.write_command(&cmd).await?;

        // The literal may only be sent after the server's continuation.
        // Untagged responses may arrive first and are skipped.
        loop {
            let response = self.stream.read_response().await?;
            match ResponseParser::parse(&response)? {
                Response::Continuation { .. } => break,
                Response::Untagged(UntaggedResponse::Bye { text }) => {
                    return Err(Error::Bye(text));
                }
                Response::Untagged(_) => {}
                Response::Tagged { status, text, .. } => {
                    return match status {
                        Status::No => Err(Error::No(text)),
                        Status::Bad => Err(Error::Bad(text)),
                        Status::Bye => Err(Error::Bye(text)),
                        Status::Ok | Status::PreAuth => Err(Error::Protocol(
                            "unexpected completion before APPEND literal".to_string(),
                        )),
                    };
                }
            }
        }

        self.stream.write_command(message).await?;
        self.stream.write_command(b"\r\n").await?;

        let responses = self.read_until_tagged(&tag).await?;
        Self::check_tagged_ok(&responses, &tag)
    }
}

/// Extracts mailbox status from the untagged responses to SELECT/EXAMINE.
pub(super) fn parse_mailbox_status(responses: &[Vec<u8>]) -> MailboxStatus {
    let mut status = MailboxStatus::default();

    for response_bytes in responses {
        if let Ok(Response::Untagged(untagged)) = ResponseParser::parse(response_bytes) {
            match untagged {
                UntaggedResponse::Exists(n) => status.exists = n,
                UntaggedResponse::Recent(n) => status.recent = n,
                UntaggedResponse::Flags(flags) => status.flags = flags,
                UntaggedResponse::Ok {
                    code: Some(ResponseCode::Unseen(seq)),
                    ..
                } => status.unseen = Some(seq),
                _ => {}
            }
        }
    }

    status
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mailbox_status_from_select_responses() {
        let responses: Vec<Vec<u8>> = vec![
            b"* 18 EXISTS\r\n".to_vec(),
            b"* 2 RECENT\r\n".to_vec(),
            b"* FLAGS (\\Answered \\Seen \\Draft)\r\n".to_vec(),
            b"* OK [UNSEEN 17] Message 17 is first unseen\r\n".to_vec(),
            b"A0002 OK [READ-WRITE] SELECT completed\r\n".to_vec(),
        ];

        let status = parse_mailbox_status(&responses);
        assert_eq!(status.exists, 18);
        assert_eq!(status.recent, 2);
        assert_eq!(status.flags.len(), 3);
        assert_eq!(status.unseen.unwrap().get(), 17);
    }

    #[test]
    fn mailbox_status_defaults_when_absent() {
        let responses: Vec<Vec<u8>> = vec![b"A0002 OK done\r\n".to_vec()];
        let status = parse_mailbox_status(&responses);
        assert_eq!(status.exists, 0);
        assert!(status.unseen.is_none());
    }
}
