//! Implementation for the selected state.

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::Selected;
use crate::command::{Command, SearchCriteria};
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::{Mailbox, MailboxStatus, SeqNum};
use crate::Result;

impl<S> Client<S, Selected>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Searches for messages matching the given criteria.
    ///
    /// An empty result is a normal outcome, not an error. The server's
    /// ordering is preserved as-is.
    pub async fn search(&mut self, criteria: &SearchCriteria) -> Result<Vec<SeqNum>> {
        let tag = self.tag_gen.next();
        let cmd = Command::Search {
            criteria: criteria.clone(),
        }
        .serialize(&tag);
        self.stream.write_command(&cmd).await?;

        let responses = self.read_until_tagged(&tag).await?;
        let mut results = Vec::new();

        for response_bytes in &responses {
            if let Ok(Response::Untagged(UntaggedResponse::Search(seqs))) =
                ResponseParser::parse(response_bytes)
            {
                results.extend(seqs);
            }
        }

        Self::check_tagged_ok(&responses, &tag)?;
        Ok(results)
    }

    /// Selects a different (or the same) mailbox.
    ///
    /// A re-select is transparent: the client stays in the selected state
    /// and the new mailbox status is returned.
    pub async fn select(mut self, mailbox: &str) -> Result<(Self, MailboxStatus)> {
        let tag = self.tag_gen.next();
        let cmd = Command::Select {
            mailbox: Mailbox::new(mailbox),
        }
        .serialize(&tag);

        self.stream.write_command(&cmd).await?;

        let responses = self.read_until_tagged(&tag).await?;
        let status = super::authenticated::parse_mailbox_status(&responses);

        if let Err(e) = Self::check_tagged_ok(&responses, &tag) {
            self.abort().await;
            return Err(e);
        }

        Ok((self, status))
    }
}
