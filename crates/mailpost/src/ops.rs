//! The two operations the binary exposes.
//!
//! Each operation opens its own session, does its work, and tears the
//! session down; nothing is shared or reused between calls. Errors carry
//! the phase in which they occurred so the caller can tell a refused
//! login from a missing mailbox.

use thiserror::Error;
use tracing::{debug, info, warn};

use mailpost_imap::{
    Authenticated, Client, DEFAULT_QUEUE_DEPTH, Flag, ImapStream, SearchCriteria, SequenceSet,
    TlsOptions, connect_plain,
};

use crate::config::{Config, ConfigError};
use crate::draft::Draft;
use crate::message::Email;

/// Operation failures, tagged by phase.
#[derive(Debug, Error)]
pub enum OpError {
    /// Configuration could not be assembled.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// TCP connect or greeting failed.
    #[error("failed to connect: {0}")]
    Connect(#[source] mailpost_imap::Error),
    /// The STARTTLS upgrade failed or was refused.
    #[error("failed to secure the connection: {0}")]
    Security(#[source] mailpost_imap::Error),
    /// The server rejected the credentials.
    #[error("authentication failed: {0}")]
    Auth(#[source] mailpost_imap::Error),
    /// The mailbox could not be opened.
    #[error("failed to open mailbox: {0}")]
    Mailbox(#[source] mailpost_imap::Error),
    /// The SEARCH command failed.
    #[error("search failed: {0}")]
    Search(#[source] mailpost_imap::Error),
    /// The FETCH pipeline failed.
    #[error("fetch failed: {0}")]
    Fetch(#[source] mailpost_imap::Error),
    /// The APPEND was rejected.
    #[error("failed to store draft: {0}")]
    Append(#[source] mailpost_imap::Error),
}

/// Dials the server, upgrades to TLS, and logs in.
async fn connect(config: &Config) -> Result<Client<ImapStream, Authenticated>, OpError> {
    let options = TlsOptions {
        accept_invalid_certs: config.accept_invalid_certs,
    };

    let stream = connect_plain(&config.host, config.port)
        .await
        .map_err(OpError::Connect)?;
    let client = Client::from_stream(stream).await.map_err(OpError::Connect)?;
    debug!(host = %config.host, port = config.port, "connected");

    let client = client
        .start_tls(&config.host, &options)
        .await
        .map_err(OpError::Security)?;

    let client = client
        .login(&config.user, &config.password)
        .await
        .map_err(OpError::Auth)?;
    debug!(user = %config.user, "authenticated");

    Ok(client)
}

/// Fetches every unseen message in INBOX.
///
/// An empty inbox yields an empty vector. Messages that fail to decode
/// are logged and skipped; one bad message never aborts the batch.
///
/// # Errors
///
/// Returns [`OpError`] naming the phase that failed.
pub async fn fetch_unseen(config: &Config) -> Result<Vec<Email>, OpError> {
    let client = connect(config).await?;

    let (mut client, status) = client.select("INBOX").await.map_err(OpError::Mailbox)?;
    debug!(exists = status.exists, recent = status.recent, "mailbox open");

    let seqs = match client.search(&SearchCriteria::WithoutFlag(Flag::Seen)).await {
        Ok(seqs) => seqs,
        Err(e) => {
            let _ = client.logout().await;
            return Err(OpError::Search(e));
        }
    };

    let Some(sequence) = SequenceSet::from_seqs(&seqs) else {
        info!("no unseen messages");
        let _ = client.logout().await;
        return Ok(Vec::new());
    };
    info!(count = seqs.len(), "fetching unseen messages");

    let mut fetch = client
        .fetch_bodies(sequence, DEFAULT_QUEUE_DEPTH)
        .await
        .map_err(OpError::Fetch)?;

    let mut emails = Vec::with_capacity(seqs.len());
    while let Some(message) = fetch.recv().await {
        match Email::decode(message.seq, &message.body) {
            Ok(email) => emails.push(email),
            Err(e) => {
                warn!(seq = message.seq.get(), error = %e, "skipping undecodable message");
            }
        }
    }

    let client = fetch.finish().await.map_err(OpError::Fetch)?;
    let _ = client.logout().await;

    Ok(emails)
}

/// Files a draft into the given mailbox with the `\Draft` flag set.
///
/// The mailbox must already exist; a missing mailbox surfaces as the
/// server's rejection, not a silent create.
///
/// # Errors
///
/// Returns [`OpError`] naming the phase that failed.
pub async fn save_draft(config: &Config, draft: &Draft, mailbox: &str) -> Result<(), OpError> {
    let mut client = connect(config).await?;

    let result = client
        .append(mailbox, vec![Flag::Draft], &draft.to_wire())
        .await;

    let _ = client.logout().await;

    result.map_err(OpError::Append)?;
    info!(mailbox, "draft stored");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_their_phase() {
        let err = OpError::Auth(mailpost_imap::Error::No("LOGIN failed".to_string()));
        assert!(err.to_string().contains("authentication failed"));

        let err = OpError::Append(mailpost_imap::Error::No("no such mailbox".to_string()));
        assert!(err.to_string().contains("failed to store draft"));
    }

    #[test]
    fn config_errors_convert() {
        let err: OpError = ConfigError::Missing("EMAIL").into();
        assert!(matches!(err, OpError::Config(_)));
    }
}
