//! # mailpost-imap
//!
//! A minimal async IMAP client for retrieving and storing mail over a
//! STARTTLS-upgraded connection.
//!
//! ## Features
//!
//! - **Type-state connection management**: compile-time enforcement of valid
//!   state transitions (`NotAuthenticated` → `Authenticated` → `Selected`)
//! - **Explicit STARTTLS**: connections begin in plaintext and are upgraded
//!   in place before credentials are sent
//! - **Streaming fetch**: message bodies flow through a bounded queue while
//!   the caller processes them, with backpressure against the server
//! - **TLS via rustls**: no OpenSSL dependency; certificate validation can
//!   be bypassed only through an explicit option
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailpost_imap::{
//!     connect_plain, Client, Flag, SearchCriteria, SequenceSet, TlsOptions,
//!     DEFAULT_QUEUE_DEPTH,
//! };
//!
//! #[tokio::main]
//! async fn main() -> mailpost_imap::Result<()> {
//!     let stream = connect_plain("imap.example.com", 143).await?;
//!     let client = Client::from_stream(stream).await?;
//!     let client = client.start_tls("imap.example.com", &TlsOptions::default()).await?;
//!     let client = client.login("user@example.com", "password").await?;
//!
//!     let (mut client, status) = client.select("INBOX").await?;
//!     println!("{} messages", status.exists);
//!
//!     let unseen = client.search(&SearchCriteria::WithoutFlag(Flag::Seen)).await?;
//!     if let Some(sequence) = SequenceSet::from_seqs(&unseen) {
//!         let mut fetch = client.fetch_bodies(sequence, DEFAULT_QUEUE_DEPTH).await?;
//!         while let Some(message) = fetch.recv().await {
//!             println!("message {}: {} bytes", message.seq, message.body.len());
//!         }
//!         fetch.finish().await?.logout().await?;
//!     } else {
//!         client.logout().await?;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
mod fetch;
pub mod parser;
pub mod types;

pub use command::{Command, FetchAttribute, FetchItems, SearchCriteria, TagGenerator};
pub use connection::{
    Authenticated, Client, FramedStream, ImapStream, NotAuthenticated, ResponseAccumulator,
    Selected, TlsOptions, connect_plain,
};
pub use error::{Error, Result};
pub use fetch::{BodyFetch, DEFAULT_QUEUE_DEPTH, FetchedBody};
pub use parser::{FetchItem, Response, ResponseParser, Status, UntaggedResponse};
pub use types::{Flag, Flags, Mailbox, MailboxStatus, SeqNum, SequenceSet};
