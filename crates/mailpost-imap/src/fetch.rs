//! Streaming body fetch.
//!
//! A single FETCH command asks the server for the full body of every message
//! in a sequence set. The server streams the results at its own pace; one
//! subordinate task owns the connection for the duration and forwards each
//! body through a bounded channel, so a slow consumer throttles the reader
//! instead of the process buffering the whole mailbox.
//!
//! The channel closing is the completion signal. [`BodyFetch::finish`]
//! returns the connection for further use, or the error that stopped the
//! reader; a failure in the reader task never takes the process down.

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::command::{Command, FetchItems};
use crate::connection::{Client, Selected};
use crate::parser::{FetchItem, Response, ResponseParser, Status, UntaggedResponse};
use crate::types::{SeqNum, SequenceSet};
use crate::{Error, Result};

/// Default capacity of the body queue.
pub const DEFAULT_QUEUE_DEPTH: usize = 10;

/// One message body delivered by the fetch pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBody {
    /// Sequence number of the message.
    pub seq: SeqNum,
    /// Raw message octets (headers and body).
    pub body: Vec<u8>,
}

/// Handle to an in-flight streaming fetch.
pub struct BodyFetch<S> {
    receiver: mpsc::Receiver<FetchedBody>,
    task: JoinHandle<Result<Client<S, Selected>>>,
}

impl<S> BodyFetch<S> {
    /// Receives the next message body.
    ///
    /// Returns `None` once the server has sent everything and the reader
    /// task has finished.
    pub async fn recv(&mut self) -> Option<FetchedBody> {
        self.receiver.recv().await
    }

    /// Waits for the reader task and returns the connection.
    ///
    /// # Errors
    ///
    /// Returns the error that stopped the reader, or a protocol error if the
    /// task panicked.
    pub async fn finish(self) -> Result<Client<S, Selected>> {
        let Self { receiver, task } = self;
        // Close the queue before waiting, so a reader blocked on a full
        // queue is released instead of deadlocking against us. The reader
        // treats a failed send as "receiver gone" and runs to completion.
        drop(receiver);
        match task.await {
            Ok(result) => result,
            Err(e) => Err(Error::Protocol(format!("fetch reader task failed: {e}"))),
        }
    }
}

impl<S> Client<S, Selected>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    /// Fetches the full body of every message in `sequence`, streaming the
    /// results through a bounded queue of `queue_depth` messages.
    ///
    /// The FETCH command is issued once for the whole set. A subordinate
    /// task then owns the connection until the server's completion response
    /// arrives; resolve it with [`BodyFetch::finish`]. Messages the server
    /// answers without a body section are logged and skipped.
    pub async fn fetch_bodies(
        mut self,
        sequence: SequenceSet,
        queue_depth: usize,
    ) -> Result<BodyFetch<S>> {
        let tag = self.tag_gen.next();
        let cmd = Command::Fetch {
            sequence,
            items: FetchItems::body(),
        }
        .serialize(&tag);
        self.stream.write_command(&cmd).await?;

        let (tx, rx) = mpsc::channel(queue_depth.max(1));

        let task = tokio::spawn(async move {
            let mut receiver_gone = false;

            loop {
                let response = self.stream.read_response().await?;

                match ResponseParser::parse(&response) {
                    Ok(Response::Tagged {
                        tag: resp_tag,
                        status,
                        text,
                    }) if resp_tag == tag => {
                        return match status {
                            Status::Ok | Status::PreAuth => Ok(self),
                            Status::No => Err(Error::No(text)),
                            Status::Bad => Err(Error::Bad(text)),
                            Status::Bye => Err(Error::Bye(text)),
                        };
                    }
                    Ok(Response::Untagged(UntaggedResponse::Fetch { seq, items })) => {
                        let body = items.into_iter().find_map(|item| match item {
                            FetchItem::Body {
                                data: Some(data), ..
                            } => Some(data),
                            _ => None,
                        });

                        let Some(body) = body else {
                            debug!(seq = seq.get(), "fetch response without body, skipping");
                            continue;
                        };

                        if receiver_gone {
                            continue;
                        }
                        // Blocks while the queue is full; this is the
                        // backpressure valve
                        if tx.send(FetchedBody { seq, body }).await.is_err() {
                            receiver_gone = true;
                        }
                    }
                    Ok(Response::Untagged(UntaggedResponse::Bye { text })) => {
                        return Err(Error::Bye(text));
                    }
                    Ok(_) => {}
                    Err(e) => {
                        // One undecodable response must not abort the batch
                        warn!(error = %e, "skipping unparseable fetch response");
                    }
                }
            }
        });

        Ok(BodyFetch { receiver: rx, task })
    }
}
