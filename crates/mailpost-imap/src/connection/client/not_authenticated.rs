//! Implementation for the not-authenticated state.

use std::marker::PhantomData;

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::{Authenticated, NotAuthenticated};
use crate::command::{Command, TagGenerator};
use crate::connection::framed::FramedStream;
use crate::connection::stream::{ImapStream, TlsOptions};
use crate::parser::{Response, ResponseCode, ResponseParser, UntaggedResponse};
use crate::{Error, Result};

impl<S> Client<S, NotAuthenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new client from a connected stream.
    ///
    /// Reads the server greeting; capabilities announced in the greeting's
    /// response code are recorded. A BYE greeting is an error.
    pub async fn from_stream(stream: S) -> Result<Self> {
        let mut framed = FramedStream::new(stream);

        let greeting = framed.read_response().await?;
        let response = ResponseParser::parse(&greeting)?;

        let mut capabilities = Vec::new();
        match response {
            Response::Untagged(UntaggedResponse::Ok {
                code: Some(ResponseCode::Capability(caps)),
                ..
            }) => capabilities = caps,
            Response::Untagged(
                UntaggedResponse::Ok { .. } | UntaggedResponse::PreAuth { .. },
            ) => {}
            Response::Untagged(UntaggedResponse::Bye { text }) => {
                return Err(Error::Bye(text));
            }
            _ => {
                return Err(Error::Protocol("unexpected greeting".to_string()));
            }
        }

        Ok(Self {
            stream: framed,
            tag_gen: TagGenerator::default(),
            capabilities,
            _state: PhantomData,
        })
    }

    /// Authenticates with the server using LOGIN.
    ///
    /// Consumes self and returns an authenticated client on success. On
    /// rejection the session is torn down before the error is returned;
    /// there is no retry.
    pub async fn login(
        mut self,
        username: &str,
        password: &str,
    ) -> Result<Client<S, Authenticated>> {
        let tag = self.tag_gen.next();
        let cmd = Command::Login {
            username: username.to_string(),
            password: password.to_string(),
        }
        .serialize(&tag);

        self.stream.write_command(&cmd).await?;

        let responses = self.read_until_tagged(&tag).await?;
        self.update_capabilities(&responses);

        if let Err(e) = Self::check_tagged_ok(&responses, &tag) {
            self.abort().await;
            return Err(e);
        }

        Ok(self.into_state())
    }
}

impl Client<ImapStream, NotAuthenticated> {
    /// Upgrades the connection to TLS via STARTTLS.
    ///
    /// Consumes self and returns a client whose transport is encrypted.
    /// Capabilities cached from the plaintext phase are discarded; they were
    /// received before the channel was trustworthy.
    pub async fn start_tls(mut self, host: &str, options: &TlsOptions) -> Result<Self> {
        if !self.capabilities.is_empty() && !self.has_capability("STARTTLS") {
            self.abort().await;
            return Err(Error::InvalidState(
                "server does not advertise STARTTLS".to_string(),
            ));
        }

        let tag = self.tag_gen.next();
        let cmd = Command::StartTls.serialize(&tag);
        self.stream.write_command(&cmd).await?;

        let responses = self.read_until_tagged(&tag).await?;
        if let Err(e) = Self::check_tagged_ok(&responses, &tag) {
            self.abort().await;
            return Err(e);
        }

        let secured = self.stream.into_inner().upgrade_to_tls(host, options).await?;

        Ok(Self {
            stream: FramedStream::new(secured),
            tag_gen: self.tag_gen,
            capabilities: Vec::new(),
            _state: PhantomData,
        })
    }
}
