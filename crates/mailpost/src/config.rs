//! Application configuration.
//!
//! All connection parameters are collected up front into an explicit
//! [`Config`] value; nothing further down reads the environment. Missing or
//! malformed settings fail fast with a message naming the variable.

use std::env::{self, VarError};
use std::fmt;

use thiserror::Error;

/// Errors raised while assembling the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    /// A variable is set but cannot be used.
    #[error("invalid value for {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

/// Connection and credential settings for one IMAP account.
#[derive(Clone)]
pub struct Config {
    /// Login name, also the default From address for drafts.
    pub user: String,
    /// Login password.
    pub password: String,
    /// IMAP server hostname.
    pub host: String,
    /// IMAP server port (plaintext; the session upgrades via STARTTLS).
    pub port: u16,
    /// Skip server certificate validation. Off unless explicitly enabled.
    pub accept_invalid_certs: bool,
}

impl Config {
    /// Builds the configuration from process environment variables.
    ///
    /// Required: `EMAIL`, `PASSWORD`, `IMAP_HOST`, `IMAP_PORT`. Optional:
    /// `IMAP_ACCEPT_INVALID_CERTS` (truthy values: `1`, `true`, `yes`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first missing or malformed
    /// variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name))
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first missing or malformed
    /// variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            match lookup(name) {
                Ok(value) if !value.is_empty() => Ok(value),
                _ => Err(ConfigError::Missing(name)),
            }
        };

        let user = required("EMAIL")?;
        let password = required("PASSWORD")?;
        let host = required("IMAP_HOST")?;
        let port_raw = required("IMAP_PORT")?;
        let port = port_raw
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid {
                name: "IMAP_PORT",
                reason: format!("{port_raw:?} is not a port number: {e}"),
            })?;

        let accept_invalid_certs = match lookup("IMAP_ACCEPT_INVALID_CERTS") {
            Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
            Err(_) => false,
        };

        Ok(Self {
            user,
            password,
            host,
            port,
            accept_invalid_certs,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}
