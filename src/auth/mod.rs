//! Request authentication strategies
//!
//! The executor calls [`Authenticator::ensure_authenticated`] and then
//! [`Authenticator::decorate`] on every outgoing request. After a 401 it asks
//! [`Authenticator::can_reauthenticate`] and, if so, [`Authenticator::invalidate`]s
//! before sending again.

mod hmac;
mod session;

use std::fmt;

use async_trait::async_trait;
use reqwest::Request;

use crate::error::Result;

pub use self::hmac::{sign, signing_payload, time_bucket, HmacAuthenticator};
pub use self::session::SessionAuthenticator;

/// Attaches credentials to outgoing requests
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Acquire whatever session state is needed before a request can be decorated
    async fn ensure_authenticated(&self) -> Result<()>;

    /// Add authentication headers to the request
    async fn decorate(&self, request: &mut Request) -> Result<()>;

    /// Drop cached session state so the next request authenticates again
    async fn invalidate(&self);

    /// Whether invalidating and resending can turn a 401 into a success
    fn can_reauthenticate(&self) -> bool;
}

/// Username and secret supplied by the caller
#[derive(Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    pub(crate) fn has_secret(&self) -> bool {
        !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
