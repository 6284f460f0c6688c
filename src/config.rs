//! Client configuration

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// How requests are authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMethod {
    /// HMAC-signed `Authorization` header per request
    #[default]
    Api,
    /// Login session: CSRF token plus session cookies
    User,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::Api => "api",
            AuthMethod::User => "user",
        }
    }
}

impl FromStr for AuthMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" => Ok(AuthMethod::Api),
            "user" => Ok(AuthMethod::User),
            other => Err(Error::invalid_argument(format!(
                "Unknown auth method '{other}', expected 'api' or 'user'"
            ))),
        }
    }
}

/// Configuration for an [`OncallClient`](crate::OncallClient)
#[derive(Clone)]
pub struct Config {
    /// The username you authenticate to oncall with
    pub username: String,
    /// Password (user auth) or API key (api auth). Empty disables authentication.
    pub password: String,
    /// Everything before `/api/v0/` in your url, e.g. `https://example.com/oncall/`.
    /// The trailing slash is optional.
    pub endpoint: String,
    pub auth_method: AuthMethod,
    /// Timeout applied by the underlying HTTP client
    pub timeout: Duration,
    /// Pause between re-authentication attempts after a 401
    pub retry_delay: Duration,
}

impl Config {
    /// Create a new configuration for the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Config {
            username: String::new(),
            password: String::new(),
            endpoint: endpoint.into(),
            auth_method: AuthMethod::default(),
            timeout: DEFAULT_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Build a configuration from `ONCALL_ENDPOINT`, `ONCALL_USERNAME`,
    /// `ONCALL_PASSWORD` and `ONCALL_AUTH_METHOD`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let endpoint = lookup("ONCALL_ENDPOINT")
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Error::invalid_argument("ONCALL_ENDPOINT is not set"))?;

        let mut config = Config::new(endpoint).with_credentials(
            lookup("ONCALL_USERNAME").unwrap_or_default(),
            lookup("ONCALL_PASSWORD").unwrap_or_default(),
        );
        if let Some(method) = lookup("ONCALL_AUTH_METHOD").filter(|m| !m.is_empty()) {
            config.auth_method = method.parse()?;
        }
        Ok(config)
    }

    /// Set username and password
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Set the auth method
    pub fn with_auth_method(mut self, auth_method: AuthMethod) -> Self {
        self.auth_method = auth_method;
        self
    }

    /// Set the HTTP timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the delay between re-authentication attempts
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Endpoint with any trailing slash removed
    pub fn normalized_endpoint(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    /// Check the configuration before any request is built
    pub fn validate(&self) -> Result<()> {
        if self.normalized_endpoint().is_empty() {
            return Err(Error::invalid_argument("You must define at least an endpoint"));
        }
        Url::parse(self.normalized_endpoint())
            .map_err(|e| Error::invalid_argument(format!("Invalid endpoint URL: {e}")))?;
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("auth_method", &self.auth_method)
            .field("timeout", &self.timeout)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}
