//! Login-session authentication: CSRF token plus session cookies

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderName, HeaderValue, COOKIE, SET_COOKIE};
use reqwest::{Client, Request, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;
use url::Url;

use super::{Authenticator, Credentials};
use crate::error::{Error, Result};
use crate::logger::{LogLevel, Logger};

const CSRF_HEADER: &str = "x-csrf-token";

#[derive(Debug, Deserialize)]
struct LoginResponse {
    csrf_token: String,
}

/// Logs in lazily through `<endpoint>/login` and replays the CSRF token and
/// session cookies on every request.
///
/// The token mutex is held for the whole login, so concurrent requests sharing
/// one client wait for a single login instead of racing.
pub struct SessionAuthenticator {
    http: Client,
    credentials: Credentials,
    login_url: Url,
    csrf_token: Mutex<Option<String>>,
    cookie_jar: Arc<Jar>,
    logger: Arc<dyn Logger>,
}

impl SessionAuthenticator {
    pub fn new(http: Client, credentials: Credentials, login_url: Url, logger: Arc<dyn Logger>) -> Self {
        SessionAuthenticator {
            http,
            credentials,
            login_url,
            csrf_token: Mutex::new(None),
            cookie_jar: Arc::new(Jar::default()),
            logger,
        }
    }

    /// Currently cached CSRF token, if any
    pub async fn csrf_token(&self) -> Option<String> {
        self.csrf_token.lock().await.clone()
    }

    async fn login(&self) -> Result<String> {
        let username = &self.credentials.username;
        self.logger.log(
            LogLevel::Debug,
            &format!("Getting new CSRF token from {} as {username}", self.login_url),
        );

        let response = self
            .http
            .post(self.login_url.clone())
            .form(&[("username", username.as_str()), ("password", self.credentials.password.as_str())])
            .send()
            .await
            .map_err(|e| Error::authentication(format!("Logging into {} as {username}: {e}", self.login_url)))?;

        let status = response.status();
        let url = response.url().clone();
        let mut set_cookies = response.headers().get_all(SET_COOKIE).iter();
        self.cookie_jar.set_cookies(&mut set_cookies, &url);

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::authentication(format!("Failed to read body while logging in: {e}")))?;

        if status != StatusCode::OK {
            return Err(Error::authentication(format!("Failed to login ({})", status.as_u16()))
                .with_http_status(status.as_u16())
                .with_body(body.to_vec()));
        }

        let login: LoginResponse = serde_json::from_slice(&body).map_err(|e| {
            self.logger.log(
                LogLevel::Trace,
                &format!("Failed to unmarshal login body: {}", String::from_utf8_lossy(&body)),
            );
            Error::authentication(format!("Failed to parse login JSON response: {e}"))
        })?;

        Ok(login.csrf_token)
    }
}

#[async_trait]
impl Authenticator for SessionAuthenticator {
    async fn ensure_authenticated(&self) -> Result<()> {
        let mut token = self.csrf_token.lock().await;
        if token.is_some() {
            self.logger.log(LogLevel::Trace, "Using existing csrf token");
            return Ok(());
        }
        if !self.credentials.has_secret() {
            self.logger
                .log(LogLevel::Debug, "Password not set, not going to set auth as user");
            return Ok(());
        }

        *token = Some(self.login().await?);
        Ok(())
    }

    async fn decorate(&self, request: &mut Request) -> Result<()> {
        if !self.credentials.has_secret() {
            return Ok(());
        }

        if let Some(token) = self.csrf_token().await {
            let value = HeaderValue::from_str(&token)
                .map_err(|e| Error::authentication(format!("Invalid CSRF token: {e}")))?;
            request
                .headers_mut()
                .insert(HeaderName::from_static(CSRF_HEADER), value);
        }
        if let Some(cookies) = self.cookie_jar.cookies(request.url()) {
            request.headers_mut().insert(COOKIE, cookies);
        }
        Ok(())
    }

    async fn invalidate(&self) {
        self.logger.log(LogLevel::Debug, "Invalidating CSRF token");
        *self.csrf_token.lock().await = None;
    }

    fn can_reauthenticate(&self) -> bool {
        self.credentials.has_secret()
    }
}
