//! HMAC request signing for API-key authentication

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE as BASE64_URL, Engine};
use hmac::{Hmac, Mac};
use percent_encoding::percent_decode_str;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Request;
use sha2::Sha512;

use super::{Authenticator, Credentials};
use crate::error::{Error, Result};
use crate::logger::{LogLevel, Logger};

type HmacSha512 = Hmac<Sha512>;

/// Width of the signing window in seconds
const WINDOW_SECONDS: i64 = 5;

/// Signs every request with `Authorization: hmac <user>:<signature>`.
/// Stateless, safe to share between tasks.
pub struct HmacAuthenticator {
    credentials: Credentials,
    logger: Arc<dyn Logger>,
}

impl HmacAuthenticator {
    pub fn new(credentials: Credentials, logger: Arc<dyn Logger>) -> Self {
        HmacAuthenticator { credentials, logger }
    }

    /// Header value for a request signed in the given time bucket
    pub fn authorization(&self, bucket: i64, method: &str, path: &str, body: &[u8]) -> Result<String> {
        let payload = signing_payload(bucket, method, path, body);
        let signature = sign(&self.credentials.password, &payload)?;
        Ok(format!("hmac {}:{signature}", self.credentials.username))
    }
}

/// Current 5 second window for a unix timestamp
pub fn time_bucket(unix_seconds: i64) -> i64 {
    unix_seconds / WINDOW_SECONDS
}

/// `{bucket} {method} {path} {body}`
pub fn signing_payload(bucket: i64, method: &str, path: &str, body: &[u8]) -> String {
    format!("{bucket} {method} {path} {}", String::from_utf8_lossy(body))
}

/// HMAC-SHA512 of `payload` keyed by `secret`, URL-safe base64
pub fn sign(secret: &str, payload: &str) -> Result<String> {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .map_err(|e| Error::authentication(format!("Invalid HMAC key: {e}")))?;
    mac.update(payload.as_bytes());
    Ok(BASE64_URL.encode(mac.finalize().into_bytes()))
}

#[async_trait]
impl Authenticator for HmacAuthenticator {
    async fn ensure_authenticated(&self) -> Result<()> {
        Ok(())
    }

    async fn decorate(&self, request: &mut Request) -> Result<()> {
        if !self.credentials.has_secret() {
            self.logger
                .log(LogLevel::Debug, "Password not set, not going to set Auth header");
            return Ok(());
        }

        let body = request.body().and_then(|b| b.as_bytes()).unwrap_or_default();
        let bucket = time_bucket(chrono::Utc::now().timestamp());
        // The server verifies against the decoded path
        let path = percent_decode_str(request.url().path())
            .decode_utf8_lossy()
            .into_owned();
        let value = self.authorization(bucket, request.method().as_str(), &path, body)?;

        let header = HeaderValue::from_str(&value)
            .map_err(|e| Error::authentication(format!("Invalid authorization header: {e}")))?;
        request.headers_mut().insert(AUTHORIZATION, header);
        self.logger.log(
            LogLevel::Trace,
            &format!("Signed {} {path}", request.method()),
        );
        Ok(())
    }

    async fn invalidate(&self) {}

    fn can_reauthenticate(&self) -> bool {
        false
    }
}
