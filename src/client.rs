use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::auth::{Authenticator, Credentials, HmacAuthenticator, SessionAuthenticator};
use crate::config::{AuthMethod, Config};
use crate::error::{Error, ErrorCode, Result};
use crate::logger::{default_logger, LogFields, LogLevel, Logger};

/// Attempts made to recover from a 401 before giving up
const MAX_REAUTH_ATTEMPTS: usize = 3;

/// Client for the oncall REST API
pub struct OncallClient {
    /// HTTP client for REST API calls
    http_client: Client,
    /// Endpoint without trailing slash
    endpoint: String,
    auth_method: AuthMethod,
    retry_delay: Duration,
    authenticator: Arc<dyn Authenticator>,
    pub(crate) logger: Arc<dyn Logger>,
}

impl OncallClient {
    /// Create a new oncall client that logs through `tracing`
    pub fn new(config: Config) -> Result<Self> {
        Self::with_logger(config, default_logger())
    }

    /// Create a new oncall client with an explicit logger
    pub fn with_logger(config: Config, logger: Arc<dyn Logger>) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::network(format!("Failed to create HTTP client: {e}")))?;
        Self::from_parts(http_client, config, logger)
    }

    /// Create a client on top of a caller-supplied HTTP client
    pub fn from_parts(http_client: Client, config: Config, logger: Arc<dyn Logger>) -> Result<Self> {
        config.validate()?;
        let endpoint = config.normalized_endpoint().to_string();
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let authenticator: Arc<dyn Authenticator> = match config.auth_method {
            AuthMethod::User => {
                logger.log(LogLevel::Debug, "Using User AuthMethod");
                let login_url = Url::parse(&format!("{endpoint}/login"))
                    .map_err(|e| Error::invalid_argument(format!("Invalid login URL: {e}")))?;
                Arc::new(SessionAuthenticator::new(
                    http_client.clone(),
                    credentials,
                    login_url,
                    logger.clone(),
                ))
            }
            AuthMethod::Api => {
                logger.log(LogLevel::Debug, "Using API AuthMethod");
                Arc::new(HmacAuthenticator::new(credentials, logger.clone()))
            }
        };

        Ok(Self {
            http_client,
            endpoint,
            auth_method: config.auth_method,
            retry_delay: config.retry_delay,
            authenticator,
            logger,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn auth_method(&self) -> AuthMethod {
        self.auth_method
    }

    pub(crate) fn log(&self, level: LogLevel, message: &str) {
        self.logger.log(level, message);
    }

    pub(crate) fn log_fields(&self, level: LogLevel, fields: LogFields<'_>, message: &str) {
        self.logger.log_fields(level, &fields, message);
    }

    /// Build the full URL for a path, joined to the endpoint by exactly one slash
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    /// Send a request with a raw body and return the response body.
    ///
    /// A 401 triggers re-authentication when the authenticator supports it.
    /// Statuses >= 400 become [`ErrorCode::HttpStatus`] errors carrying the body.
    pub async fn execute(&self, method: Method, path: &str, body: String) -> Result<Vec<u8>> {
        let url = self.url(path);
        let (mut status, mut bytes) = self.send(&method, &url, &body).await?;

        if status == StatusCode::UNAUTHORIZED {
            (status, bytes) = self.reauthenticate_and_resend(&method, &url, &body).await?;
        }

        if status.as_u16() >= 400 {
            self.log(
                LogLevel::Debug,
                &format!(
                    "Dump of body on error ({}) ({method} {url}): {}",
                    status.as_u16(),
                    String::from_utf8_lossy(&bytes)
                ),
            );
            return Err(Error::http(status.as_u16(), bytes));
        }

        Ok(bytes)
    }

    /// Send `body` serialized as JSON (or nothing) and decode the response into `T`.
    ///
    /// A decode failure is an [`ErrorCode::Decode`] error that still carries the raw body.
    pub async fn execute_json<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = self.execute(method, path, encode_body(body)?).await?;
        decode_body(&bytes).map_err(|e| {
            self.log(
                LogLevel::Debug,
                &format!("Dump of body on json error: {}", String::from_utf8_lossy(&bytes)),
            );
            e
        })
    }

    /// GET a path and decode the JSON response
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute_json::<(), T>(Method::GET, path, None).await
    }

    /// POST a JSON body, ignoring the response content
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Vec<u8>> {
        self.execute(Method::POST, path, encode_body(Some(body))?).await
    }

    /// PUT a JSON body, ignoring the response content
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Vec<u8>> {
        self.execute(Method::PUT, path, encode_body(Some(body))?).await
    }

    /// DELETE a path without a body
    pub async fn delete(&self, path: &str) -> Result<Vec<u8>> {
        self.execute(Method::DELETE, path, String::new()).await
    }

    async fn reauthenticate_and_resend(
        &self,
        method: &Method,
        url: &str,
        body: &str,
    ) -> Result<(StatusCode, Vec<u8>)> {
        if !self.authenticator.can_reauthenticate() {
            return Err(Error::authentication(format!(
                "Request rejected with 401 ({method} {url})"
            ))
            .with_http_status(401));
        }

        let mut last_error = Error::authentication("Still unauthorized after re-login").with_http_status(401);
        for attempt in 1..=MAX_REAUTH_ATTEMPTS {
            if attempt > 1 {
                tokio::time::sleep(self.retry_delay).await;
            }
            self.log(
                LogLevel::Debug,
                &format!("Going to re-login due to 401 (attempt {attempt}/{MAX_REAUTH_ATTEMPTS})"),
            );
            self.authenticator.invalidate().await;

            match self.send(method, url, body).await {
                Ok((status, bytes)) if status != StatusCode::UNAUTHORIZED => return Ok((status, bytes)),
                Ok((_, bytes)) => {
                    last_error = Error::authentication("Still unauthorized after re-login")
                        .with_http_status(401)
                        .with_body(bytes);
                }
                Err(e) if e.code == ErrorCode::AuthenticationFailed => last_error = e,
                Err(e) => return Err(e.context("Failed to do request after re-login")),
            }
        }

        Err(last_error.context("Failed to login the auth transport"))
    }

    /// One authenticated round trip; always reads the full body
    async fn send(&self, method: &Method, url: &str, body: &str) -> Result<(StatusCode, Vec<u8>)> {
        self.authenticator.ensure_authenticated().await?;

        let mut builder = self.http_client.request(method.clone(), url);
        if !body.is_empty() {
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body.to_string());
        }
        let mut request = builder
            .build()
            .map_err(|e| Error::network(format!("Failed to create new request: {e}")))?;
        self.authenticator.decorate(&mut request).await?;

        self.log(LogLevel::Trace, &format!("Going to do request: {method} {url}"));
        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| Error::network(format!("Failed to do http request: {e}")))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::network(format!("Failed to read response body: {e}")))?;
        Ok((status, bytes.to_vec()))
    }
}

fn encode_body<B: Serialize + ?Sized>(body: Option<&B>) -> Result<String> {
    match body {
        Some(body) => serde_json::to_string(body)
            .map_err(|e| Error::invalid_argument(format!("Failed to json marshal body: {e}"))),
        None => Ok(String::new()),
    }
}

fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        Error::new(ErrorCode::Decode, format!("JSON Unmarshal Error: {e}")).with_body(bytes.to_vec())
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use wiremock::MockServer;

    pub fn api_client(server: &MockServer) -> OncallClient {
        OncallClient::new(
            Config::new(server.uri())
                .with_credentials("bob", "s3cr3t")
                .with_retry_delay(Duration::from_millis(10)),
        )
        .unwrap()
    }

    pub fn user_client(server: &MockServer) -> OncallClient {
        OncallClient::new(
            Config::new(format!("{}/", server.uri()))
                .with_credentials("bob", "pw")
                .with_auth_method(AuthMethod::User)
                .with_retry_delay(Duration::from_millis(10)),
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{api_client, user_client};
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{body_json, header, header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    fn login_ok() -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("set-cookie", "oncall-auth=abc123; Path=/")
            .set_body_json(serde_json::json!({"csrf_token": "tok-1"}))
    }

    #[test]
    fn test_new_client() {
        let client = OncallClient::new(Config::new("https://oncall.example.com/"));
        assert!(client.is_ok());
        assert_eq!(client.unwrap().auth_method(), AuthMethod::Api);
    }

    #[test]
    fn test_missing_endpoint() {
        let err = OncallClient::new(Config::new("")).err().unwrap();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_url_joining() {
        let client = OncallClient::new(Config::new("https://example.com/oncall/")).unwrap();
        assert_eq!(client.endpoint(), "https://example.com/oncall");
        assert_eq!(
            client.url("/api/v0/teams"),
            "https://example.com/oncall/api/v0/teams"
        );
        assert_eq!(
            client.url("api/v0/teams"),
            "https://example.com/oncall/api/v0/teams"
        );
    }

    #[tokio::test]
    async fn test_get_decodes_json_with_hmac_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v0/teams/ops"))
            .and(header_regex("authorization", "^hmac bob:[A-Za-z0-9_=-]+$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "ops"})))
            .expect(1)
            .mount(&server)
            .await;

        let named: Named = api_client(&server).get("/api/v0/teams/ops").await.unwrap();
        assert_eq!(named, Named { name: "ops".to_string() });
    }

    #[tokio::test]
    async fn test_unauthenticated_when_no_secret() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v0/teams"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["ops"])))
            .mount(&server)
            .await;

        let client = OncallClient::new(Config::new(server.uri())).unwrap();
        let teams: Vec<String> = client.get("/api/v0/teams").await.unwrap();
        assert_eq!(teams, vec!["ops".to_string()]);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_post_sends_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/teams"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({"name": "ops"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let body = api_client(&server)
            .post("/api/v0/teams", &serde_json::json!({"name": "ops"}))
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_http_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v0/teams/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("team not found"))
            .mount(&server)
            .await;

        let err = api_client(&server)
            .get::<Named>("/api/v0/teams/missing")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::HttpStatus);
        assert_eq!(err.http_status(), Some(404));
        assert_eq!(err.body_text().as_deref(), Some("team not found"));
    }

    #[tokio::test]
    async fn test_decode_error_keeps_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v0/teams/ops"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = api_client(&server)
            .get::<Named>("/api/v0/teams/ops")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Decode);
        assert_eq!(err.body(), Some(&b"not json"[..]));
    }

    #[tokio::test]
    async fn test_hmac_401_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v0/teams"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let err = api_client(&server)
            .get::<Vec<String>>("/api/v0/teams")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthenticationFailed);
        assert_eq!(err.http_status(), Some(401));
    }

    #[tokio::test]
    async fn test_session_login_once_across_requests() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(login_ok())
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v0/teams"))
            .and(header("x-csrf-token", "tok-1"))
            .and(header("cookie", "oncall-auth=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["ops"])))
            .expect(2)
            .mount(&server)
            .await;

        let client = user_client(&server);
        let first: Vec<String> = client.get("/api/v0/teams").await.unwrap();
        let second: Vec<String> = client.get("/api/v0/teams").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_share_one_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(login_ok().set_delay(Duration::from_millis(100)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v0/teams"))
            .and(header("x-csrf-token", "tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["ops"])))
            .expect(4)
            .mount(&server)
            .await;

        let client = user_client(&server);
        let (a, b, c, d) = tokio::join!(
            client.get::<Vec<String>>("/api/v0/teams"),
            client.get::<Vec<String>>("/api/v0/teams"),
            client.get::<Vec<String>>("/api/v0/teams"),
            client.get::<Vec<String>>("/api/v0/teams"),
        );
        for teams in [a, b, c, d] {
            assert_eq!(teams.unwrap(), vec!["ops".to_string()]);
        }
    }

    #[tokio::test]
    async fn test_session_401_relogs_once_and_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(login_ok())
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v0/teams"))
            .respond_with(ResponseTemplate::new(401))
            .up_to_n_times(1)
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v0/teams"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["ops"])))
            .expect(1)
            .mount(&server)
            .await;

        let teams: Vec<String> = user_client(&server).get("/api/v0/teams").await.unwrap();
        assert_eq!(teams, vec!["ops".to_string()]);
    }

    #[tokio::test]
    async fn test_session_persistent_401_exhausts_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(login_ok())
            .expect(1 + MAX_REAUTH_ATTEMPTS as u64)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v0/teams"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1 + MAX_REAUTH_ATTEMPTS as u64)
            .mount(&server)
            .await;

        let err = user_client(&server)
            .get::<Vec<String>>("/api/v0/teams")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthenticationFailed);
    }

    #[tokio::test]
    async fn test_session_login_failure_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = user_client(&server)
            .get::<Vec<String>>("/api/v0/teams")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthenticationFailed);
    }
}
