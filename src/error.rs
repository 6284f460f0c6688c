//! Error handling for the oncall client
//!
//! Every failure surfaced by the crate is an [`Error`] carrying an [`ErrorCode`],
//! a message that accumulates operation context as it unwinds, and, for errors
//! produced from an HTTP response, the status code and raw body.

use std::fmt;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// HTTP status the oncall API answers with when a create hits an existing entity
const ALREADY_EXISTS_STATUS: u16 = 422;

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad configuration or a locally rejected argument; no request was made
    InvalidArgument,
    /// Building or sending the request failed
    NetworkError,
    /// Login failed or the server kept answering 401
    AuthenticationFailed,
    /// The server answered with a status >= 400
    HttpStatus,
    /// The response body did not decode into the expected shape
    Decode,
    /// A lookup found nothing matching
    NotFound,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidArgument => "Invalid argument",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::AuthenticationFailed => "Authentication failed",
            ErrorCode::HttpStatus => "HTTP request failed",
            ErrorCode::Decode => "Decode error",
            ErrorCode::NotFound => "Not found",
        }
    }
}

/// Library error type
#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    /// HTTP status code if this error came from an HTTP response
    pub(crate) http_status: Option<u16>,
    /// Raw response body, kept for diagnostics
    pub(crate) body: Option<Vec<u8>>,
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Error {
            code,
            message: message.into(),
            http_status: None,
            body: None,
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::new(ErrorCode::InvalidArgument, msg)
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Error::new(ErrorCode::NetworkError, msg)
    }

    pub fn authentication(msg: impl Into<String>) -> Self {
        Error::new(ErrorCode::AuthenticationFailed, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::new(ErrorCode::NotFound, msg)
    }

    /// Error for a response with status >= 400
    pub fn http(status: u16, body: Vec<u8>) -> Self {
        let text = String::from_utf8_lossy(&body).into_owned();
        Error::new(ErrorCode::HttpStatus, format!("({status}) ({text})"))
            .with_http_status(status)
            .with_body(body)
    }

    /// Add HTTP status code (builder pattern)
    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    /// Attach the raw response body (builder pattern)
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Prefix the message with a description of the operation that failed
    pub fn context(mut self, context: impl fmt::Display) -> Self {
        self.message = format!("{context}: {}", self.message);
        self
    }

    /// Get the HTTP status code if available
    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    /// Get the raw response body if available
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Response body as lossy UTF-8
    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// True when the server rejected a create because the entity already exists
    pub fn is_already_exists(&self) -> bool {
        self.code == ErrorCode::HttpStatus && self.http_status == Some(ALREADY_EXISTS_STATUS)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for Error {}
