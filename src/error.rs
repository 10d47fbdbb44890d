//! Error types for the Parel portal
//!
//! Two families of errors live here. [`PortalError`] covers startup and
//! ambient failures (configuration, identity provider, navigation, form
//! handling) and is usually carried inside `anyhow::Error`. [`ApiError`] is
//! the single discriminated error returned by the backend API client, so
//! callers never have to distinguish between `None` results and raised
//! errors.

use thiserror::Error;

/// Main error type for portal operations
///
/// Covers everything outside the API client: configuration loading and
/// validation, identity provider failures, navigation and form handling,
/// plus conversions from the underlying I/O and parsing libraries.
#[derive(Error, Debug)]
pub enum PortalError {
    /// Configuration-related errors (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Identity provider errors (load failures, rejected operations)
    #[error("Identity provider error: {0}")]
    Identity(String),

    /// Navigation errors (unparseable locations, missing history entries)
    #[error("Navigation error: {0}")]
    Navigation(String),

    /// Form handling errors (missing fields, submit outside the form page)
    #[error("Form error: {0}")]
    Form(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for portal operations
///
/// Uses `anyhow::Error` so that fatal paths can attach context freely.
pub type Result<T> = anyhow::Result<T>;

/// Error returned by every backend API call
///
/// HTTP failures, transport failures, missing credentials and malformed
/// success payloads are all reported through this one type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No bearer token could be obtained from the current session.
    ///
    /// The request is aborted locally and never reaches the network.
    #[error("Authentication error: no session token available. Please sign in again.")]
    NotAuthenticated,

    /// The backend answered with a non-2xx status.
    ///
    /// `message` is the server-provided `error` field when the body was JSON
    /// carrying one, otherwise a message embedding the numeric status.
    #[error("{message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Human-readable message
        message: String,
    },

    /// The request never produced a response (DNS, connection, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx response whose body could not be decoded into the expected shape.
    #[error("Unexpected response from server: {0}")]
    MalformedPayload(String),
}

impl ApiError {
    /// Builds the error for a non-2xx response from its status and raw body.
    ///
    /// # Arguments
    ///
    /// * `status` - Numeric HTTP status
    /// * `body` - Raw response body (may be empty or non-JSON)
    ///
    /// # Examples
    ///
    /// ```
    /// use parel_portal::error::ApiError;
    ///
    /// let err = ApiError::from_status(404, r#"{"error":"Project not found"}"#);
    /// assert_eq!(err.to_string(), "Project not found");
    ///
    /// let err = ApiError::from_status(502, "<html>Bad Gateway</html>");
    /// assert_eq!(err.to_string(), "API responded with status 502");
    /// ```
    pub fn from_status(status: u16, body: &str) -> Self {
        let server_message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .and_then(|e| e.as_str())
                    .map(str::to_string)
            })
            .filter(|message| !message.trim().is_empty());

        Self::Status {
            status,
            message: server_message
                .unwrap_or_else(|| format!("API responded with status {}", status)),
        }
    }

    /// Text shown to the user in notifications and inline error markup.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type returned by the backend API client
pub type ApiResult<T> = std::result::Result<T, ApiError>;
