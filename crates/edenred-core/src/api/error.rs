use reqwest::StatusCode;
use thiserror::Error;

use crate::models::WalletParseError;

/// Failure of a single request against the Edenred API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("credentials rejected (status {status}): {body}")]
    Unauthorized { status: StatusCode, body: String },

    #[error("{message}")]
    Rejected {
        message: String,
        code: Option<String>,
        field: Option<String>,
    },

    #[error("server error (status {status}): {body}")]
    ServerError { status: StatusCode, body: String },

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("execute request: {0}")]
    NetworkError(reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("invalid session token: {0}")]
    InvalidToken(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 512;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        let body = body.trim();
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let body = Self::truncate_body(body);
        match status.as_u16() {
            401 | 403 => ApiError::Unauthorized { status, body },
            500..=599 => ApiError::ServerError { status, body },
            _ => ApiError::UnexpectedStatus { status, body },
        }
    }

    /// True when the provider refused the credentials themselves, as opposed
    /// to the request failing on the way there or back.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. } | ApiError::Rejected { .. })
    }

    /// True for connection failures and deadline expiry.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::NetworkError(_) | ApiError::Timeout)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::NetworkError(err)
        }
    }
}

/// Stage of a balance lookup that produced a `BalanceError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Credentials,
    Authentication,
    Fetch,
    Parse,
}

/// Failure of a full balance lookup, tagged with the stage that failed.
#[derive(Error, Debug)]
pub enum BalanceError {
    #[error("username and password are required")]
    MissingCredentials,

    #[error("signin failed: {0}")]
    Authentication(#[source] ApiError),

    #[error("fetching balances failed: {0}")]
    Fetch(#[source] ApiError),

    #[error(transparent)]
    Parse(#[from] WalletParseError),
}

impl BalanceError {
    pub fn stage(&self) -> Stage {
        match self {
            BalanceError::MissingCredentials => Stage::Credentials,
            BalanceError::Authentication(_) => Stage::Authentication,
            BalanceError::Fetch(_) => Stage::Fetch,
            BalanceError::Parse(_) => Stage::Parse,
        }
    }

    /// The request error behind an authentication or fetch failure.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            BalanceError::Authentication(err) | BalanceError::Fetch(err) => Some(err),
            _ => None,
        }
    }
}
