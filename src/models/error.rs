use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;
use serde_json::Value;
use thiserror::Error as ThisError;

#[derive(Debug)]
pub struct Error {
    pub code: StatusCode,
    pub body: Json<Value>,
}

impl Error {
    pub fn new(code: StatusCode, message: &str) -> Self {
        Self {
            code,
            body: Json(json!({"message": message})),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.code, self.body).into_response()
    }
}

impl From<(StatusCode, &str)> for Error {
    fn from((code, msg): (StatusCode, &str)) -> Self {
        Self::new(code, msg)
    }
}

/// Failure of a single upstream call.
#[derive(ThisError, Debug, Clone)]
pub enum FetchError {
    #[error("upstream returned {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("invalid upstream url: {0}")]
    InvalidUrl(String),

    #[error("request cancelled")]
    Cancelled,
}

impl FetchError {
    /// 429, transport failures and server-side errors are retried. Other client
    /// errors are permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || !status.is_client_error()
            }
            FetchError::Network(_) | FetchError::Timeout(_) | FetchError::Decode { .. } => true,
            FetchError::InvalidUrl(_) | FetchError::Cancelled => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        let url = error
            .url()
            .map(|u| u.to_string())
            .unwrap_or_default();
        if error.is_timeout() {
            FetchError::Timeout(url)
        } else if let Some(status) = error.status() {
            FetchError::Status {
                status: StatusCode::from_u16(status.as_u16())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                url,
            }
        } else if error.is_decode() {
            FetchError::Decode {
                url,
                message: error.to_string(),
            }
        } else {
            FetchError::Network(error.to_string())
        }
    }
}
