use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimited,
    /// The request never produced a server response (DNS, connect, timeout, decode).
    Network,
    Internal,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => ErrorCode::Validation,
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::NotFound,
            429 => ErrorCode::RateLimited,
            _ => ErrorCode::Internal,
        }
    }
}

/// Failure reported by a catalog collaborator.
///
/// `message` holds the server-supplied text when the service sent one; it is empty
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code:?}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Network, message)
    }

    pub fn from_status(status: u16, message: Option<String>) -> Self {
        Self::new(ErrorCode::from_status(status), message.unwrap_or_default())
    }

    /// The server's own message if it supplied one, otherwise `fallback`.
    ///
    /// Transport failures never carry a server message, so they always fall back.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = self.message.trim();
        if self.code == ErrorCode::Network || message.is_empty() {
            fallback.to_string()
        } else {
            message.to_string()
        }
    }
}
