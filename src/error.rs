//! Error types shared across the relay.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error as ThisError;

use crate::warning;

/// Crate-wide error type.
#[derive(Debug, ThisError)]
pub enum Error {
    /// A required configuration value is missing or unusable.
    #[error("Missing configuration: {0}")]
    Config(String),

    /// No access token is currently held.
    #[error("Not authorized")]
    Unauthorized,

    /// The upstream rejected the authorization-code exchange.
    #[error("Authorization code exchange failed: {0}")]
    AuthorizationExchange(String),

    /// The upstream rejected the refresh-token exchange.
    #[error("Token refresh failed: {0}")]
    Refresh(String),

    /// Caller input was missing or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An upstream read failed or timed out.
    #[error("{detail}")]
    UpstreamFetch {
        status: Option<StatusCode>,
        detail: String,
    },

    /// An upstream playback command failed or timed out.
    #[error("{detail}")]
    UpstreamCommand {
        status: Option<StatusCode>,
        detail: String,
    },
}

impl Error {
    /// True when the upstream answered 401, i.e. the access token is no
    /// longer accepted and a refresh may rescue the call.
    pub fn is_expired_token(&self) -> bool {
        match self {
            Error::UpstreamFetch { status, .. } | Error::UpstreamCommand { status, .. } => {
                *status == Some(StatusCode::UNAUTHORIZED)
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Error::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            Error::AuthorizationExchange(_) => (StatusCode::BAD_REQUEST, "authorization_failed"),
            Error::Refresh(_) => (StatusCode::BAD_REQUEST, "refresh_failed"),
            Error::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "invalid_argument"),
            Error::UpstreamFetch { .. } => (StatusCode::BAD_REQUEST, "upstream_fetch_failed"),
            Error::UpstreamCommand { .. } => (StatusCode::BAD_REQUEST, "upstream_command_failed"),
        };

        let message = self.to_string();
        warning!("{}: {}", code, message);

        let body = ErrorResponse {
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
