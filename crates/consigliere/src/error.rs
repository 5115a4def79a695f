use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use consigliere_agents::{AgentError, ValidationError};
use consigliere_store::StoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors surfaced over HTTP. Trade rule violations are not errors; they are
/// a 200 with `is_valid: false`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Too many requests. Try again in {0} seconds.")]
    RateLimited(u64),

    /// The store or the text generator could not answer.
    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MalformedProposal(_) => Self::BadRequest(err.to_string()),
            ValidationError::Unavailable(_) | ValidationError::Store(_) => {
                Self::Unavailable(err.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Unavailable(err.to_string())
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Input(msg) => Self::BadRequest(msg),
            AgentError::Validation(e) => e.into(),
            AgentError::Store(e) => e.into(),
            AgentError::Generator(_) | AgentError::Timeout(_) => Self::Unavailable(err.to_string()),
            AgentError::Parse(_) | AgentError::Json(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Internal(msg) => error!(error = %msg, "Request failed"),
            Self::Unavailable(msg) => warn!(error = %msg, "Dependency unavailable"),
            _ => {}
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        match self {
            Self::RateLimited(retry_after) => {
                (status, [(header::RETRY_AFTER, retry_after.to_string())], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}
