use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures of the plain HTTP routes. GraphQL reports its own errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error")]
    Db(#[from] sqlx::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Db(e) => {
                tracing::error!("Database error: {e}");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Failures of the ladder engines. Every variant except `Invariant` and
/// `Database` is an expected outcome of an operator command and leaves the
/// store untouched.
#[derive(Debug, Error)]
pub enum LadderError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl LadderError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LadderError::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        LadderError::Conflict(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        LadderError::Invariant(msg.into())
    }
}

pub type LadderResult<T> = Result<T, LadderError>;
