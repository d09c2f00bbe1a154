use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Client-facing error kinds. Every JSON endpoint answers HTTP 200 and the
/// frontend dispatches on the `error` field of the body, so the status code
/// carries no signal here.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not logged in")]
    NotLoggedIn,
    #[error("already logged in")]
    AlreadyLoggedIn,
    /// Datastore retrieval or hashing failure.
    #[error("{0}")]
    Failed(String),
    /// Catch-all for downstream failures, with a human-readable message.
    #[error("{0}")]
    Generic(String),
    /// Bad OTP or bad phone number.
    #[error("{0}")]
    Invalid(String),
    /// Uniqueness check found an existing row.
    #[error("{0}")]
    NotAvailable(String),
    /// Registration failure that should prompt a retry.
    #[error("{0}")]
    Register(String),
}

impl ApiError {
    pub fn generic() -> Self {
        Self::Generic("Something went wrong. Try again later".into())
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::NotLoggedIn => "not-logged-in",
            Self::AlreadyLoggedIn => "already-logged-in",
            Self::Failed(_) => "failed",
            Self::Generic(_) => "generic",
            Self::Invalid(_) => "invalid",
            Self::NotAvailable(_) => "not-available",
            Self::Register(_) => "register",
        }
    }

    fn err_msg(self) -> Option<String> {
        match self {
            Self::NotLoggedIn | Self::AlreadyLoggedIn => None,
            Self::Failed(m)
            | Self::Generic(m)
            | Self::Invalid(m)
            | Self::NotAvailable(m)
            | Self::Register(m) => Some(m),
        }
    }
}

/// `{"error": ..., "errMsg": ...}` failure envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(rename = "errMsg", skip_serializing_if = "Option::is_none")]
    pub err_msg: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.kind(),
            err_msg: self.err_msg(),
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}

impl From<tower_sessions::session::Error> for ApiError {
    fn from(e: tower_sessions::session::Error) -> Self {
        error!(error = %e, "session store error");
        Self::Generic("Try again later".into())
    }
}

/// `{"result": ...}` success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResult<T: Serialize> {
    pub result: T,
}

impl<T: Serialize> ApiResult<T> {
    pub fn json(result: T) -> Json<Self> {
        Json(Self { result })
    }
}
