use crate::services::inventory::InventoryError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// An HTTP-facing error: a status, a user-facing message, and optionally the
/// underlying error text (omitted in production).
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<String>,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
            detail: None,
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Map an inventory failure to a 500 with a generic `message`. The full
    /// error chain is attached only when `expose_detail` is set.
    pub fn from_inventory(
        err: InventoryError,
        msg: impl Into<String>,
        expose_detail: bool,
    ) -> Self {
        let mut app = Self::internal(msg);
        if expose_detail {
            app.detail = Some(format!("{:#}", anyhow::Error::new(err)));
        }
        app
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "status": "error",
            "message": self.message,
        });
        if let Some(detail) = self.detail {
            body["error"] = json!(detail);
        }

        (self.status, Json(body)).into_response()
    }
}
