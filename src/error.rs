//! Application error taxonomy and HTTP mapping.
//!
//! Every fallible operation in the service layer returns [`AppError`]. Handlers
//! propagate it with `?` and Axum renders it through [`IntoResponse`] as:
//!
//! ```json
//! { "error": { "code": "alias_taken", "message": "...", "details": {} } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::warn;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload, also embedded in batch-style responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad input shape. `details.field` names the offending field when known.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// A custom alias collides with an existing code or alias.
    #[error("{message}")]
    AliasTaken { message: String, details: Value },

    /// Every generated candidate collided; the caller may retry registration.
    #[error("{message}")]
    GenerationExhausted { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The backing store is unreachable or timed out.
    #[error("{message}")]
    Transient { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    /// Validation error naming the offending input field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: json!({ "field": field }),
        }
    }

    pub fn alias_taken(message: impl Into<String>, details: Value) -> Self {
        Self::AliasTaken {
            message: message.into(),
            details,
        }
    }

    pub fn generation_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::GenerationExhausted {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn transient(message: impl Into<String>, details: Value) -> Self {
        Self::Transient {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Returns true for errors worth retrying against the store.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Stable machine-readable code used in response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::AliasTaken { .. } => "alias_taken",
            Self::GenerationExhausted { .. } => "generation_exhausted",
            Self::NotFound { .. } => "not_found",
            Self::Transient { .. } => "transient_error",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::AliasTaken { .. } => StatusCode::CONFLICT,
            Self::GenerationExhausted { .. } | Self::Transient { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn details(&self) -> &Value {
        match self {
            Self::Validation { details, .. }
            | Self::AliasTaken { details, .. }
            | Self::GenerationExhausted { details, .. }
            | Self::NotFound { details, .. }
            | Self::Transient { details, .. }
            | Self::Internal { details, .. } => details,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code(),
            message: self.to_string(),
            details: self.details().clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let fields: Vec<&str> = field_errors.keys().map(|k| k.as_ref()).collect();
        let field = fields.first().copied().unwrap_or("body");

        AppError::bad_request(
            "Request validation failed",
            json!({ "field": field, "fields": fields, "errors": errors.to_string() }),
        )
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

/// Maps a database error onto the taxonomy.
///
/// - Unique violations become [`AppError::AliasTaken`]; the handle table is the
///   only unique constraint callers can hit.
/// - Check violations become [`AppError::Validation`] when the constraint
///   guards caller input (see [`map_check_violation`]).
/// - Connectivity failures become [`AppError::Transient`].
/// - Everything else is [`AppError::Internal`].
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return AppError::alias_taken(
                "Short code or alias is already in use",
                json!({ "constraint": db.constraint() }),
            );
        }
        if db.is_check_violation() {
            return map_check_violation(db.constraint());
        }
    }

    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => {
            warn!("Store unavailable: {}", e);
            AppError::transient("Link store is temporarily unavailable", json!({}))
        }
        other => {
            warn!("Database error: {}", other);
            AppError::internal("Database error", json!({}))
        }
    }
}

/// Maps a `links` CHECK constraint onto the field the caller sent.
pub fn map_check_violation(constraint: Option<&str>) -> AppError {
    match constraint {
        Some("links_long_url_scheme") => {
            AppError::invalid_field("long_url", "URL must start with http:// or https://")
        }
        Some("links_has_handle") => {
            AppError::invalid_field("custom_alias", "A link needs a short code or an alias")
        }
        other => {
            warn!("Check constraint violated: {:?}", other);
            AppError::internal("Database error", json!({ "constraint": other }))
        }
    }
}
