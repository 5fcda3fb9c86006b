//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Startup-time consistency failures between the schema registry and the
/// access policy. These abort the process before any request is served.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("table '{0}' is writable but has no registered schema")]
    WritableWithoutSchema(String),
    #[error("table '{0}' has a schema but appears in no whitelist")]
    SchemaWithoutAccess(String),
}

/// What went wrong with a single body field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Missing,
    Type,
    Url,
}

/// One field-level validation problem. Validation failures carry the full
/// list of these, never just the first.
#[derive(Clone, Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn missing(field: &str) -> Self {
        FieldError {
            field: field.to_string(),
            kind: FieldErrorKind::Missing,
            message: format!("'{}' is required", field),
        }
    }

    pub fn type_mismatch(field: &str, expected: &str, got: &str) -> Self {
        FieldError {
            field: field.to_string(),
            kind: FieldErrorKind::Type,
            message: format!("'{}' must be {}, got {}", field, expected, got),
        }
    }

    pub fn bad_url(field: &str, reason: &str) -> Self {
        FieldError {
            field: field.to_string(),
            kind: FieldErrorKind::Url,
            message: format!("'{}' must be a well-formed URL: {}", field, reason),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("table '{0}' is not valid for this query")]
    UnknownTable(String),
    #[error("table '{0}' is not valid for this query")]
    ReadNotAllowed(String),
    #[error("table '{0}' does not permit writes via the API")]
    WriteNotAllowed(String),
    #[error("request body failed validation for table '{table}'")]
    Validation { table: String, errors: Vec<FieldError> },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownTable(_) => StatusCode::BAD_REQUEST,
            ApiError::ReadNotAllowed(_) => StatusCode::BAD_REQUEST,
            ApiError::WriteNotAllowed(_) => StatusCode::FORBIDDEN,
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::UnknownTable(_) => "unknown_table",
            ApiError::ReadNotAllowed(_) => "read_not_allowed",
            ApiError::WriteNotAllowed(_) => "write_not_allowed",
            ApiError::Validation { .. } => "validation_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Storage(_) => "database_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let details = match &self {
            ApiError::Validation { errors, .. } => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(ApiError::UnknownTable("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::ReadNotAllowed("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::WriteNotAllowed("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Validation { table: "hero".into(), errors: vec![] }.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Storage(sqlx::Error::PoolTimedOut).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_response_carries_field_details() {
        let err = ApiError::Validation {
            table: "hero".into(),
            errors: vec![
                FieldError::missing("hero_name"),
                FieldError::type_mismatch("role_id", "an integer", "string"),
            ],
        };
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
