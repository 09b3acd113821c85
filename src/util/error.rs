use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use validator::ValidationErrors;

/// Service-level failure taxonomy. Handlers translate these into HTTP
/// statuses and the response envelope.
#[derive(Debug, Clone)]
pub enum ServiceError {
    NotFound(String),
    InvalidInput(String),
    /// Bad credentials, invalid/expired token, or stale identity.
    Unauthorized(String),
    Forbidden(String),
    /// Uniqueness violation: duplicate report or duplicate identity.
    Conflict(String),
    InternalError(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ServiceError::InvalidInput(msg) => write!(f, "Invalid Input: {}", msg),
            ServiceError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ServiceError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ServiceError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<crate::repository::repository_error::RepositoryError> for ServiceError {
    fn from(err: crate::repository::repository_error::RepositoryError) -> Self {
        use crate::repository::repository_error::RepositoryError;
        match err {
            RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
            RepositoryError::ValidationError(msg) => ServiceError::InvalidInput(msg),
            RepositoryError::AlreadyExists(msg) => ServiceError::Conflict(msg),
            // Storage detail stays server-side; the client sees a generic 500.
            RepositoryError::DatabaseError(msg)
            | RepositoryError::ConnectionError(msg)
            | RepositoryError::SerializationError(msg) => ServiceError::InternalError(msg),
            RepositoryError::Generic(e) => ServiceError::InternalError(e.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub enum HandlerErrorKind {
    Validation,
    Unauthorized,
    Forbidden,
    NotFound,
    /// Duplicate identity or duplicate daily report. Surfaces as 400 per
    /// the API contract, not 409.
    Duplicate,
    Internal,
}

#[derive(Debug)]
pub struct HandlerError {
    pub kind: HandlerErrorKind,
    pub message: String,
    pub errors: Option<Vec<String>>,
}

impl HandlerError {
    pub fn new(kind: HandlerErrorKind, message: impl Into<String>) -> Self {
        HandlerError {
            kind,
            message: message.into(),
            errors: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(HandlerErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(HandlerErrorKind::Forbidden, message)
    }

    /// Flatten `validator` output into a field-level message list.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    match &err.message {
                        Some(msg) => format!("{}: {}", field, msg),
                        None => format!("{}: {}", field, err.code),
                    }
                })
            })
            .collect();
        messages.sort();
        HandlerError {
            kind: HandlerErrorKind::Validation,
            message: "Validation failed".to_string(),
            errors: Some(messages),
        }
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for HandlerError {}

impl From<ServiceError> for HandlerError {
    fn from(err: ServiceError) -> Self {
        let (kind, message) = match err {
            ServiceError::NotFound(msg) => (HandlerErrorKind::NotFound, msg),
            ServiceError::InvalidInput(msg) => (HandlerErrorKind::Validation, msg),
            ServiceError::Unauthorized(msg) => (HandlerErrorKind::Unauthorized, msg),
            ServiceError::Forbidden(msg) => (HandlerErrorKind::Forbidden, msg),
            ServiceError::Conflict(msg) => (HandlerErrorKind::Duplicate, msg),
            ServiceError::InternalError(_) => (
                HandlerErrorKind::Internal,
                "Internal server error".to_string(),
            ),
        };
        HandlerError::new(kind, message)
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = match self.kind {
            HandlerErrorKind::Validation | HandlerErrorKind::Duplicate => StatusCode::BAD_REQUEST,
            HandlerErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            HandlerErrorKind::Forbidden => StatusCode::FORBIDDEN,
            HandlerErrorKind::NotFound => StatusCode::NOT_FOUND,
            HandlerErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({
            "success": false,
            "message": self.message,
            "errors": self.errors,
        }));
        (status, body).into_response()
    }
}
