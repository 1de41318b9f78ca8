use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::app::error::{ErrorKind, ServiceError};
use crate::app::validation::FieldError;
use crate::domain::user::Tier;

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    kind: Option<ErrorKind>,
    message: String,
    errors: Vec<FieldError>,
    tiers: Option<(Option<Tier>, Tier)>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    required_subscription: Option<Tier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_subscription: Option<Tier>,
}

impl AppError {
    fn new(status: StatusCode, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status,
            kind: Some(kind),
            message: message.into(),
            errors: Vec::new(),
            tiers: None,
        }
    }

    /// Maps a service failure to its response. Store failures are logged
    /// with `context` and reported without internal detail.
    pub fn from_service(err: ServiceError, context: &str) -> Self {
        match err {
            ServiceError::Validation(errors) => Self {
                errors,
                ..Self::new(
                    StatusCode::BAD_REQUEST,
                    ErrorKind::ValidationFailed,
                    "Validation failed",
                )
            },
            ServiceError::Unauthenticated(message) => Self::unauthorized(message),
            ServiceError::Forbidden {
                message,
                current,
                required,
            } => Self {
                tiers: Some((current, required)),
                ..Self::new(StatusCode::FORBIDDEN, ErrorKind::Forbidden, message)
            },
            ServiceError::NotFound(message) => Self::not_found(message),
            ServiceError::Conflict(message) => Self::conflict(message),
            ServiceError::Unavailable(err) => {
                tracing::error!(error = ?err, "{}", context);
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorKind::Unavailable,
                    format!("Server error while {}", context),
                )
            }
        }
    }

    pub fn bad_request(field: &str, message: impl Into<String>) -> Self {
        Self::from_service(ServiceError::invalid(field, message), "validating request")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ErrorKind::NotFound, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ErrorKind::Unauthenticated, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, ErrorKind::Conflict, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            kind: None,
            message: message.into(),
            errors: Vec::new(),
            tiers: None,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("body", rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (current_subscription, required_subscription) = match self.tiers {
            Some((current, required)) => (current, Some(required)),
            None => (None, None),
        };
        let body = Json(ErrorResponse {
            message: self.message,
            kind: self.kind,
            errors: self.errors,
            required_subscription,
            current_subscription,
        });
        (self.status, body).into_response()
    }
}
