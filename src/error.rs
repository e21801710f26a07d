use crate::routes::helpers::{write_json, Envelope};
use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use validator::ValidationErrors;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid id parameter")]
    InvalidIdentifier,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("malformed duration: {0}")]
    MalformedDuration(String),

    #[error("Invalid database connection string: {0}")]
    ConnectionStringInvalid(String),

    #[error("Invalid max idle time: {0}")]
    InvalidIdleDuration(String),

    #[error("Database unreachable: {0}")]
    DatabaseUnreachable(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("the requested resource could not be found")]
    NotFound,

    #[error("the {0} method is not supported for this resource")]
    MethodNotAllowed(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Environment variable missing: {0}")]
    MissingEnvVar(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Body carried under the `"error"` key of an error envelope.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Message(String),
    Fields(BTreeMap<String, String>),
}

impl AppError {
    /// Status code and client-facing body for this error.
    ///
    /// Server-side failures are logged here and replaced with a generic
    /// message so internal details never reach the client.
    fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::InvalidIdentifier | AppError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorBody::Message(AppError::NotFound.to_string()),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorBody::Message(msg.clone())),
            AppError::MalformedDuration(_) => {
                (StatusCode::BAD_REQUEST, ErrorBody::Message(self.to_string()))
            }
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody::Fields(validation_messages(errors)),
            ),
            AppError::MethodNotAllowed(_) => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorBody::Message(self.to_string()),
            ),
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {:?}", e);
                internal_error()
            }
            _ => {
                tracing::error!("Internal error: {}", self);
                internal_error()
            }
        }
    }
}

fn internal_error() -> (StatusCode, ErrorBody) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorBody::Message(
            "the server encountered a problem and could not process your request".to_string(),
        ),
    )
}

/// Flatten validator output into one message per field.
fn validation_messages(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                (field.to_string(), message)
            })
        })
        .collect()
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();

        match write_json(status, &Envelope::new("error", body), HeaderMap::new()) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Failed to encode error envelope: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Result type alias for AppResult
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct TitleInput {
        #[validate(length(min = 1, message = "must be provided"))]
        title: String,
    }

    #[test]
    fn test_invalid_identifier_maps_to_not_found() {
        let (status, body) = AppError::InvalidIdentifier.status_and_body();
        assert_eq!(status, StatusCode::NOT_FOUND);
        match body {
            ErrorBody::Message(msg) => {
                assert_eq!(msg, "the requested resource could not be found")
            }
            ErrorBody::Fields(_) => panic!("expected message body"),
        }
    }

    #[test]
    fn test_internal_details_are_not_disclosed() {
        let err = AppError::DatabaseUnreachable("connection refused on 10.0.0.5".to_string());
        let (status, body) = err.status_and_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("10.0.0.5"));
    }

    #[test]
    fn test_validation_errors_become_field_map() {
        let errors = TitleInput {
            title: String::new(),
        }
        .validate()
        .unwrap_err();
        let (status, body) = AppError::Validation(errors).status_and_body();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["title"], "must be provided");
    }

    #[test]
    fn test_into_response_sets_json_content_type() {
        let response = AppError::BadRequest("body must not be empty".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
    }
}
