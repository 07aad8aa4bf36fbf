use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::leads::{LeadFactoryError, RepositoryError, ValidationError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Payload(serde_json::Error),
    Lead(LeadFactoryError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Payload(err) => write!(f, "malformed payload: {}", err),
            AppError::Lead(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Payload(err) => Some(err),
            AppError::Lead(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Payload(_) => StatusCode::BAD_REQUEST,
            AppError::Lead(LeadFactoryError::InvalidArgument(_) | LeadFactoryError::Domain(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Lead(LeadFactoryError::Repository(RepositoryError::NotFound)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Lead(LeadFactoryError::Repository(RepositoryError::Conflict)) => {
                StatusCode::CONFLICT
            }
            AppError::Lead(LeadFactoryError::Repository(RepositoryError::Unavailable(_)))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Payload(value)
    }
}

impl From<LeadFactoryError> for AppError {
    fn from(value: LeadFactoryError) -> Self {
        Self::Lead(value)
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        Self::Lead(LeadFactoryError::InvalidArgument(value))
    }
}
