//! Error handling for yagura-http
//!
//! This module maps core errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::cmp::PartialEq;
use yagura_core::{ConfigError, ServiceError};

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Service layer error
    Service(ServiceError),

    /// Configuration error
    Config(ConfigError),

    /// Internal error
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl PartialEq<StatusCode> for AppError {
    fn eq(&self, status_code: &StatusCode) -> bool {
        let (error_status, _) = self.status_and_message();
        &error_status == status_code
    }
}

impl AppError {
    /// Get the status code and error message for this error
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Service(err @ ServiceError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            Self::Service(err @ ServiceError::Timeout(_)) => {
                (StatusCode::GATEWAY_TIMEOUT, err.to_string())
            }
            Self::Service(err @ ServiceError::Api(_)) => (StatusCode::BAD_GATEWAY, err.to_string()),
            Self::Service(err @ ServiceError::EmptyResponse(_)) => {
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            Self::Service(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Self::Config(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn missing_service_maps_to_not_found() {
        let err = AppError::from(ServiceError::NotFound("azure_openai".to_string()));
        assert_eq!(err, StatusCode::NOT_FOUND);
    }

    #[test]
    fn upstream_timeout_maps_to_gateway_timeout() {
        let err = AppError::from(ServiceError::Timeout(Duration::from_secs(5)));
        assert_eq!(err, StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn config_error_maps_to_internal() {
        let err = AppError::from(ConfigError::ServiceNotConfigured("neo4j".to_string()));
        assert_eq!(err, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_error_keeps_message() {
        let err = AppError::Internal("boom".to_string());
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "boom");
    }
}
