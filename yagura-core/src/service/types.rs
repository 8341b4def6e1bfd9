//! Shared service types.

use std::{any::Any, sync::Arc, time::Duration};

use thiserror::Error;

use crate::config::{ConfigError, Settings};

/// Type-erased singleton instance held by the container.
pub type SharedService = Arc<dyn Any + Send + Sync>;

/// Factory invoked once at registration time with the loaded settings.
pub type ServiceConstructor = fn(&Settings) -> ServiceResult<SharedService>;

/// Errors from service construction, lookup and calls.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Container lookup miss.
    #[error("Service not found: {0}")]
    NotFound(String),

    /// Registered under a different concrete type than requested.
    #[error("Service type mismatch: {0}")]
    TypeMismatch(String),

    /// Two registrations claim the same name.
    #[error("Duplicate service name: {0}")]
    DuplicateName(String),

    /// Required fields absent from the service's configuration section.
    #[error("Incomplete configuration: {0}")]
    IncompleteConfig(String),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The SDK call failed; the underlying error is preserved unchanged.
    #[error("API error: {0}")]
    Api(#[from] async_openai::error::OpenAIError),

    /// The response arrived without the expected content.
    #[error("Empty API response: {0}")]
    EmptyResponse(String),

    /// The configured request timeout elapsed.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Subscriber construction failed.
    #[error("Logging setup error: {0}")]
    LoggingInit(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
