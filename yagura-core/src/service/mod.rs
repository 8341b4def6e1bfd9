//! Service registration and the singleton container.
//!
//! A service is a process-wide singleton constructed once at startup from the
//! loaded [`Settings`](crate::config::Settings) and retrieved from the
//! [`ServiceContainer`] by name. Built-in modules contribute a registration
//! hook to [`registry::manifest`]; embedders add their own name/constructor
//! pairs at bootstrap time.

pub mod azure_openai;
pub mod container;
pub mod logging;
pub mod registry;
pub mod types;

pub use azure_openai::{AzureOpenAiService, CompletionOptions, GenerateOptions};
pub use container::ServiceContainer;
pub use logging::LoggingService;
pub use registry::{ServiceRegistration, discover_services, manifest};
pub use types::{ServiceConstructor, ServiceError, ServiceResult, SharedService};
