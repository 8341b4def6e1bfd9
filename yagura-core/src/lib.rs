//! # Yagura Core
//!
//! Core building blocks for the yagura web-service scaffold.
//!
//! ## Modules
//!
//! - [`config`]: YAML settings with environment-variable overrides. Settings
//!   are loaded once at startup and handed down explicitly; there is no
//!   hidden global configuration state.
//! - [`service`]: the service registration manifest, the eager singleton
//!   container, and the built-in services (Azure OpenAI access, logging).
//!
//! ## Startup sequence
//!
//! The pieces compose in a fixed order: [`config::Settings`] are loaded and
//! shared as an `Arc`, the service manifest is validated and each registered
//! constructor runs eagerly against those settings, and the populated
//! [`service::ServiceContainer`] is handed to the HTTP layer, which wires
//! plugin route groups against it. Every failure along that path is fatal to
//! startup; nothing recovers partially.

pub mod config;
pub mod service;

// Re-exports
pub use config::{ConfigError, ConfigResult, EnvOverrides, Settings};
pub use service::*;

#[cfg(test)]
mod tests {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    #[ctor::ctor]
    fn init_tests() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}
