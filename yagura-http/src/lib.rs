//! Yagura HTTP API Server
//!
//! This crate provides the HTTP surface of the yagura scaffold: feature
//! plugins contribute routes over a shared service container, and the
//! bootstrap in [`server`] assembles them into one axum application.

pub mod error;
pub mod models;
pub mod plugins;
pub mod server;

use std::sync::Arc;

use plugins::PluginSetup;
use server::{ServerConfig, initialize_app, serve};
use yagura_core::{LoggingService, ServiceRegistration, Settings};

/// Start the yagura server with the built-in services and plugins
pub async fn start(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    start_with_extensions(config, Vec::new(), Vec::new()).await
}

/// Start the yagura server with additional services and plugins
pub async fn start_with_extensions(
    config: ServerConfig,
    custom_services: Vec<ServiceRegistration>,
    custom_plugins: Vec<PluginSetup>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Arc::new(Settings::load(None)?);

    // The guard flushes file log lines; it must live until shutdown.
    let _guard = LoggingService::new(&settings).init_global()?;

    let app = initialize_app(settings, custom_services, custom_plugins)?;
    serve(config, app).await
}
