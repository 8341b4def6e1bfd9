//! Application bootstrap and HTTP server.
//!
//! [`initialize_app`] runs the startup sequence: construct every service in
//! the manifest, then custom services, then attach the plugin routes. It is
//! split from [`serve`] so tests can drive the assembled router without
//! binding a socket.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, routing::get};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use yagura_core::{
    ServiceContainer, ServiceError, ServiceRegistration, Settings, discover_services,
};

use crate::models::{
    CompletionRequest, CompletionResponse, CustomCompletionRequest, EmbeddingRequest,
    EmbeddingResponse, StatusResponse,
};
use crate::plugins::{self, PluginError, PluginSetup};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Settings the services were constructed from
    pub settings: Arc<Settings>,

    /// Constructed service instances
    pub container: Arc<ServiceContainer>,

    /// Attached plugin names, in attach order
    pub plugins: Arc<Vec<String>>,

    /// When the application was assembled
    pub started_at: Instant,
}

/// Assembled application: router plus the state behind it
pub struct App {
    pub router: Router,
    pub state: AppState,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App").finish_non_exhaustive()
    }
}

/// Startup failure
#[derive(Error, Debug)]
pub enum InitError {
    #[error("Service initialization failed: {0}")]
    Service(#[from] ServiceError),

    #[error("Plugin initialization failed: {0}")]
    Plugin(#[from] PluginError),
}

#[derive(OpenApi)]
#[openapi(
    paths(
        plugins::status::get_status,
        plugins::completions::create_completion,
        plugins::completions::create_custom_completion,
        plugins::embeddings::create_embedding
    ),
    components(schemas(
        CompletionRequest,
        CustomCompletionRequest,
        CompletionResponse,
        EmbeddingRequest,
        EmbeddingResponse,
        StatusResponse
    ))
)]
struct ApiDoc;

/// Run the startup sequence and assemble the application.
///
/// Built-in services are constructed first, then `custom_services`, so a
/// custom registration under a built-in name replaces the built-in instance.
/// Plugins attach afterwards, built-ins before `custom_plugins`. Any
/// constructor or setup hook failure aborts startup.
pub fn initialize_app(
    settings: Arc<Settings>,
    custom_services: Vec<ServiceRegistration>,
    custom_plugins: Vec<PluginSetup>,
) -> Result<App, InitError> {
    let container = Arc::new(ServiceContainer::new());

    for registration in discover_services()? {
        container.register(registration.name, registration.constructor, &settings)?;
    }
    for registration in custom_services {
        info!(service = registration.name, "registering custom service");
        container.register(registration.name, registration.constructor, &settings)?;
    }

    let mut setups = plugins::manifest();
    setups.extend(custom_plugins);

    let (router, attached) = plugins::attach_plugins(Router::new(), &container, &setups)?;

    let state = AppState {
        settings,
        container,
        plugins: Arc::new(attached),
        started_at: Instant::now(),
    };

    let router = router
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state.clone());

    Ok(App { router, state })
}

/// Serve the generated OpenAPI document
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Start the HTTP server
pub async fn serve(config: ServerConfig, app: App) -> Result<(), Box<dyn std::error::Error>> {
    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = app.router.layer(TraceLayer::new_for_http()).layer(cors);

    // Parse the socket address
    let addr = format!("{}:{}", config.host, config.port).parse::<SocketAddr>()?;

    info!("Starting server on {}", addr);

    // In axum 0.8.x, we use this pattern to start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
