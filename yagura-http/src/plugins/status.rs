//! Liveness and status plugin.

use axum::{Router, extract::State, http::StatusCode, response::Json, routing::get};
use yagura_core::ServiceContainer;

use super::{PluginResult, PluginRoutes};
use crate::models::StatusResponse;
use crate::server::AppState;

pub const PLUGIN_NAME: &str = "status";

/// Create the status routes. This plugin has no service dependencies.
pub fn setup_routes(_container: &ServiceContainer) -> PluginResult<PluginRoutes> {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/v1/status", get(get_status));
    Ok(PluginRoutes {
        name: PLUGIN_NAME,
        router,
    })
}

/// Health check endpoint
async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Get application status
///
/// Reports the crate version together with the registered service names and
/// the attached plugin names.
#[utoipa::path(
    get,
    path = "/v1/status",
    responses(
        (status = 200, description = "Application status", body = StatusResponse)
    )
)]
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let mut services = state.container.names();
    services.sort();

    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        services,
        plugins: state.plugins.as_ref().clone(),
    })
}
