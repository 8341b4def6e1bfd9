//! Route plugins
//!
//! Every feature surface of the HTTP API is a plugin: a named setup hook
//! that checks its service dependencies against the container and returns a
//! router for its paths. The manifest lists the built-in hooks in attach
//! order; [`attach_plugins`] runs a hook list and merges the results onto
//! the application router.

use axum::Router;
use thiserror::Error;
use tracing::info;
use yagura_core::{ServiceContainer, ServiceError};

use crate::server::AppState;

pub mod completions;
pub mod embeddings;
pub mod status;

/// Routes contributed by a single plugin.
pub struct PluginRoutes {
    /// Name reported by the status endpoint, unique per app.
    pub name: &'static str,

    /// Router merged onto the application router.
    pub router: Router<AppState>,
}

/// Plugin setup hook.
///
/// Runs once at startup, after every service is constructed. A hook that
/// cannot find the services it needs fails here instead of at request time.
pub type PluginSetup = fn(&ServiceContainer) -> PluginResult<PluginRoutes>;

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Duplicate plugin name: {0}")]
    DuplicateName(String),

    #[error("Plugin setup failed: {0}")]
    Setup(#[from] ServiceError),
}

pub type PluginResult<T> = Result<T, PluginError>;

/// Built-in plugin hooks, in attach order.
pub fn manifest() -> Vec<PluginSetup> {
    vec![
        status::setup_routes,
        completions::setup_routes,
        embeddings::setup_routes,
    ]
}

/// Run each hook in `setups` and merge its routes onto `router`.
///
/// Stops at the first failing hook or duplicate name. Returns the merged
/// router together with the attached plugin names, in attach order.
pub fn attach_plugins(
    mut router: Router<AppState>,
    container: &ServiceContainer,
    setups: &[PluginSetup],
) -> PluginResult<(Router<AppState>, Vec<String>)> {
    let mut attached: Vec<String> = Vec::with_capacity(setups.len());
    for setup in setups {
        let plugin = setup(container)?;
        if attached.iter().any(|name| name == plugin.name) {
            return Err(PluginError::DuplicateName(plugin.name.to_string()));
        }
        info!(plugin = plugin.name, "attaching plugin routes");
        router = router.merge(plugin.router);
        attached.push(plugin.name.to_string());
    }
    Ok((router, attached))
}
