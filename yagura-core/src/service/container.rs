//! The eager singleton container.

use dashmap::DashMap;
use std::{any::Any, sync::Arc};
use tracing::{debug, info};

use super::types::{ServiceConstructor, ServiceError, ServiceResult, SharedService};
use crate::config::Settings;

/// Holds one instance per registered service name.
///
/// Instances are constructed eagerly at registration time and live for the
/// container's lifetime; there is no lazy instantiation and no scoping.
/// Registering a name again replaces the previous instance without a
/// teardown hook. The map is written during bootstrap and read-only
/// afterwards.
#[derive(Default)]
pub struct ServiceContainer {
    services: DashMap<String, SharedService>,
}

impl ServiceContainer {
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
        }
    }

    /// Invoke `constructor` now and store the instance under `name`.
    ///
    /// A prior instance under the same name is silently replaced.
    pub fn register(
        &self,
        name: &str,
        constructor: ServiceConstructor,
        settings: &Settings,
    ) -> ServiceResult<()> {
        let instance = constructor(settings)?;
        if self.services.insert(name.to_string(), instance).is_some() {
            debug!(service = name, "replaced existing service instance");
        }
        info!(service = name, "registered service");
        Ok(())
    }

    /// Retrieve the instance registered under `name`, downcast to `T`.
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> ServiceResult<Arc<T>> {
        let instance = self
            .services
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ServiceError::NotFound(name.to_string()))?;
        instance
            .downcast::<T>()
            .map_err(|_| ServiceError::TypeMismatch(name.to_string()))
    }

    /// Whether an instance is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Names of all registered services.
    pub fn names(&self) -> Vec<String> {
        self.services
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
