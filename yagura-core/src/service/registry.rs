//! Static registration manifest for the built-in services.
//!
//! Each built-in module exposes a `register_service` hook returning its
//! name/constructor pair; the manifest lists those hooks in registration
//! order. A module without a hook simply does not appear here.

use std::collections::HashSet;

use super::types::{ServiceConstructor, ServiceError, ServiceResult};
use super::{azure_openai, logging};

/// A named service constructor produced by a module's registration hook.
#[derive(Clone)]
pub struct ServiceRegistration {
    /// Container key the instance is stored under.
    pub name: &'static str,

    /// Factory invoked once at registration time.
    pub constructor: ServiceConstructor,
}

/// Registration hooks of the built-in service modules, in registration order.
///
/// Logging comes first so later constructors can rely on it being present.
pub fn manifest() -> Vec<ServiceRegistration> {
    vec![logging::register_service(), azure_openai::register_service()]
}

/// Collect the built-in registrations, failing fast on duplicate names.
pub fn discover_services() -> ServiceResult<Vec<ServiceRegistration>> {
    let registrations = manifest();
    validate_names(&registrations)?;
    Ok(registrations)
}

/// Reject duplicate names across a registration set.
pub fn validate_names(registrations: &[ServiceRegistration]) -> ServiceResult<()> {
    let mut seen = HashSet::new();
    for registration in registrations {
        if !seen.insert(registration.name) {
            return Err(ServiceError::DuplicateName(registration.name.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_lists_builtin_hooks_in_order() {
        let names: Vec<_> = manifest().iter().map(|r| r.name).collect();
        assert_eq!(names, vec![logging::SERVICE_NAME, azure_openai::SERVICE_NAME]);
    }

    #[test]
    fn discovery_accepts_builtin_manifest() {
        assert!(discover_services().is_ok());
    }

    #[test]
    fn duplicate_names_fail_fast() {
        let registrations = vec![logging::register_service(), logging::register_service()];
        let err = validate_names(&registrations).unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateName(name) if name == logging::SERVICE_NAME));
    }
}
