//! The process-wide registry instance and its accessor.

use crate::registry::ServiceRegistry;
use once_cell::sync::Lazy;

// Created on first access. Prefer passing an explicit `ServiceRegistry` where
// possible; this exists for code that needs ambient access.
static GLOBAL_REGISTRY: Lazy<ServiceRegistry> = Lazy::new(ServiceRegistry::new);

/// Provides a reference to the global registry.
///
/// # Examples
///
/// ```
/// use fibre_registry::{global, ConcreteType};
///
/// struct Clock;
///
/// fn register_services() {
///   let clock = ConcreteType::builder::<Clock>()
///     .constructor(|(): ()| Clock)
///     .build();
///   global().bind_to::<Clock>(clock).unwrap();
/// }
///
/// register_services();
/// assert!(global().find::<Clock>().unwrap().is_some());
/// ```
pub fn global() -> &'static ServiceRegistry {
  &GLOBAL_REGISTRY
}
