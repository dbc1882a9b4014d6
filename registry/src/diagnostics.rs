//! Diagnostics emitted by the registry.
//!
//! Sinks are write-only. The registry calls them synchronously on the calling
//! thread with no locks held, and a panicking sink never fails a registry
//! operation.

use crate::types::{AbstractTypeId, TypeKey};

/// Something noteworthy that happened inside a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
  /// A factory binding was set.
  BindingSet {
    abstract_type: AbstractTypeId,
    concrete_type: TypeKey,
  },
  /// A singleton binding was set. `concrete_type` is the instance's runtime type.
  SingletonSet {
    abstract_type: AbstractTypeId,
    concrete_type: TypeKey,
  },
  BindingCleared {
    abstract_type: AbstractTypeId,
  },
  AllBindingsCleared {
    count: usize,
  },
  BindingNotFound {
    abstract_type: AbstractTypeId,
  },
  InvalidConfiguration {
    message: String,
  },
  InitializationStarted {
    source: String,
  },
}

/// Receives [`RegistryEvent`]s.
pub trait DiagnosticsSink: Send + Sync {
  fn record(&self, event: &RegistryEvent);

  /// Called once when the owning registry is dropped.
  fn shutdown(&self) {}
}

/// The default sink: forwards every event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
  fn record(&self, event: &RegistryEvent) {
    match event {
      RegistryEvent::BindingSet {
        abstract_type,
        concrete_type,
      } => tracing::info!(
        target: "fibre_registry",
        abstract_type = %abstract_type,
        concrete_type = %concrete_type,
        "Binding set"
      ),
      RegistryEvent::SingletonSet {
        abstract_type,
        concrete_type,
      } => tracing::info!(
        target: "fibre_registry",
        abstract_type = %abstract_type,
        concrete_type = %concrete_type,
        "Singleton binding set"
      ),
      RegistryEvent::BindingCleared { abstract_type } => tracing::info!(
        target: "fibre_registry",
        abstract_type = %abstract_type,
        "Binding cleared"
      ),
      RegistryEvent::AllBindingsCleared { count } => {
        tracing::info!(target: "fibre_registry", count, "All bindings cleared")
      }
      RegistryEvent::BindingNotFound { abstract_type } => tracing::warn!(
        target: "fibre_registry",
        abstract_type = %abstract_type,
        "Binding not found"
      ),
      RegistryEvent::InvalidConfiguration { message } => tracing::warn!(
        target: "fibre_registry",
        reason = %message,
        "Invalid configuration"
      ),
      RegistryEvent::InitializationStarted { source } => tracing::debug!(
        target: "fibre_registry",
        source = %source,
        "Initialization started"
      ),
    }
  }
}

/// Discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
  fn record(&self, _event: &RegistryEvent) {}
}
