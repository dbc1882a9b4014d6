use crate::types::{AbstractTypeId, Signature, TypeKey};
use thiserror::Error;

/// An error raised by a concrete type's own constructor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for binding and resolution operations.
#[derive(Debug, Error)]
pub enum RegistryError {
  #[error("Invalid argument: {0}")]
  InvalidArgument(String),

  #[error("Type '{concrete_type}' is not assignable to '{abstract_type}'")]
  TypeMismatch {
    abstract_type: AbstractTypeId,
    concrete_type: TypeKey,
  },

  #[error("No binding registered for '{0}'")]
  NotBound(AbstractTypeId),

  #[error("Binding for '{0}' has neither a concrete type nor an instance")]
  Unconfigured(AbstractTypeId),

  #[error("Type '{concrete_type}' has no constructor with signature {signature}")]
  NoMatchingConstructor {
    concrete_type: TypeKey,
    signature: Signature,
  },

  /// Raised by the constructor itself. Display and `source()` are those of the
  /// inner error.
  #[error(transparent)]
  Construction(BoxError),
}

impl RegistryError {
  pub fn is_not_bound(&self) -> bool {
    matches!(self, RegistryError::NotBound(_))
  }
}

/// The error type for loading bindings from a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Failed to read configuration: {0}")]
  Read(#[from] std::io::Error),

  #[error("Failed to parse configuration: {0}")]
  Parse(String),

  #[error("Configuration has no 'serviceRegistry' root element")]
  MissingRoot,

  #[error("Directive '{directive}' is missing required attribute '{attribute}'")]
  MissingAttribute {
    directive: String,
    attribute: &'static str,
  },

  #[error("Directive '{directive}' has unrecognized attribute '{attribute}'")]
  UnknownAttribute { directive: String, attribute: String },

  #[error("Invalid value '{value}' for attribute '{attribute}'")]
  InvalidValue { attribute: &'static str, value: String },

  #[error("Unrecognized directive '{0}'")]
  UnknownDirective(String),

  #[error("Could not resolve {kind} type '{name}'")]
  UnresolvedType { kind: &'static str, name: String },

  #[error(transparent)]
  Registry(#[from] RegistryError),
}

/// A specialized `Result` type for registry operations.
pub type Result<T, E = RegistryError> = std::result::Result<T, E>;
