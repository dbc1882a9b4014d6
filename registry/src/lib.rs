//! # Fibre Registry
//!
//! A thread-safe service registry that maps abstractions (usually `dyn Trait`
//! types) to a rule for producing them: either construct a new instance of a
//! concrete type per request, or always hand out one shared instance.
//!
//! Calling code depends only on the abstraction; startup code or a
//! configuration document decides which concrete type backs it. Nothing is
//! discovered automatically, every binding is explicit.
//!
//! ## Core Concepts
//!
//! - **ConcreteType**: a descriptor listing which abstractions a type may be
//!   handed out as, and which constructors it offers, keyed by exact
//!   parameter signature.
//! - **Binding**: the record for one abstraction, in factory or singleton mode.
//! - **ServiceRegistry**: the table of bindings. Create one per application
//!   (or per test); a process-wide instance is available via `global()`.
//! - **Configuration**: the `config` module applies `serviceRegistry`
//!   documents through a [`TypeResolver`] such as [`TypeCatalog`].
//!
//! ## Quick Start
//!
//! ```
//! use fibre_registry::{args, ConcreteType, RegistryError, ServiceRegistry};
//!
//! trait DirectoryHandle: Send + Sync {
//!   fn path(&self) -> &str;
//! }
//!
//! struct LocalDirectory {
//!   path: String,
//! }
//!
//! impl DirectoryHandle for LocalDirectory {
//!   fn path(&self) -> &str {
//!     &self.path
//!   }
//! }
//!
//! let local = ConcreteType::builder::<LocalDirectory>()
//!   .implements::<dyn DirectoryHandle>(|c| c)
//!   .constructor(|(path,): (String,)| LocalDirectory { path })
//!   .build();
//!
//! let registry = ServiceRegistry::new();
//! registry.bind_to::<dyn DirectoryHandle>(local).unwrap();
//!
//! let handle = registry
//!   .get::<dyn DirectoryHandle>(args![String::from("c:\\")])
//!   .unwrap();
//! assert_eq!(handle.path(), "c:\\");
//!
//! // No parameterless constructor was registered.
//! let err = registry.find::<dyn DirectoryHandle>().err().unwrap();
//! assert!(matches!(err, RegistryError::NoMatchingConstructor { .. }));
//! ```

mod args;
mod binding;
mod catalog;
mod concrete;
pub mod config;
mod diagnostics;
mod error;
mod global;
mod macros;
mod registry;
mod types;

pub use args::{Args, Params};
pub use binding::{Binding, BindingMode};
pub use catalog::{TypeCatalog, TypeResolver};
pub use concrete::{ConcreteType, ConcreteTypeBuilder, Instance};
pub use diagnostics::{DiagnosticsSink, NullSink, RegistryEvent, TracingSink};
pub use error::{BoxError, ConfigError, RegistryError, Result};
pub use global::global;
pub use registry::ServiceRegistry;
pub use types::{AbstractTypeId, Signature, TypeKey};
