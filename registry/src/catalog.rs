//! Name-based lookup of abstractions and concrete types, used when bindings
//! come from a configuration document.

use crate::concrete::ConcreteType;
use crate::types::AbstractTypeId;
use dashmap::DashMap;
use std::any::Any;
use std::sync::Arc;

/// Resolves type names found in configuration to registry types.
pub trait TypeResolver {
  fn abstract_type(&self, name: &str) -> Option<AbstractTypeId>;
  fn concrete_type(&self, name: &str) -> Option<Arc<ConcreteType>>;
}

/// A thread-safe [`TypeResolver`] filled in explicitly by the application.
///
/// Registering a concrete type also makes its name usable as an abstraction,
/// so a concrete type can be bound to itself.
#[derive(Default)]
pub struct TypeCatalog {
  abstractions: DashMap<String, AbstractTypeId>,
  concretes: DashMap<String, Arc<ConcreteType>>,
}

impl TypeCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register_abstract<I: ?Sized + Any>(&self, name: impl Into<String>) -> &Self {
    self
      .abstractions
      .insert(name.into(), AbstractTypeId::of::<I>());
    self
  }

  pub fn register_concrete(&self, name: impl Into<String>, concrete: Arc<ConcreteType>) -> &Self {
    let name = name.into();
    self
      .abstractions
      .entry(name.clone())
      .or_insert_with(|| AbstractTypeId::from(concrete.key()));
    self.concretes.insert(name, concrete);
    self
  }
}

impl TypeResolver for TypeCatalog {
  fn abstract_type(&self, name: &str) -> Option<AbstractTypeId> {
    self.abstractions.get(name).map(|entry| *entry.value())
  }

  fn concrete_type(&self, name: &str) -> Option<Arc<ConcreteType>> {
    self
      .concretes
      .get(name)
      .map(|entry| Arc::clone(entry.value()))
  }
}
