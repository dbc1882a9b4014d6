//! The per-abstraction binding record.

use crate::args::Args;
use crate::concrete::{ConcreteType, Instance};
use crate::error::{RegistryError, Result};
use crate::types::AbstractTypeId;
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;

/// How a binding produces instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingMode {
  /// A new instance of the concrete type is constructed per request.
  Factory,
  /// The same held instance is returned to every request.
  Singleton,
}

enum BindingState {
  Unconfigured,
  Factory(Arc<ConcreteType>),
  Singleton {
    concrete: Arc<ConcreteType>,
    // An `Arc<I>` for this binding's abstraction `I`, boxed.
    object: Box<dyn Any + Send + Sync>,
  },
}

/// How to satisfy requests for a single abstraction: either a factory rule or a
/// held singleton, never both.
///
/// All fields sit behind the binding's own lock, independent of the table's
/// lock. Constructors run after that lock is released.
pub struct Binding {
  abstract_type: AbstractTypeId,
  state: Mutex<BindingState>,
}

impl Binding {
  /// Creates an unconfigured binding. It resolves to
  /// [`RegistryError::Unconfigured`] until a concrete type or instance is set.
  pub fn new(abstract_type: AbstractTypeId) -> Self {
    Self {
      abstract_type,
      state: Mutex::new(BindingState::Unconfigured),
    }
  }

  pub fn abstract_type(&self) -> AbstractTypeId {
    self.abstract_type
  }

  /// The current mode, or `None` while unconfigured.
  pub fn mode(&self) -> Option<BindingMode> {
    match &*self.state.lock() {
      BindingState::Unconfigured => None,
      BindingState::Factory(_) => Some(BindingMode::Factory),
      BindingState::Singleton { .. } => Some(BindingMode::Singleton),
    }
  }

  /// The concrete type instances are built from, or for a singleton, the
  /// runtime type of the held instance.
  pub fn concrete_type(&self) -> Option<Arc<ConcreteType>> {
    match &*self.state.lock() {
      BindingState::Unconfigured => None,
      BindingState::Factory(concrete) => Some(Arc::clone(concrete)),
      BindingState::Singleton { concrete, .. } => Some(Arc::clone(concrete)),
    }
  }

  /// Switches to factory mode. On a type mismatch the previous state is kept.
  pub fn set_concrete(&self, concrete: Arc<ConcreteType>) -> Result<()> {
    if !concrete.is_assignable_to(&self.abstract_type) {
      return Err(RegistryError::TypeMismatch {
        abstract_type: self.abstract_type,
        concrete_type: concrete.key(),
      });
    }
    self.replace_state(BindingState::Factory(concrete));
    Ok(())
  }

  /// Switches to singleton mode holding `instance`. On a type mismatch the
  /// previous state is kept.
  pub fn set_singleton(&self, instance: Instance) -> Result<()> {
    let concrete = Arc::clone(instance.concrete_type());
    if !concrete.is_assignable_to(&self.abstract_type) {
      return Err(RegistryError::TypeMismatch {
        abstract_type: self.abstract_type,
        concrete_type: concrete.key(),
      });
    }
    // The upcast thunk is caller code; run it before taking the lock.
    let object = instance.into_upcast(&self.abstract_type)?;
    self.replace_state(BindingState::Singleton { concrete, object });
    Ok(())
  }

  // The previous state may own the last reference to a replaced singleton,
  // whose `Drop` must not run under the lock.
  fn replace_state(&self, state: BindingState) {
    let previous = std::mem::replace(&mut *self.state.lock(), state);
    drop(previous);
  }

  /// Produces an instance for this binding.
  ///
  /// In singleton mode `args` are ignored and the held instance is returned.
  /// In factory mode the constructor whose signature exactly matches `args`
  /// is invoked; its own errors come back as [`RegistryError::Construction`].
  pub fn resolve<I: ?Sized + Any + Send + Sync>(&self, args: Args) -> Result<Arc<I>> {
    let requested = AbstractTypeId::of::<I>();
    if requested != self.abstract_type {
      return Err(RegistryError::InvalidArgument(format!(
        "binding for '{}' cannot resolve '{}'",
        self.abstract_type, requested
      )));
    }

    let concrete = {
      let state = self.state.lock();
      match &*state {
        BindingState::Unconfigured => {
          return Err(RegistryError::Unconfigured(self.abstract_type));
        }
        BindingState::Singleton { concrete, object } => {
          return object
            .downcast_ref::<Arc<I>>()
            .cloned()
            .ok_or(RegistryError::TypeMismatch {
              abstract_type: self.abstract_type,
              concrete_type: concrete.key(),
            });
        }
        BindingState::Factory(concrete) => Arc::clone(concrete),
      }
    };

    let instance = concrete.construct(args)?;
    let object = instance.into_upcast(&self.abstract_type)?;
    object
      .downcast::<Arc<I>>()
      .map(|boxed| *boxed)
      .map_err(|_| RegistryError::TypeMismatch {
        abstract_type: self.abstract_type,
        concrete_type: concrete.key(),
      })
  }
}

impl std::fmt::Debug for Binding {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Binding")
      .field("abstract_type", &self.abstract_type)
      .field("mode", &self.mode())
      .finish()
  }
}
