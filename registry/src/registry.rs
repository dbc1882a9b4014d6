//! The `ServiceRegistry`: the table of bindings and its public API.

use crate::args::Args;
use crate::binding::Binding;
use crate::concrete::{ConcreteType, Instance};
use crate::diagnostics::{DiagnosticsSink, RegistryEvent, TracingSink};
use crate::error::{RegistryError, Result};
use crate::types::AbstractTypeId;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// A thread-safe registry mapping abstractions to bindings.
///
/// The table lock is held only to find, insert or remove a [`Binding`]
/// reference. Everything else (type checks, mode switches, construction)
/// happens under the binding's own lock or with no lock at all, so resolving
/// one abstraction never blocks work on another.
///
/// ```
/// use fibre_registry::{args, ConcreteType, ServiceRegistry};
///
/// trait Greeter: Send + Sync {
///   fn greet(&self) -> String;
/// }
///
/// struct Named(String);
///
/// impl Greeter for Named {
///   fn greet(&self) -> String {
///     format!("Hello, {}!", self.0)
///   }
/// }
///
/// let named = ConcreteType::builder::<Named>()
///   .implements::<dyn Greeter>(|c| c)
///   .constructor(|(name,): (String,)| Named(name))
///   .build();
///
/// let registry = ServiceRegistry::new();
/// registry.bind_to::<dyn Greeter>(named).unwrap();
///
/// let greeter = registry.get::<dyn Greeter>(args!["World".to_string()]).unwrap();
/// assert_eq!(greeter.greet(), "Hello, World!");
/// ```
pub struct ServiceRegistry {
  bindings: RwLock<HashMap<AbstractTypeId, Arc<Binding>>>,
  sink: Arc<dyn DiagnosticsSink>,
}

impl Default for ServiceRegistry {
  fn default() -> Self {
    Self::new()
  }
}

impl ServiceRegistry {
  /// Creates an empty registry reporting to [`TracingSink`].
  pub fn new() -> Self {
    Self::with_sink(Arc::new(TracingSink))
  }

  pub fn with_sink(sink: Arc<dyn DiagnosticsSink>) -> Self {
    Self {
      bindings: RwLock::new(HashMap::new()),
      sink,
    }
  }

  // --- PRIVATE HELPERS ---

  fn lookup(&self, abstract_type: &AbstractTypeId) -> Option<Arc<Binding>> {
    self.bindings.read().get(abstract_type).cloned()
  }

  fn lookup_or_insert(&self, abstract_type: AbstractTypeId) -> Arc<Binding> {
    if let Some(binding) = self.lookup(&abstract_type) {
      return binding;
    }
    let mut bindings = self.bindings.write();
    Arc::clone(
      bindings
        .entry(abstract_type)
        .or_insert_with(|| Arc::new(Binding::new(abstract_type))),
    )
  }

  pub(crate) fn notify(&self, event: RegistryEvent) {
    let sink = &self.sink;
    // A failing sink must not fail the operation that triggered it.
    let _ = panic::catch_unwind(AssertUnwindSafe(|| sink.record(&event)));
  }

  // --- Binding ---

  /// Binds `abstract_type` to `concrete` in factory mode, creating the binding
  /// if needed. Fails with [`RegistryError::TypeMismatch`] if `concrete` does
  /// not implement the abstraction; an existing binding is then left as it was.
  pub fn bind(&self, abstract_type: AbstractTypeId, concrete: Arc<ConcreteType>) -> Result<()> {
    let concrete_type = concrete.key();
    self.lookup_or_insert(abstract_type).set_concrete(concrete)?;
    self.notify(RegistryEvent::BindingSet {
      abstract_type,
      concrete_type,
    });
    Ok(())
  }

  /// Binds `abstract_type` to `instance` in singleton mode.
  pub fn bind_singleton(&self, abstract_type: AbstractTypeId, instance: Instance) -> Result<()> {
    let concrete_type = instance.concrete_type().key();
    self.lookup_or_insert(abstract_type).set_singleton(instance)?;
    self.notify(RegistryEvent::SingletonSet {
      abstract_type,
      concrete_type,
    });
    Ok(())
  }

  pub fn bind_to<I: ?Sized + Any>(&self, concrete: Arc<ConcreteType>) -> Result<()> {
    self.bind(AbstractTypeId::of::<I>(), concrete)
  }

  pub fn bind_instance<I: ?Sized + Any>(&self, instance: Instance) -> Result<()> {
    self.bind_singleton(AbstractTypeId::of::<I>(), instance)
  }

  /// Removes the binding for `abstract_type`. Unbinding something that was never
  /// bound is not an error. Returns whether a binding was removed.
  ///
  /// Singleton instances are not dropped here if resolvers still hold them.
  pub fn unbind_id(&self, abstract_type: &AbstractTypeId) -> bool {
    let removed = self.bindings.write().remove(abstract_type);
    match removed {
      Some(_) => {
        self.notify(RegistryEvent::BindingCleared {
          abstract_type: *abstract_type,
        });
        true
      }
      None => false,
    }
  }

  pub fn unbind<I: ?Sized + Any>(&self) -> bool {
    self.unbind_id(&AbstractTypeId::of::<I>())
  }

  /// Removes every binding in one step with respect to concurrent binds and
  /// unbinds. Resolutions already in flight finish against the old bindings.
  pub fn clear(&self) {
    let removed = std::mem::take(&mut *self.bindings.write());
    self.notify(RegistryEvent::AllBindingsCleared {
      count: removed.len(),
    });
  }

  // --- Resolution ---

  /// Resolves `I` with the given constructor arguments.
  ///
  /// Fails with [`RegistryError::NotBound`] if nothing is bound for `I`;
  /// every other error comes from the binding itself.
  pub fn get<I: ?Sized + Any + Send + Sync>(&self, args: Args) -> Result<Arc<I>> {
    let abstract_type = AbstractTypeId::of::<I>();
    let Some(binding) = self.lookup(&abstract_type) else {
      self.notify(RegistryEvent::BindingNotFound { abstract_type });
      return Err(RegistryError::NotBound(abstract_type));
    };
    binding.resolve::<I>(args)
  }

  /// Like [`get`](Self::get), but an unbound abstraction yields `Ok(None)`.
  pub fn try_get<I: ?Sized + Any + Send + Sync>(&self, args: Args) -> Result<Option<Arc<I>>> {
    match self.lookup(&AbstractTypeId::of::<I>()) {
      Some(binding) => binding.resolve::<I>(args).map(Some),
      None => Ok(None),
    }
  }

  /// [`try_get`](Self::try_get) with no constructor arguments.
  pub fn find<I: ?Sized + Any + Send + Sync>(&self) -> Result<Option<Arc<I>>> {
    self.try_get::<I>(Args::new())
  }

  // --- Introspection ---

  pub fn binding(&self, abstract_type: &AbstractTypeId) -> Option<Arc<Binding>> {
    self.lookup(abstract_type)
  }

  pub fn is_bound(&self, abstract_type: &AbstractTypeId) -> bool {
    self.bindings.read().contains_key(abstract_type)
  }

  pub fn len(&self) -> usize {
    self.bindings.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.bindings.read().is_empty()
  }

  /// A point-in-time copy of the table. Singletons report the runtime type of
  /// their instance; unconfigured bindings are left out.
  pub fn snapshot_bindings(&self) -> HashMap<AbstractTypeId, Arc<ConcreteType>> {
    let bindings: Vec<(AbstractTypeId, Arc<Binding>)> = self
      .bindings
      .read()
      .iter()
      .map(|(id, binding)| (*id, Arc::clone(binding)))
      .collect();
    bindings
      .into_iter()
      .filter_map(|(id, binding)| binding.concrete_type().map(|concrete| (id, concrete)))
      .collect()
  }
}

impl Drop for ServiceRegistry {
  fn drop(&mut self) {
    let sink = &self.sink;
    let _ = panic::catch_unwind(AssertUnwindSafe(|| sink.shutdown()));
  }
}

impl std::fmt::Debug for ServiceRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ServiceRegistry")
      .field("bindings", &self.len())
      .finish()
  }
}
