//! Descriptors for constructible concrete types.
//!
//! Rust has no runtime reflection, so a concrete type describes itself up
//! front: which abstractions it may be handed out as (each with an upcast
//! thunk performing the `Arc<C>` to `Arc<dyn I>` coercion), and which
//! constructors it offers, keyed by their exact parameter signature.

use crate::args::{Args, Params};
use crate::error::{BoxError, RegistryError, Result};
use crate::types::{AbstractTypeId, Signature, TypeKey};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

pub(crate) type Erased = Arc<dyn Any + Send + Sync>;

// Takes an erased `Arc<C>` and returns a boxed `Arc<I>`.
type Upcast = Box<dyn Fn(Erased) -> Option<Box<dyn Any + Send + Sync>> + Send + Sync>;

type ConstructFn = Box<dyn Fn(Args) -> Result<Erased> + Send + Sync>;

struct Constructor {
  signature: Signature,
  construct: ConstructFn,
}

/// A concrete type together with its assignability table and constructors.
///
/// Built once with [`ConcreteType::builder`] and shared behind an `Arc`.
pub struct ConcreteType {
  key: TypeKey,
  upcasts: HashMap<TypeId, Upcast>,
  constructors: Vec<Constructor>,
}

impl ConcreteType {
  pub fn builder<C: Any + Send + Sync>() -> ConcreteTypeBuilder<C> {
    ConcreteTypeBuilder::new()
  }

  pub fn key(&self) -> TypeKey {
    self.key
  }

  pub fn name(&self) -> &'static str {
    self.key.name()
  }

  /// Whether instances of this type may be handed out as `abstract_type`.
  pub fn is_assignable_to(&self, abstract_type: &AbstractTypeId) -> bool {
    self.upcasts.contains_key(&abstract_type.key().id())
  }

  pub fn signatures(&self) -> impl Iterator<Item = &Signature> {
    self.constructors.iter().map(|c| &c.signature)
  }

  pub fn has_constructor(&self, signature: &Signature) -> bool {
    self.signatures().any(|s| s == signature)
  }

  /// Wraps an existing value of this type so it can be bound as a singleton.
  pub fn instance<C: Any + Send + Sync>(self: &Arc<Self>, value: C) -> Result<Instance> {
    self.instance_arc(Arc::new(value))
  }

  /// Like [`instance`](Self::instance), for a value that is already shared.
  pub fn instance_arc<C: Any + Send + Sync>(self: &Arc<Self>, value: Arc<C>) -> Result<Instance> {
    if TypeId::of::<C>() != self.key.id() {
      return Err(RegistryError::InvalidArgument(format!(
        "instance of '{}' cannot be described by '{}'",
        std::any::type_name::<C>(),
        self.key
      )));
    }
    Ok(Instance {
      concrete: Arc::clone(self),
      object: value,
    })
  }

  /// Runs the constructor whose signature exactly matches `args`.
  pub(crate) fn construct(self: &Arc<Self>, args: Args) -> Result<Instance> {
    let signature = args.signature();
    let constructor = self
      .constructors
      .iter()
      .find(|c| c.signature == signature)
      .ok_or_else(|| RegistryError::NoMatchingConstructor {
        concrete_type: self.key,
        signature,
      })?;
    let object = (constructor.construct)(args)?;
    Ok(Instance {
      concrete: Arc::clone(self),
      object,
    })
  }

  pub(crate) fn upcast(
    &self,
    abstract_type: &AbstractTypeId,
    object: Erased,
  ) -> Result<Box<dyn Any + Send + Sync>> {
    self
      .upcasts
      .get(&abstract_type.key().id())
      .and_then(|upcast| upcast(object))
      .ok_or(RegistryError::TypeMismatch {
        abstract_type: *abstract_type,
        concrete_type: self.key,
      })
  }
}

impl fmt::Debug for ConcreteType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ConcreteType")
      .field("type", &self.key.name())
      .field("constructors", &self.signatures().collect::<Vec<_>>())
      .finish()
  }
}

/// An already-constructed object paired with the descriptor of its runtime type.
pub struct Instance {
  concrete: Arc<ConcreteType>,
  object: Erased,
}

impl Instance {
  pub fn concrete_type(&self) -> &Arc<ConcreteType> {
    &self.concrete
  }

  pub(crate) fn into_upcast(self, abstract_type: &AbstractTypeId) -> Result<Box<dyn Any + Send + Sync>> {
    self.concrete.upcast(abstract_type, self.object)
  }
}

impl fmt::Debug for Instance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Instance({})", self.concrete.key)
  }
}

/// Builder for [`ConcreteType`].
///
/// ```
/// use fibre_registry::ConcreteType;
///
/// trait DirectoryHandle: Send + Sync {
///   fn path(&self) -> &str;
/// }
///
/// #[derive(Default)]
/// struct LocalDirectory {
///   path: String,
/// }
///
/// impl DirectoryHandle for LocalDirectory {
///   fn path(&self) -> &str {
///     &self.path
///   }
/// }
///
/// let local = ConcreteType::builder::<LocalDirectory>()
///   .implements::<dyn DirectoryHandle>(|c| c)
///   .default_constructor()
///   .constructor(|(path,): (String,)| LocalDirectory { path })
///   .build();
///
/// assert_eq!(local.signatures().count(), 2);
/// ```
pub struct ConcreteTypeBuilder<C> {
  upcasts: HashMap<TypeId, Upcast>,
  constructors: Vec<Constructor>,
  _marker: PhantomData<fn() -> C>,
}

impl<C: Any + Send + Sync> ConcreteTypeBuilder<C> {
  fn new() -> Self {
    let builder = Self {
      upcasts: HashMap::new(),
      constructors: Vec::new(),
      _marker: PhantomData,
    };
    builder.implements::<C>(|c| c)
  }

  /// Declares that `C` can be handed out as `I`. The closure is normally just
  /// `|c| c`, letting the compiler perform the unsizing coercion.
  pub fn implements<I: ?Sized + Any + Send + Sync>(
    mut self,
    upcast: impl Fn(Arc<C>) -> Arc<I> + Send + Sync + 'static,
  ) -> Self {
    let thunk: Upcast = Box::new(move |object: Erased| {
      let concrete = object.downcast::<C>().ok()?;
      Some(Box::new(upcast(concrete)) as Box<dyn Any + Send + Sync>)
    });
    self.upcasts.insert(TypeId::of::<I>(), thunk);
    self
  }

  /// Registers an infallible constructor taking the tuple `P`.
  pub fn constructor<P: Params>(self, construct: impl Fn(P) -> C + Send + Sync + 'static) -> Self {
    self.try_constructor(move |params: P| Ok::<C, Infallible>(construct(params)))
  }

  /// Registers a fallible constructor. Its error is surfaced to the resolving
  /// caller as [`RegistryError::Construction`].
  pub fn try_constructor<P, E>(
    mut self,
    construct: impl Fn(P) -> std::result::Result<C, E> + Send + Sync + 'static,
  ) -> Self
  where
    P: Params,
    E: Into<BoxError>,
  {
    let signature = P::signature();
    let key = TypeKey::of::<C>();
    let thunk: ConstructFn = Box::new(move |args: Args| {
      let signature = args.signature();
      let params = P::from_args(args).ok_or(RegistryError::NoMatchingConstructor {
        concrete_type: key,
        signature,
      })?;
      let value = construct(params).map_err(|e| RegistryError::Construction(e.into()))?;
      Ok(Arc::new(value) as Erased)
    });
    self.constructors.retain(|c| c.signature != signature);
    self.constructors.push(Constructor {
      signature,
      construct: thunk,
    });
    self
  }

  pub fn build(self) -> Arc<ConcreteType> {
    Arc::new(ConcreteType {
      key: TypeKey::of::<C>(),
      upcasts: self.upcasts,
      constructors: self.constructors,
    })
  }
}

impl<C: Any + Send + Sync + Default> ConcreteTypeBuilder<C> {
  /// Registers `C::default` as the parameterless constructor.
  pub fn default_constructor(self) -> Self {
    self.constructor(|(): ()| C::default())
  }
}
