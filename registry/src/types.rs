//! Type identities used as table keys and constructor signatures.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The identity of a Rust type, carried together with its name for diagnostics.
///
/// Equality and hashing only look at the `TypeId`; the name is informational.
#[derive(Clone, Copy)]
pub struct TypeKey {
  id: TypeId,
  name: &'static str,
}

impl TypeKey {
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      id: TypeId::of::<T>(),
      name: std::any::type_name::<T>(),
    }
  }

  pub fn id(&self) -> TypeId {
    self.id
  }

  pub fn name(&self) -> &'static str {
    self.name
  }
}

impl PartialEq for TypeKey {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Debug for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TypeKey({})", self.name)
  }
}

impl fmt::Display for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}

/// Identifies an abstraction (usually a `dyn Trait`) that callers resolve against.
///
/// Two ids are equal only when they name the very same type.
///
/// ```
/// use fibre_registry::AbstractTypeId;
///
/// trait Greeter: Send + Sync {}
///
/// let id = AbstractTypeId::of::<dyn Greeter>();
/// assert_eq!(id, AbstractTypeId::of::<dyn Greeter>());
/// assert_ne!(id, AbstractTypeId::of::<String>());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AbstractTypeId(TypeKey);

impl AbstractTypeId {
  pub fn of<I: ?Sized + Any>() -> Self {
    Self(TypeKey::of::<I>())
  }

  pub fn key(&self) -> TypeKey {
    self.0
  }

  pub fn name(&self) -> &'static str {
    self.0.name()
  }
}

// A concrete type can always stand in as its own abstraction.
impl From<TypeKey> for AbstractTypeId {
  fn from(key: TypeKey) -> Self {
    Self(key)
  }
}

impl fmt::Debug for AbstractTypeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "AbstractTypeId({})", self.0.name())
  }
}

impl fmt::Display for AbstractTypeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.0.name())
  }
}

/// The ordered list of parameter types of a constructor, or of the
/// arguments supplied to a resolution request.
///
/// Signatures match only when they have the same arity and each position
/// names exactly the same type.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Signature(Vec<TypeKey>);

impl Signature {
  pub fn new(params: Vec<TypeKey>) -> Self {
    Self(params)
  }

  pub fn params(&self) -> &[TypeKey] {
    &self.0
  }

  pub fn arity(&self) -> usize {
    self.0.len()
  }
}

impl fmt::Debug for Signature {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Signature{}", self)
  }
}

impl fmt::Display for Signature {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("(")?;
    for (i, param) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str(", ")?;
      }
      f.write_str(param.name())?;
    }
    f.write_str(")")
  }
}
