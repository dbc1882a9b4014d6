//! Type-erased constructor arguments and the tuple parameter lists that
//! constructors declare.

use crate::types::{Signature, TypeKey};
use std::any::Any;
use std::fmt;

struct Arg {
  key: TypeKey,
  value: Box<dyn Any + Send>,
}

/// An ordered list of constructor arguments.
///
/// Each argument remembers the exact type it was pushed with; that type is what
/// constructor selection compares against. Use the [`args!`](crate::args) macro
/// for the common case.
#[derive(Default)]
pub struct Args {
  values: Vec<Arg>,
}

impl Args {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends an argument, builder style.
  pub fn with<T: Any + Send>(mut self, value: T) -> Self {
    self.push(value);
    self
  }

  pub fn push<T: Any + Send>(&mut self, value: T) {
    self.values.push(Arg {
      key: TypeKey::of::<T>(),
      value: Box::new(value),
    });
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// The declared types of the arguments, in order.
  pub fn signature(&self) -> Signature {
    Signature::new(self.values.iter().map(|arg| arg.key).collect())
  }

  pub(crate) fn into_values(self) -> impl Iterator<Item = Box<dyn Any + Send>> {
    self.values.into_iter().map(|arg| arg.value)
  }
}

impl fmt::Debug for Args {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Args{}", self.signature())
  }
}

/// A constructor parameter list, implemented for tuples of up to four
/// `Send` values (including the empty tuple).
pub trait Params: Sized + 'static {
  fn signature() -> Signature;

  /// Unpacks `args` into the tuple. Returns `None` if the arity or any
  /// argument type differs.
  fn from_args(args: Args) -> Option<Self>;
}

macro_rules! impl_params {
  ($(($name:ident, $value:ident)),*) => {
    impl<$($name: Any + Send),*> Params for ($($name,)*) {
      fn signature() -> Signature {
        Signature::new(vec![$(TypeKey::of::<$name>()),*])
      }

      #[allow(unused_mut, unused_variables)]
      fn from_args(args: Args) -> Option<Self> {
        if args.signature() != Self::signature() {
          return None;
        }
        let mut values = args.into_values();
        $(
          let $value = *values.next()?.downcast::<$name>().ok()?;
        )*
        Some(($($value,)*))
      }
    }
  };
}

impl_params!();
impl_params!((A, a));
impl_params!((A, a), (B, b));
impl_params!((A, a), (B, b), (C, c));
impl_params!((A, a), (B, b), (C, c), (D, d));

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn signature_follows_push_order() {
    let args = Args::new().with(String::from("c:\\")).with(7u32);
    assert_eq!(
      args.signature(),
      Signature::new(vec![TypeKey::of::<String>(), TypeKey::of::<u32>()])
    );
    assert_eq!(args.signature(), <(String, u32)>::signature());
    assert_ne!(args.signature(), <(u32, String)>::signature());
  }

  #[test]
  fn unpacks_matching_tuple() {
    let args = Args::new().with(String::from("root")).with(3usize);
    let (path, depth) = <(String, usize)>::from_args(args).unwrap();
    assert_eq!(path, "root");
    assert_eq!(depth, 3);
  }

  #[test]
  fn rejects_wrong_arity_and_types() {
    assert!(<(String,)>::from_args(Args::new()).is_none());
    assert!(<(String,)>::from_args(Args::new().with("borrowed")).is_none());
    assert!(<()>::from_args(Args::new().with(1i32)).is_none());
    assert!(<()>::from_args(Args::new()).is_some());
  }

  #[test]
  fn displays_signature() {
    assert_eq!(<()>::signature().to_string(), "()");
    assert_eq!(
      <(String, u8)>::signature().to_string(),
      "(alloc::string::String, u8)"
    );
  }
}
