//! Public macros for building argument lists and resolving services.

/// Builds an [`Args`](crate::Args) list from values, in order.
///
/// ```
/// use fibre_registry::args;
///
/// let args = args![String::from("c:\\"), 42u16];
/// assert_eq!(args.len(), 2);
/// assert!(args![].is_empty());
/// ```
#[macro_export]
macro_rules! args {
  () => {
    $crate::Args::new()
  };
  ($($value:expr),+ $(,)?) => {
    $crate::Args::new()$(.with($value))+
  };
}

/// Resolves a service from the global registry, panicking on any error.
///
/// Constructor arguments may follow the type.
///
/// # Panics
///
/// Panics if the service is not bound or cannot be produced. For a
/// non-panicking version, use `global().get(...)` or `global().find()`.
///
/// # Examples
///
/// ```
/// use fibre_registry::{global, resolve, ConcreteType};
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter(String);
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { format!("Hello, {}!", self.0) } }
///
/// let english = ConcreteType::builder::<EnglishGreeter>()
///   .implements::<dyn Greeter>(|c| c)
///   .constructor(|(): ()| EnglishGreeter("World".into()))
///   .constructor(|(name,): (String,)| EnglishGreeter(name))
///   .build();
/// global().bind_to::<dyn Greeter>(english).unwrap();
///
/// assert_eq!(resolve!(trait Greeter).greet(), "Hello, World!");
/// assert_eq!(resolve!(trait Greeter, "Fibre".to_string()).greet(), "Hello, Fibre!");
/// ```
#[macro_export]
macro_rules! resolve {
  // resolve!(trait MyTrait) and resolve!(trait MyTrait, arg, ...)
  (trait $trait_ident:ident $(, $arg:expr)* $(,)?) => {
    $crate::global()
      .get::<dyn $trait_ident>($crate::args![$($arg),*])
      .unwrap_or_else(|e| {
        panic!(
          "Failed to resolve required trait service {}: {}",
          std::any::type_name::<dyn $trait_ident>(),
          e
        )
      })
  };

  // resolve!(MyService) and resolve!(MyService, arg, ...)
  ($type:ty $(, $arg:expr)* $(,)?) => {
    $crate::global()
      .get::<$type>($crate::args![$($arg),*])
      .unwrap_or_else(|e| {
        panic!(
          "Failed to resolve required service {}: {}",
          std::any::type_name::<$type>(),
          e
        )
      })
  };
}
