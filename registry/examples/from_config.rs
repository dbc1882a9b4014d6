use fibre_registry::config::load_yaml_str;
use fibre_registry::{ConcreteType, ServiceRegistry, TypeCatalog};
use std::sync::Arc;

trait Greeter: Send + Sync {
  fn greet(&self) -> String;
}

struct EnglishGreeter;
impl Greeter for EnglishGreeter {
  fn greet(&self) -> String {
    "Hello!".to_string()
  }
}

struct GermanGreeter;
impl Greeter for GermanGreeter {
  fn greet(&self) -> String {
    "Hallo!".to_string()
  }
}

const CONFIG: &str = r#"
serviceRegistry:
  bindings:
    - clear
    - add: { abstract: "demo::Greeter", concrete: "demo::GermanGreeter", isSingleton: "true" }
"#;

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter("fibre_registry=debug")
    .init();

  let catalog = TypeCatalog::new();
  catalog
    .register_abstract::<dyn Greeter>("demo::Greeter")
    .register_concrete(
      "demo::EnglishGreeter",
      ConcreteType::builder::<EnglishGreeter>()
        .implements::<dyn Greeter>(|c| c)
        .constructor(|(): ()| EnglishGreeter)
        .build(),
    )
    .register_concrete(
      "demo::GermanGreeter",
      ConcreteType::builder::<GermanGreeter>()
        .implements::<dyn Greeter>(|c| c)
        .constructor(|(): ()| GermanGreeter)
        .build(),
    );

  let registry = ServiceRegistry::new();
  if let Err(e) = load_yaml_str(&registry, &catalog, CONFIG) {
    eprintln!("Invalid registry configuration: {}", e);
    return;
  }

  let first = registry.find::<dyn Greeter>().unwrap().expect("bound by config");
  let second = registry.find::<dyn Greeter>().unwrap().expect("bound by config");
  println!("{} (singleton: {})", first.greet(), Arc::ptr_eq(&first, &second));
}
