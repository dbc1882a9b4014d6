use fibre_registry::{args, ConcreteType, RegistryError, ServiceRegistry};

trait DirectoryHandle: Send + Sync {
  fn path(&self) -> &str;
}

#[derive(Default)]
struct LocalDirectory {
  path: String,
}

impl DirectoryHandle for LocalDirectory {
  fn path(&self) -> &str {
    &self.path
  }
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter("fibre_registry=debug")
    .init();

  let local = ConcreteType::builder::<LocalDirectory>()
    .implements::<dyn DirectoryHandle>(|c| c)
    .default_constructor()
    .constructor(|(path,): (String,)| LocalDirectory { path })
    .build();

  let registry = ServiceRegistry::new();
  registry
    .bind_to::<dyn DirectoryHandle>(local)
    .expect("LocalDirectory implements DirectoryHandle");

  let root = registry
    .get::<dyn DirectoryHandle>(args![String::from("c:\\")])
    .expect("a (String) constructor is registered");
  println!("Resolved handle for {}", root.path());

  match registry.get::<dyn DirectoryHandle>(args![42u32]) {
    Err(RegistryError::NoMatchingConstructor { signature, .. }) => {
      println!("No constructor takes {}", signature);
    }
    Err(e) => println!("Unexpected error: {}", e),
    Ok(_) => println!("Unexpectedly resolved"),
  }
}
