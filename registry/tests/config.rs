mod common;
use common::*;

use fibre_registry::config::{load_from_path, load_json_str, load_yaml_str};
use fibre_registry::{
  AbstractTypeId, ConfigError, RegistryError, RegistryEvent, ServiceRegistry, TypeCatalog,
  TypeResolver,
};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::sync::Arc;

fn catalog() -> TypeCatalog {
  let catalog = TypeCatalog::new();
  catalog
    .register_abstract::<dyn Greeter>("app::Greeter")
    .register_abstract::<dyn Clock>("app::Clock")
    .register_abstract::<dyn DirectoryHandle>("app::DirectoryHandle")
    .register_concrete("app::EnglishGreeter", english_type())
    .register_concrete("app::GermanGreeter", german_type())
    .register_concrete("app::FixedClock", fixed_clock_type())
    .register_concrete("app::FailingDirectory", failing_directory_type());
  catalog
}

fn registry() -> (ServiceRegistry, Arc<RecordingSink>) {
  let sink = Arc::new(RecordingSink::default());
  (ServiceRegistry::with_sink(sink.clone()), sink)
}

#[test]
fn test_yaml_document_applies_in_order() {
  // Arrange
  let (registry, _) = registry();
  registry
    .bind_to::<dyn DirectoryHandle>(directory_handle_type())
    .unwrap();
  let yaml = r#"
logging:
  level: debug
serviceRegistry:
  bindings:
    - add: { abstract: "app::Greeter", concrete: "app::EnglishGreeter" }
    - clear
    - add: { abstract: "app::Greeter", concrete: "app::GermanGreeter", isSingleton: true }
    - add:
        abstract: "app::Clock"
        concrete: "app::FixedClock"
        isSingleton: "False"
"#;

  // Act
  let applied = load_yaml_str(&registry, &catalog(), yaml).unwrap();

  // Assert
  assert_eq!(applied, 4);
  // The directory binding predates `clear`.
  assert!(!registry.is_bound(&AbstractTypeId::of::<dyn DirectoryHandle>()));
  let g1 = registry.find::<dyn Greeter>().unwrap().unwrap();
  let g2 = registry.find::<dyn Greeter>().unwrap().unwrap();
  assert_eq!(g1.greet(), "Hallo!");
  assert!(Arc::ptr_eq(&g1, &g2));
  let c1 = registry.find::<dyn Clock>().unwrap().unwrap();
  let c2 = registry.find::<dyn Clock>().unwrap().unwrap();
  assert!(!Arc::ptr_eq(&c1, &c2));
}

#[test]
fn test_json_document() {
  let (registry, _) = registry();
  let json = r#"{
    "serviceRegistry": {
      "bindings": [
        { "add": { "abstract": "app::Clock", "concrete": "app::FixedClock", "isSingleton": "true" } }
      ]
    }
  }"#;

  assert_eq!(load_json_str(&registry, &catalog(), json).unwrap(), 1);
  assert_eq!(registry.find::<dyn Clock>().unwrap().unwrap().now(), 0);
}

#[test]
fn test_load_from_file_by_extension() {
  let (registry, sink) = registry();
  let dir = tempfile::tempdir().unwrap();

  let yaml_path = dir.path().join("services.yaml");
  let mut file = std::fs::File::create(&yaml_path).unwrap();
  writeln!(
    file,
    "serviceRegistry:\n  bindings:\n    - add: {{ abstract: 'app::Greeter', concrete: 'app::EnglishGreeter' }}"
  )
  .unwrap();
  drop(file);

  let json_path = dir.path().join("services.JSON");
  std::fs::write(
    &json_path,
    r#"{"serviceRegistry":{"bindings":[{"add":{"abstract":"app::Clock","concrete":"app::FixedClock"}}]}}"#,
  )
  .unwrap();

  assert_eq!(load_from_path(&registry, &catalog(), &yaml_path).unwrap(), 1);
  assert_eq!(load_from_path(&registry, &catalog(), &json_path).unwrap(), 1);
  assert_eq!(registry.len(), 2);
  assert!(sink.events().contains(&RegistryEvent::InitializationStarted {
    source: yaml_path.display().to_string(),
  }));
}

#[test]
fn test_missing_file_is_read_error() {
  let (registry, _) = registry();
  let dir = tempfile::tempdir().unwrap();

  let err = load_from_path(&registry, &catalog(), &dir.path().join("absent.yaml")).unwrap_err();

  assert!(matches!(err, ConfigError::Read(_)));
}

#[test]
fn test_missing_root_element() {
  let (registry, sink) = registry();

  let err = load_yaml_str(&registry, &catalog(), "services:\n  bindings: []\n").unwrap_err();

  assert!(matches!(err, ConfigError::MissingRoot));
  assert_eq!(
    sink.events(),
    vec![
      RegistryEvent::InitializationStarted {
        source: "yaml string".to_string(),
      },
      RegistryEvent::InvalidConfiguration {
        message: err.to_string(),
      },
    ]
  );
}

#[test]
fn test_missing_required_attribute() {
  let (registry, _) = registry();
  let yaml = "serviceRegistry:\n  bindings:\n    - add: { abstract: 'app::Greeter' }\n";

  let err = load_yaml_str(&registry, &catalog(), yaml).unwrap_err();

  match err {
    ConfigError::MissingAttribute {
      directive,
      attribute,
    } => {
      assert_eq!(directive, "add");
      assert_eq!(attribute, "concrete");
    }
    other => panic!("unexpected error: {other:?}"),
  }
}

#[test]
fn test_unparsable_is_singleton() {
  let (registry, _) = registry();
  let yaml = r#"
serviceRegistry:
  bindings:
    - add: { abstract: "app::Greeter", concrete: "app::EnglishGreeter", isSingleton: "sometimes" }
"#;

  let err = load_yaml_str(&registry, &catalog(), yaml).unwrap_err();

  assert!(matches!(
    err,
    ConfigError::InvalidValue { attribute: "isSingleton", ref value } if value == "sometimes"
  ));
}

#[test]
fn test_non_text_attribute_values_are_named() {
  let (registry, _) = registry();
  let yaml = r#"
serviceRegistry:
  bindings:
    - add: { abstract: "app::Greeter", concrete: "app::EnglishGreeter", isSingleton: 1 }
"#;

  let err = load_yaml_str(&registry, &catalog(), yaml).unwrap_err();

  assert!(matches!(
    err,
    ConfigError::InvalidValue { attribute: "isSingleton", ref value } if value == "1"
  ));

  let yaml = "serviceRegistry:\n  bindings:\n    - add: { abstract: 5, concrete: 'app::EnglishGreeter' }\n";
  let err = load_yaml_str(&registry, &catalog(), yaml).unwrap_err();
  assert!(matches!(
    err,
    ConfigError::InvalidValue { attribute: "abstract", ref value } if value == "5"
  ));

  let json = r#"{"serviceRegistry":{"bindings":[{"add":{"abstract":"app::Clock","concrete":"app::FixedClock","isSingleton":[true]}}]}}"#;
  let err = load_json_str(&registry, &catalog(), json).unwrap_err();
  assert!(matches!(
    err,
    ConfigError::InvalidValue {
      attribute: "isSingleton",
      ..
    }
  ));
  assert!(registry.is_empty());
}

#[test]
fn test_unrecognized_directive() {
  let (registry, _) = registry();
  let yaml = "serviceRegistry:\n  bindings:\n    - remove: { abstract: 'app::Greeter' }\n";

  let err = load_yaml_str(&registry, &catalog(), yaml).unwrap_err();

  assert!(matches!(err, ConfigError::UnknownDirective(ref name) if name == "remove"));
}

#[test]
fn test_unresolvable_name_applies_nothing() {
  // Arrange
  let (registry, _) = registry();
  registry.bind_to::<dyn Clock>(fixed_clock_type()).unwrap();
  let yaml = r#"
serviceRegistry:
  bindings:
    - clear
    - add: { abstract: "app::Greeter", concrete: "app::EnglishGreeter" }
    - add: { abstract: "app::Greeter", concrete: "app::KlingonGreeter" }
"#;

  // Act
  let err = load_yaml_str(&registry, &catalog(), yaml).unwrap_err();

  // Assert
  assert!(matches!(
    err,
    ConfigError::UnresolvedType { kind: "concrete", ref name } if name == "app::KlingonGreeter"
  ));
  // Not even the leading `clear` ran.
  assert!(registry.is_bound(&AbstractTypeId::of::<dyn Clock>()));
  assert!(registry.find::<dyn Greeter>().unwrap().is_none());
}

#[test]
fn test_mismatched_types_in_document() {
  let (registry, _) = registry();
  let yaml = "serviceRegistry:\n  bindings:\n    - add: { abstract: 'app::Clock', concrete: 'app::GermanGreeter' }\n";

  let err = load_yaml_str(&registry, &catalog(), yaml).unwrap_err();

  assert!(matches!(
    err,
    ConfigError::Registry(RegistryError::TypeMismatch { .. })
  ));
  assert!(registry.is_empty());
}

#[test]
fn test_singleton_without_parameterless_constructor() {
  let (registry, _) = registry();
  let yaml = r#"
serviceRegistry:
  bindings:
    - add: { abstract: "app::DirectoryHandle", concrete: "app::FailingDirectory", isSingleton: true }
"#;

  let err = load_yaml_str(&registry, &catalog(), yaml).unwrap_err();

  assert!(matches!(
    err,
    ConfigError::Registry(RegistryError::NoMatchingConstructor { .. })
  ));
}

#[test]
fn test_concrete_name_doubles_as_abstraction() {
  let (registry, _) = registry();
  let catalog = catalog();
  assert_eq!(
    catalog.abstract_type("app::FixedClock"),
    Some(AbstractTypeId::of::<FixedClock>())
  );
  let yaml = "serviceRegistry:\n  bindings:\n    - add: { abstract: 'app::FixedClock', concrete: 'app::FixedClock' }\n";

  load_yaml_str(&registry, &catalog, yaml).unwrap();

  assert_eq!(registry.find::<FixedClock>().unwrap().unwrap().now(), 0);
}

#[test]
fn test_malformed_document_is_parse_error() {
  let (registry, _) = registry();

  let err = load_yaml_str(&registry, &catalog(), "serviceRegistry: [unclosed").unwrap_err();

  assert!(matches!(err, ConfigError::Parse(_)));
}
