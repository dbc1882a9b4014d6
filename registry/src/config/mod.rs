//! Loading bindings from a configuration document.
//!
//! The whole document is validated and every type name resolved before the
//! first directive is applied, so a bad document never leaves a partially
//! applied configuration behind. Directives are then applied in document
//! order, each as exactly one `clear()` or `bind` call. Only a failing
//! singleton constructor can stop application midway.

pub mod processed;
pub mod raw;

use crate::args::Args;
use crate::catalog::TypeResolver;
use crate::concrete::ConcreteType;
use crate::diagnostics::RegistryEvent;
use crate::error::{ConfigError, RegistryError};
use crate::registry::ServiceRegistry;
use crate::types::{AbstractTypeId, Signature};
use processed::{process_raw_document, Directive};
use raw::DocumentRaw;
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

enum Step {
  Clear,
  Factory(AbstractTypeId, Arc<ConcreteType>),
  Singleton(AbstractTypeId, Arc<ConcreteType>),
}

/// Parses a YAML document and applies it. Returns the number of directives applied.
pub fn load_yaml_str<R>(
  registry: &ServiceRegistry,
  resolver: &R,
  text: &str,
) -> Result<usize, ConfigError>
where
  R: TypeResolver + ?Sized,
{
  load_with(registry, "yaml string", || {
    let raw: DocumentRaw =
      serde_yaml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
    apply(registry, resolver, raw)
  })
}

/// Parses a JSON document and applies it.
pub fn load_json_str<R>(
  registry: &ServiceRegistry,
  resolver: &R,
  text: &str,
) -> Result<usize, ConfigError>
where
  R: TypeResolver + ?Sized,
{
  load_with(registry, "json string", || {
    let raw: DocumentRaw =
      serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
    apply(registry, resolver, raw)
  })
}

/// Reads and applies a configuration file. Files ending in `.json` are parsed
/// as JSON, anything else as YAML.
pub fn load_from_path<R>(
  registry: &ServiceRegistry,
  resolver: &R,
  path: &Path,
) -> Result<usize, ConfigError>
where
  R: TypeResolver + ?Sized,
{
  load_with(registry, &path.display().to_string(), || {
    let reader = io::BufReader::new(File::open(path)?);
    let is_json = path
      .extension()
      .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let raw: DocumentRaw = if is_json {
      serde_json::from_reader(reader).map_err(|e| ConfigError::Parse(e.to_string()))?
    } else {
      serde_yaml::from_reader(reader).map_err(|e| ConfigError::Parse(e.to_string()))?
    };
    apply(registry, resolver, raw)
  })
}

fn load_with(
  registry: &ServiceRegistry,
  source: &str,
  load: impl FnOnce() -> Result<usize, ConfigError>,
) -> Result<usize, ConfigError> {
  registry.notify(RegistryEvent::InitializationStarted {
    source: source.to_string(),
  });
  load().inspect_err(|e| {
    registry.notify(RegistryEvent::InvalidConfiguration {
      message: e.to_string(),
    })
  })
}

fn apply<R>(registry: &ServiceRegistry, resolver: &R, raw: DocumentRaw) -> Result<usize, ConfigError>
where
  R: TypeResolver + ?Sized,
{
  let steps = process_raw_document(raw)?
    .into_iter()
    .map(|directive| plan(resolver, directive))
    .collect::<Result<Vec<_>, _>>()?;

  let count = steps.len();
  for step in steps {
    match step {
      Step::Clear => registry.clear(),
      Step::Factory(abstract_type, concrete) => registry.bind(abstract_type, concrete)?,
      Step::Singleton(abstract_type, concrete) => {
        let instance = concrete.construct(Args::new())?;
        registry.bind_singleton(abstract_type, instance)?;
      }
    }
  }
  Ok(count)
}

fn plan<R>(resolver: &R, directive: Directive) -> Result<Step, ConfigError>
where
  R: TypeResolver + ?Sized,
{
  match directive {
    Directive::Clear => Ok(Step::Clear),
    Directive::Add {
      abstract_name,
      concrete_name,
      singleton,
    } => {
      let abstract_type =
        resolver
          .abstract_type(&abstract_name)
          .ok_or(ConfigError::UnresolvedType {
            kind: "abstract",
            name: abstract_name,
          })?;
      let concrete =
        resolver
          .concrete_type(&concrete_name)
          .ok_or(ConfigError::UnresolvedType {
            kind: "concrete",
            name: concrete_name,
          })?;
      if !concrete.is_assignable_to(&abstract_type) {
        return Err(
          RegistryError::TypeMismatch {
            abstract_type,
            concrete_type: concrete.key(),
          }
          .into(),
        );
      }
      let parameterless = Signature::default();
      if singleton && !concrete.has_constructor(&parameterless) {
        return Err(
          RegistryError::NoMatchingConstructor {
            concrete_type: concrete.key(),
            signature: parameterless,
          }
          .into(),
        );
      }
      Ok(if singleton {
        Step::Singleton(abstract_type, concrete)
      } else {
        Step::Factory(abstract_type, concrete)
      })
    }
  }
}
