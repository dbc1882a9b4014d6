// Validated directives, produced from the raw document.

use super::raw::{AttributeRaw, AttributesRaw, DirectiveRaw, DocumentRaw};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
  Clear,
  Add {
    abstract_name: String,
    concrete_name: String,
    singleton: bool,
  },
}

const CLEAR: &str = "clear";
const ADD: &str = "add";

const ATTR_ABSTRACT: &str = "abstract";
const ATTR_CONCRETE: &str = "concrete";
const ATTR_IS_SINGLETON: &str = "isSingleton";

pub fn process_raw_document(raw: DocumentRaw) -> Result<Vec<Directive>, ConfigError> {
  let section = raw.service_registry.ok_or(ConfigError::MissingRoot)?;
  section.bindings.into_iter().map(process_directive).collect()
}

fn process_directive(raw: DirectiveRaw) -> Result<Directive, ConfigError> {
  let (name, attributes) = match raw {
    DirectiveRaw::Bare(name) => (name, AttributesRaw::new()),
    DirectiveRaw::Element(element) => {
      let mut entries = element.into_iter();
      match (entries.next(), entries.next()) {
        (Some((name, attributes)), None) => (name, attributes.unwrap_or_default()),
        (None, _) => return Err(ConfigError::UnknownDirective(String::new())),
        (Some(_), Some((extra, _))) => {
          return Err(ConfigError::Parse(format!(
            "each binding entry must hold exactly one directive, found extra '{}'",
            extra
          )))
        }
      }
    }
  };

  match name.as_str() {
    CLEAR => {
      if let Some(attribute) = attributes.into_keys().next() {
        return Err(ConfigError::UnknownAttribute {
          directive: name,
          attribute,
        });
      }
      Ok(Directive::Clear)
    }
    ADD => process_add(name, attributes),
    _ => Err(ConfigError::UnknownDirective(name)),
  }
}

fn process_add(name: String, mut attributes: AttributesRaw) -> Result<Directive, ConfigError> {
  let abstract_name = required_text(&name, &mut attributes, ATTR_ABSTRACT)?;
  let concrete_name = required_text(&name, &mut attributes, ATTR_CONCRETE)?;
  let singleton = match attributes.remove(ATTR_IS_SINGLETON) {
    None => false,
    Some(value) => parse_bool(ATTR_IS_SINGLETON, value)?,
  };
  if let Some(attribute) = attributes.into_keys().next() {
    return Err(ConfigError::UnknownAttribute {
      directive: name,
      attribute,
    });
  }
  Ok(Directive::Add {
    abstract_name,
    concrete_name,
    singleton,
  })
}

// Empty values count as missing.
fn required_text(
  directive: &str,
  attributes: &mut AttributesRaw,
  attribute: &'static str,
) -> Result<String, ConfigError> {
  match attributes.remove(attribute) {
    Some(AttributeRaw::Text(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
    Some(AttributeRaw::Bool(value)) => Err(ConfigError::InvalidValue {
      attribute,
      value: value.to_string(),
    }),
    Some(AttributeRaw::Other(value)) if !value.is_null() => Err(ConfigError::InvalidValue {
      attribute,
      value: describe(&value),
    }),
    _ => Err(ConfigError::MissingAttribute {
      directive: directive.to_string(),
      attribute,
    }),
  }
}

fn parse_bool(attribute: &'static str, value: AttributeRaw) -> Result<bool, ConfigError> {
  match value {
    AttributeRaw::Bool(b) => Ok(b),
    AttributeRaw::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
      "true" => Ok(true),
      "false" => Ok(false),
      _ => Err(ConfigError::InvalidValue {
        attribute,
        value: text,
      }),
    },
    AttributeRaw::Other(value) => Err(ConfigError::InvalidValue {
      attribute,
      value: describe(&value),
    }),
  }
}

fn describe(value: &serde_yaml::Value) -> String {
  match serde_yaml::to_string(value) {
    Ok(text) => text.trim().to_string(),
    Err(_) => format!("{value:?}"),
  }
}
