// Structs mapping directly onto the YAML/JSON document.
//
// The shape mirrors an XML `serviceRegistry` section: each entry of `bindings`
// is a single-key map from the directive name to its attributes.
//
//   serviceRegistry:
//     bindings:
//       - clear: {}
//       - add: { abstract: "app::Greeter", concrete: "app::English", isSingleton: "true" }

use serde::Deserialize;
use std::collections::BTreeMap;

// Other root keys are allowed; the registry section may live inside a larger
// application config.
#[derive(Debug, Deserialize, PartialEq, Default)]
pub struct DocumentRaw {
  #[serde(rename = "serviceRegistry", default)]
  pub service_registry: Option<SectionRaw>,
}

#[derive(Debug, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct SectionRaw {
  #[serde(default)]
  pub bindings: Vec<DirectiveRaw>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DirectiveRaw {
  /// A directive without attributes written as a plain string, e.g. `- clear`.
  Bare(String),
  Element(BTreeMap<String, Option<AttributesRaw>>),
}

pub type AttributesRaw = BTreeMap<String, AttributeRaw>;

#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(untagged)]
pub enum AttributeRaw {
  Bool(bool),
  Text(String),
  /// Any other scalar or structure; rejected with the attribute's name.
  Other(serde_yaml::Value),
}
