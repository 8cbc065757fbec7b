//! JSON field declarations
//!
//! Forms whose fields hold `serde_json::Value` can be declared as a JSON
//! array. Only single-field attributes and pattern rules are expressible;
//! callable rules are attached in code.

use super::field::FieldSpec;
use super::form_state::Form;
use super::rule::Rule;
use crate::config::FormConfig;
use crate::error::FormResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One field as written in a JSON declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDecl {
    pub key: Option<String>,
    pub label: Option<String>,
    pub value: Option<Value>,
    #[serde(alias = "isRequired")]
    pub is_required: bool,
    #[serde(alias = "requiredMessage")]
    pub required_message: Option<String>,
    /// Regular expressions the value must match, checked in order
    pub patterns: Vec<String>,
}

impl FieldDecl {
    /// Compile the declaration into a field spec
    pub fn into_spec(self) -> FormResult<FieldSpec<Value>> {
        let validation = self
            .patterns
            .iter()
            .map(|pattern| Rule::pattern_str(pattern))
            .collect::<FormResult<Vec<_>>>()?;

        Ok(FieldSpec {
            key: self.key,
            label: self.label,
            value: self.value,
            is_required: self.is_required,
            required_message: self.required_message,
            validation,
        })
    }
}

/// Parse a JSON array of field declarations
pub fn parse_decls(json: &str) -> FormResult<Vec<FieldDecl>> {
    Ok(serde_json::from_str(json)?)
}

impl Form<Value> {
    /// Build a form from a JSON array of field declarations
    pub fn from_json(json: &str) -> FormResult<Self> {
        Self::from_json_with_config(json, FormConfig::default())
    }

    pub fn from_json_with_config(json: &str, config: FormConfig) -> FormResult<Self> {
        let specs = parse_decls(json)?
            .into_iter()
            .map(FieldDecl::into_spec)
            .collect::<FormResult<Vec<_>>>()?;
        Self::from_specs_with_config(specs, config)
    }
}
