//! Form field value objects

use super::rule::Rule;
use crate::error::{FormError, FormResult};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

/// Values a field can hold.
///
/// A value knows whether it counts as empty for the required check and how
/// it reads when matched against a pattern rule.
pub trait FieldValue: Clone + Default + Send + Sync + 'static {
    /// Whether the value satisfies the emptiness predicate
    fn is_empty_value(&self) -> bool;

    /// Text a pattern rule is matched against
    fn pattern_text(&self) -> Cow<'_, str>;

    /// Value used when a field is registered without one
    fn blank() -> Self {
        Self::default()
    }
}

impl FieldValue for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    fn pattern_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl<V: FieldValue> FieldValue for Option<V> {
    fn is_empty_value(&self) -> bool {
        self.as_ref().map_or(true, FieldValue::is_empty_value)
    }

    fn pattern_text(&self) -> Cow<'_, str> {
        match self {
            Some(value) => value.pattern_text(),
            None => Cow::Borrowed(""),
        }
    }
}

impl<V: FieldValue> FieldValue for Vec<V> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    fn pattern_text(&self) -> Cow<'_, str> {
        let parts: Vec<Cow<'_, str>> = self.iter().map(FieldValue::pattern_text).collect();
        Cow::Owned(parts.join(","))
    }
}

impl<V: FieldValue> FieldValue for HashMap<String, V> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    fn pattern_text(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
}

impl<V: FieldValue> FieldValue for BTreeMap<String, V> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    fn pattern_text(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
}

impl FieldValue for serde_json::Value {
    fn is_empty_value(&self) -> bool {
        match self {
            serde_json::Value::Null => true,
            serde_json::Value::String(s) => s.is_empty(),
            serde_json::Value::Array(items) => items.is_empty(),
            serde_json::Value::Object(map) => map.is_empty(),
            serde_json::Value::Bool(_) | serde_json::Value::Number(_) => false,
        }
    }

    fn pattern_text(&self) -> Cow<'_, str> {
        match self {
            serde_json::Value::String(s) => Cow::Borrowed(s),
            serde_json::Value::Null => Cow::Borrowed(""),
            other => Cow::Owned(other.to_string()),
        }
    }

    fn blank() -> Self {
        serde_json::Value::String(String::new())
    }
}

// Scalars are never empty
macro_rules! scalar_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn is_empty_value(&self) -> bool {
                    false
                }

                fn pattern_text(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

scalar_field_value!(bool, i32, i64, u32, u64, usize, f32, f64);

/// A single registered field with its configuration and value
#[derive(Debug, Clone)]
pub struct Field<T> {
    pub key: String,
    pub label: String,
    pub value: T,
    pub is_required: bool,
    pub required_message: Option<String>,
    pub validation: Vec<Rule<T>>,
}

impl<T: FieldValue> Field<T> {
    /// Whether the current value satisfies the emptiness predicate
    pub fn is_empty(&self) -> bool {
        self.value.is_empty_value()
    }
}

/// Options for registering a field.
///
/// Everything except the key is optional; missing attributes fall back to
/// an empty label, the value type's blank value, not required and no rules.
#[derive(Debug, Clone)]
pub struct FieldSpec<T> {
    pub key: Option<String>,
    pub label: Option<String>,
    pub value: Option<T>,
    pub is_required: bool,
    pub required_message: Option<String>,
    pub validation: Vec<Rule<T>>,
}

impl<T> Default for FieldSpec<T> {
    fn default() -> Self {
        Self {
            key: None,
            label: None,
            value: None,
            is_required: false,
            required_message: None,
            validation: Vec::new(),
        }
    }
}

impl<T: FieldValue> FieldSpec<T> {
    /// Start a spec for the given key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn value(mut self, value: T) -> Self {
        self.value = Some(value);
        self
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Override the message reported when the required check fails
    pub fn required_message(mut self, message: impl Into<String>) -> Self {
        self.is_required = true;
        self.required_message = Some(message.into());
        self
    }

    /// Append a rule; rules run in the order they were added
    pub fn rule(mut self, rule: Rule<T>) -> Self {
        self.validation.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule<T>>) -> Self {
        self.validation.extend(rules);
        self
    }

    /// Merge the spec with defaults into a field
    pub fn into_field(self) -> FormResult<Field<T>> {
        let key = match self.key {
            Some(key) if !key.is_empty() => key,
            _ => return Err(FormError::MissingKey),
        };

        Ok(Field {
            key,
            label: self.label.unwrap_or_default(),
            value: self.value.unwrap_or_else(T::blank),
            is_required: self.is_required,
            required_message: self.required_message,
            validation: self.validation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod emptiness {
        use super::*;

        #[test]
        fn test_string_emptiness() {
            assert!(String::new().is_empty_value());
            assert!(!"a".to_string().is_empty_value());
            // Whitespace is content
            assert!(!" ".to_string().is_empty_value());
        }

        #[test]
        fn test_option_emptiness() {
            assert!(None::<String>.is_empty_value());
            assert!(Some(String::new()).is_empty_value());
            assert!(!Some("x".to_string()).is_empty_value());
            assert!(!Some(0_i64).is_empty_value());
        }

        #[test]
        fn test_container_emptiness() {
            assert!(Vec::<String>::new().is_empty_value());
            assert!(!vec!["a".to_string()].is_empty_value());
            assert!(HashMap::<String, String>::new().is_empty_value());
            assert!(BTreeMap::<String, u32>::new().is_empty_value());
        }

        #[test]
        fn test_scalars_are_never_empty() {
            assert!(!0_i64.is_empty_value());
            assert!(!false.is_empty_value());
            assert!(!0.0_f64.is_empty_value());
        }

        #[test]
        fn test_json_emptiness() {
            assert!(json!(null).is_empty_value());
            assert!(json!("").is_empty_value());
            assert!(json!([]).is_empty_value());
            assert!(json!({}).is_empty_value());
            assert!(!json!(0).is_empty_value());
            assert!(!json!(false).is_empty_value());
            assert!(!json!(["a"]).is_empty_value());
        }
    }

    mod pattern_text {
        use super::*;

        #[test]
        fn test_json_string_is_unquoted() {
            assert_eq!(json!("Pew").pattern_text(), "Pew");
            assert_eq!(json!(42).pattern_text(), "42");
            assert_eq!(json!(null).pattern_text(), "");
        }

        #[test]
        fn test_vec_joins_with_commas() {
            let value = vec!["a".to_string(), "b".to_string()];
            assert_eq!(value.pattern_text(), "a,b");
        }

        #[test]
        fn test_scalar_uses_display() {
            assert_eq!(12_u32.pattern_text(), "12");
            assert_eq!(true.pattern_text(), "true");
        }
    }

    mod field_spec {
        use super::*;

        #[test]
        fn test_defaults_are_applied() {
            let field = FieldSpec::<String>::new("x").into_field().unwrap();
            assert_eq!(field.key, "x");
            assert_eq!(field.label, "");
            assert_eq!(field.value, "");
            assert!(!field.is_required);
            assert!(field.required_message.is_none());
            assert!(field.validation.is_empty());
        }

        #[test]
        fn test_json_blank_is_empty_string() {
            let field = FieldSpec::<serde_json::Value>::new("x")
                .into_field()
                .unwrap();
            assert_eq!(field.value, json!(""));
        }

        #[test]
        fn test_missing_key_fails() {
            let spec = FieldSpec::<String> {
                label: Some("Name".to_string()),
                is_required: true,
                ..FieldSpec::default()
            };
            assert!(matches!(spec.into_field(), Err(FormError::MissingKey)));
        }

        #[test]
        fn test_empty_key_fails() {
            let spec = FieldSpec::<String>::new("").value("v".to_string());
            assert!(matches!(spec.into_field(), Err(FormError::MissingKey)));
        }

        #[test]
        fn test_builder_sets_everything() {
            let field = FieldSpec::new("name")
                .label("Name")
                .value("Ada".to_string())
                .required_message("Name please")
                .rule(Rule::check(|v: &String| v.len() < 10))
                .into_field()
                .unwrap();

            assert_eq!(field.label, "Name");
            assert_eq!(field.value, "Ada");
            assert!(field.is_required);
            assert_eq!(field.required_message.as_deref(), Some("Name please"));
            assert_eq!(field.validation.len(), 1);
            assert!(!field.is_empty());
        }
    }
}
