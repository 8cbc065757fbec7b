//! The validation pipeline
//!
//! A field is judged by its required check first, then by each rule in list
//! order. Evaluation stops at the first failure. Callable rules may suspend
//! and are awaited one at a time, so a later rule never races an earlier one
//! for the same field.

use super::field::{Field, FieldValue};
use super::rule::Rule;
use crate::config::FormConfig;

/// Run the pipeline against a value and return the error message, if any
pub async fn validate_value<T: FieldValue>(
    value: &T,
    rules: &[Rule<T>],
    is_required: bool,
    required_message: Option<&str>,
    config: &FormConfig,
) -> Option<String> {
    if is_required && value.is_empty_value() {
        return Some(
            required_message
                .map(str::to_string)
                .unwrap_or_else(|| config.required_message.clone()),
        );
    }

    for (index, rule) in rules.iter().enumerate() {
        match rule {
            Rule::Pattern(regex) => {
                if !regex.is_match(&value.pattern_text()) {
                    tracing::trace!("Rule {index} (pattern {}) failed", regex.as_str());
                    return Some(config.invalid_message.clone());
                }
            }
            Rule::Validator(validator) => {
                let verdict = validator.check(value).await;
                if !verdict.passed {
                    tracing::trace!("Rule {index} (callable) failed");
                    return Some(
                        verdict
                            .message
                            .unwrap_or_else(|| config.invalid_message.clone()),
                    );
                }
            }
        }
    }

    None
}

impl<T: FieldValue> Field<T> {
    /// Judge the field's current value
    pub async fn validate(&self, config: &FormConfig) -> Option<String> {
        validate_value(
            &self.value,
            &self.validation,
            self.is_required,
            self.required_message.as_deref(),
            config,
        )
        .await
    }
}
