//! Validation rules and their outcomes

use crate::error::{FormError, FormResult};
use async_trait::async_trait;
use regex::Regex;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Outcome of a callable rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub passed: bool,
    /// Message reported on failure; the form's generic message is used when absent
    pub message: Option<String>,
}

impl Verdict {
    pub fn pass() -> Self {
        Self {
            passed: true,
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: Some(message.into()),
        }
    }

    /// Failure without a message of its own
    pub fn reject() -> Self {
        Self {
            passed: false,
            message: None,
        }
    }
}

impl From<bool> for Verdict {
    fn from(passed: bool) -> Self {
        Self {
            passed,
            message: None,
        }
    }
}

impl From<(bool, Option<String>)> for Verdict {
    fn from((passed, message): (bool, Option<String>)) -> Self {
        Self { passed, message }
    }
}

impl From<(bool, &str)> for Verdict {
    fn from((passed, message): (bool, &str)) -> Self {
        Self {
            passed,
            message: Some(message.to_string()),
        }
    }
}

/// A callable rule judging a field value.
///
/// Implementations may suspend; the engine awaits each one before moving on
/// to the next rule of the same field.
#[async_trait]
pub trait Validator<T>: Send + Sync {
    async fn check(&self, value: &T) -> Verdict;
}

type SyncCheck<T> = Box<dyn Fn(&T) -> Verdict + Send + Sync>;
type VerdictFuture = Pin<Box<dyn Future<Output = Verdict> + Send>>;
type AsyncCheck<T> = Box<dyn Fn(T) -> VerdictFuture + Send + Sync>;

struct FnCheck<T>(SyncCheck<T>);

#[async_trait]
impl<T: Sync + 'static> Validator<T> for FnCheck<T> {
    async fn check(&self, value: &T) -> Verdict {
        (self.0)(value)
    }
}

struct AsyncFnCheck<T>(AsyncCheck<T>);

#[async_trait]
impl<T: Clone + Send + Sync + 'static> Validator<T> for AsyncFnCheck<T> {
    async fn check(&self, value: &T) -> Verdict {
        (self.0)(value.clone()).await
    }
}

/// A single entry of a field's rule list
pub enum Rule<T> {
    /// The value's pattern text must match
    Pattern(Regex),
    /// A sync or async callable
    Validator(Arc<dyn Validator<T>>),
}

impl<T: Clone + Send + Sync + 'static> Rule<T> {
    pub fn pattern(regex: Regex) -> Self {
        Rule::Pattern(regex)
    }

    /// Compile a pattern rule from its source
    pub fn pattern_str(pattern: &str) -> FormResult<Self> {
        Regex::new(pattern)
            .map(Rule::Pattern)
            .map_err(|source| FormError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Synchronous callable rule
    pub fn check<F, V>(check: F) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'static,
        V: Into<Verdict> + 'static,
    {
        let check: SyncCheck<T> = Box::new(move |value: &T| check(value).into());
        Rule::Validator(Arc::new(FnCheck(check)))
    }

    /// Asynchronous callable rule; it receives its own copy of the value
    pub fn check_async<F, Fut, V>(check: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = V> + Send + 'static,
        V: Into<Verdict> + 'static,
    {
        let check: AsyncCheck<T> = Box::new(move |value: T| -> VerdictFuture {
            let pending = check(value);
            Box::pin(async move { pending.await.into() })
        });
        Rule::Validator(Arc::new(AsyncFnCheck(check)))
    }

    pub fn validator(validator: Arc<dyn Validator<T>>) -> Self {
        Rule::Validator(validator)
    }
}

impl<T> Clone for Rule<T> {
    fn clone(&self) -> Self {
        match self {
            Rule::Pattern(regex) => Rule::Pattern(regex.clone()),
            Rule::Validator(validator) => Rule::Validator(Arc::clone(validator)),
        }
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Rule::Validator(_) => f.write_str("Validator(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod verdict {
        use super::*;

        #[test]
        fn test_from_bool() {
            assert_eq!(Verdict::from(true), Verdict::pass());
            assert_eq!(Verdict::from(false), Verdict::reject());
        }

        #[test]
        fn test_from_pair() {
            let verdict = Verdict::from((false, Some("Too short".to_string())));
            assert_eq!(verdict, Verdict::fail("Too short"));

            let verdict = Verdict::from((false, "Taken"));
            assert_eq!(verdict.message.as_deref(), Some("Taken"));
        }
    }

    mod rule {
        use super::*;

        #[test]
        fn test_pattern_str_compiles() {
            let rule = Rule::<String>::pattern_str("^a+$").unwrap();
            assert!(matches!(rule, Rule::Pattern(ref re) if re.is_match("aaa")));
        }

        #[test]
        fn test_pattern_str_rejects_bad_regex() {
            let result = Rule::<String>::pattern_str("(unclosed");
            match result {
                Err(FormError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "(unclosed"),
                other => panic!("expected InvalidPattern, got {other:?}"),
            }
        }

        #[test]
        fn test_sync_check_runs() {
            let rule = Rule::check(|v: &String| (v.starts_with('a'), "Must start with a"));
            let Rule::Validator(validator) = rule else {
                panic!("expected validator");
            };
            let verdict = tokio_test::block_on(validator.check(&"bcd".to_string()));
            assert_eq!(verdict, Verdict::fail("Must start with a"));
        }

        #[tokio::test]
        async fn test_async_check_runs() {
            let rule = Rule::check_async(|v: String| async move { v != "AAA" });
            let Rule::Validator(validator) = rule else {
                panic!("expected validator");
            };
            assert!(!validator.check(&"AAA".to_string()).await.passed);
            assert!(validator.check(&"XYZ".to_string()).await.passed);
        }

        struct Blocklist(Vec<&'static str>);

        #[async_trait]
        impl Validator<String> for Blocklist {
            async fn check(&self, value: &String) -> Verdict {
                if self.0.contains(&value.as_str()) {
                    Verdict::fail(format!("{value} is blocked"))
                } else {
                    Verdict::pass()
                }
            }
        }

        #[tokio::test]
        async fn test_custom_validator_is_used() {
            let rule = Rule::<String>::validator(Arc::new(Blocklist(vec!["root"])));
            let Rule::Validator(validator) = rule else {
                panic!("expected validator");
            };
            let verdict = validator.check(&"root".to_string()).await;
            assert_eq!(verdict.message.as_deref(), Some("root is blocked"));
            assert!(validator.check(&"ada".to_string()).await.passed);
        }

        #[test]
        fn test_debug_shows_pattern_source() {
            let rule = Rule::<String>::pattern_str("^x$").unwrap();
            assert_eq!(format!("{rule:?}"), r#"Pattern("^x$")"#);
            let rule = Rule::check(|_: &String| true);
            assert_eq!(format!("{rule:?}"), "Validator(..)");
        }
    }
}
