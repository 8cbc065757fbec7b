//! Reactive form-state container
//!
//! A [`Form`] registers named fields and keeps each field's value, touched
//! flag and validation error in one place. Validation runs a required check
//! followed by pattern, sync and async rules, strictly in sequence. Mutations
//! (`update`, `reset`, `clear`, `untouch`) keep the three maps consistent and
//! notify subscribed observers.
//!
//! ```no_run
//! use reactive_forms::{FieldSpec, Form, Rule};
//!
//! # async fn demo() -> reactive_forms::FormResult<()> {
//! let form = Form::<String>::from_specs([
//!     FieldSpec::new("name").label("Name").required(),
//!     FieldSpec::new("shout").rule(Rule::pattern_str("^Pewww.*$")?),
//! ])?;
//!
//! form.update([("shout", "Pewww".to_string())], false).settled().await;
//! form.validate().await;
//! assert!(!form.is_valid()); // name is still empty
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod forms;

pub use config::FormConfig;
pub use error::{FormError, FormResult};
pub use forms::{
    parse_decls, validate_value, Field, FieldDecl, FieldSpec, FieldValue, Form, FormEvent,
    FormObserver, PendingValidation, Rule, SubscriptionId, Validator, Verdict,
};
