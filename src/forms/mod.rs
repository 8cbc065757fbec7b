//! Form domain layer
//!
//! This module provides the field registry, the validation pipeline and the
//! mutation state machine shared by every form.

mod decl;
mod field;
mod form_state;
mod observer;
mod rule;
mod validation;

pub use decl::{parse_decls, FieldDecl};
pub use field::{Field, FieldSpec, FieldValue};
pub use form_state::{Form, PendingValidation};
pub use observer::{FormEvent, FormObserver, SubscriptionId};
pub use rule::{Rule, Validator, Verdict};
pub use validation::validate_value;

#[cfg(test)]
pub use observer::MockFormObserver;
