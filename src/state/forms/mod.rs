//! Form domain layer
//!
//! The reactive form contract ([`ReactiveForm`]) consumed by the form state
//! registry, plus an in-memory implementation ([`FormGroup`]).

mod error;
mod field;
mod form_state;
mod group;
mod value;

pub use error::FormError;
pub use field::{FormControl, Validator};
pub use form_state::{FormId, ReactiveForm, Subscription, ValueChangeListener};
pub use group::FormGroup;
pub use value::FieldValue;

#[cfg(test)]
pub use form_state::MockReactiveForm;
