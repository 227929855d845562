//! Form operation errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("form has no control named `{name}`")]
    UnknownControl { name: String },

    #[error("form already has a control named `{name}`")]
    DuplicateControl { name: String },
}

impl FormError {
    pub(crate) fn unknown(name: &str) -> Self {
        FormError::UnknownControl {
            name: name.to_string(),
        }
    }
}
