//! Form control value objects

use super::value::FieldValue;
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

type Check = dyn Fn(&FieldValue) -> Option<String>;

/// A named validation rule
///
/// Cloning a validator shares the underlying check, so snapshots and live
/// controls can be compared with [`Validator::ptr_eq`].
#[derive(Clone)]
pub struct Validator {
    name: Cow<'static, str>,
    check: Rc<Check>,
}

impl Validator {
    /// Create a validator from a custom check. The check returns an error
    /// message when the value is invalid.
    pub fn custom(
        name: impl Into<Cow<'static, str>>,
        check: impl Fn(&FieldValue) -> Option<String> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            check: Rc::new(check),
        }
    }

    /// Value must be non-null and non-empty
    pub fn required() -> Self {
        Self::custom("required", |value| {
            value.is_empty().then(|| "This field is required".to_string())
        })
    }

    /// Text/list length must be at least `min`
    pub fn min_length(min: usize) -> Self {
        Self::custom("min_length", move |value| match value.len() {
            Some(len) if len > 0 && len < min => Some(format!("Must be at least {min} long")),
            _ => None,
        })
    }

    /// Text/list length must be at most `max`
    pub fn max_length(max: usize) -> Self {
        Self::custom("max_length", move |value| match value.len() {
            Some(len) if len > max => Some(format!("Must be at most {max} long")),
            _ => None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the check against a value
    pub fn validate(&self, value: &FieldValue) -> Option<String> {
        (self.check)(value)
    }

    /// Whether both validators share the same check
    pub fn ptr_eq(&self, other: &Validator) -> bool {
        Rc::ptr_eq(&self.check, &other.check)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Validator").field(&self.name).finish()
    }
}

/// A single form control with its value, enabled state and validators
#[derive(Debug, Clone, Default)]
pub struct FormControl {
    pub value: FieldValue,
    pub disabled: bool,
    pub validators: Vec<Validator>,
}

impl FormControl {
    /// Create an enabled control without validators
    pub fn new(value: impl Into<FieldValue>) -> Self {
        Self {
            value: value.into(),
            disabled: false,
            validators: Vec::new(),
        }
    }

    /// Add a validator
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Start the control in the disabled state
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Validation errors for the current value. Disabled controls never
    /// report errors.
    pub fn errors(&self) -> Vec<String> {
        if self.disabled {
            return Vec::new();
        }
        self.validators
            .iter()
            .filter_map(|v| v.validate(&self.value))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod validators {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_required_rejects_empty() {
            let required = Validator::required();
            assert!(required.validate(&FieldValue::Null).is_some());
            assert!(required.validate(&FieldValue::text("")).is_some());
            assert!(required.validate(&FieldValue::text("x")).is_none());
        }

        #[test]
        fn test_min_length_ignores_empty() {
            let min = Validator::min_length(3);
            assert!(min.validate(&FieldValue::text("")).is_none());
            assert!(min.validate(&FieldValue::text("ab")).is_some());
            assert!(min.validate(&FieldValue::text("abc")).is_none());
        }

        #[test]
        fn test_max_length() {
            let max = Validator::max_length(2);
            assert!(max.validate(&FieldValue::text("ab")).is_none());
            assert!(max.validate(&FieldValue::text("abc")).is_some());
            assert!(max.validate(&FieldValue::Number(1000.0)).is_none());
        }

        #[test]
        fn test_custom_validator() {
            let even = Validator::custom("even", |v| match v {
                FieldValue::Number(n) if n % 2.0 != 0.0 => Some("odd".to_string()),
                _ => None,
            });
            assert_eq!(even.name(), "even");
            assert_eq!(even.validate(&FieldValue::Number(3.0)), Some("odd".into()));
        }

        #[test]
        fn test_clone_shares_check() {
            let required = Validator::required();
            assert!(required.ptr_eq(&required.clone()));
            assert!(!required.ptr_eq(&Validator::required()));
        }

        #[test]
        fn test_debug_shows_name() {
            let debug_str = format!("{:?}", Validator::max_length(4));
            assert!(debug_str.contains("max_length"));
        }
    }

    mod form_control {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_new_is_enabled_without_validators() {
            let control = FormControl::new("John");
            assert_eq!(control.value, FieldValue::text("John"));
            assert!(!control.disabled);
            assert!(control.validators.is_empty());
        }

        #[test]
        fn test_errors_collects_all_failures() {
            let control = FormControl::new("")
                .with_validator(Validator::required())
                .with_validator(Validator::max_length(10));
            assert_eq!(control.errors(), vec!["This field is required".to_string()]);
            assert!(!control.is_valid());
        }

        #[test]
        fn test_disabled_control_is_valid() {
            let control = FormControl::new("")
                .with_validator(Validator::required())
                .disabled();
            assert!(control.is_valid());
        }
    }
}
