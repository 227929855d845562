//! Captured baselines for change detection and reset

use super::forms::{FieldValue, FormControl, ReactiveForm, Validator};
use std::collections::BTreeMap;

/// State of one control at capture time
#[derive(Debug, Clone)]
pub struct FieldSnapshot {
    pub value: FieldValue,
    pub disabled: bool,
    pub validators: Vec<Validator>,
}

impl From<FormControl> for FieldSnapshot {
    fn from(control: FormControl) -> Self {
        Self {
            value: control.value,
            disabled: control.disabled,
            validators: control.validators,
        }
    }
}

/// Baseline of a whole form, keyed by control name
#[derive(Debug, Clone, Default)]
pub struct FormSnapshot {
    fields: BTreeMap<String, FieldSnapshot>,
}

impl FormSnapshot {
    /// Capture every control currently on the form
    pub fn capture<F: ReactiveForm + ?Sized>(form: &F) -> Self {
        let mut snapshot = Self::default();
        snapshot.capture_missing(form);
        snapshot
    }

    /// Capture controls that have no entry yet, leaving existing entries
    /// untouched. Returns the names that were added.
    pub fn capture_missing<F: ReactiveForm + ?Sized>(&mut self, form: &F) -> Vec<String> {
        let mut added = Vec::new();
        for name in form.control_names() {
            if self.fields.contains_key(&name) {
                continue;
            }
            if let Some(control) = form.control(&name) {
                self.fields.insert(name.clone(), control.into());
                added.push(name);
            }
        }
        added
    }

    pub fn get(&self, name: &str) -> Option<&FieldSnapshot> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Snapshot values as a patch, sorted by name
    pub fn values(&self) -> Vec<(String, FieldValue)> {
        self.fields
            .iter()
            .map(|(name, field)| (name.clone(), field.value.clone()))
            .collect()
    }

    /// Whether any live control with a snapshot entry holds a value that is
    /// not the captured one. Controls added after the capture are ignored
    /// until [`FormSnapshot::capture_missing`] picks them up.
    pub fn differs_from<F: ReactiveForm + ?Sized>(&self, form: &F) -> bool {
        form.control_names()
            .iter()
            .any(|name| self.field_differs(form, name))
    }

    /// Names of live controls whose value differs from the snapshot, in form
    /// order
    pub fn changed_fields<F: ReactiveForm + ?Sized>(&self, form: &F) -> Vec<String> {
        form.control_names()
            .into_iter()
            .filter(|name| self.field_differs(form, name))
            .collect()
    }

    fn field_differs<F: ReactiveForm + ?Sized>(&self, form: &F, name: &str) -> bool {
        let Some(captured) = self.fields.get(name) else {
            return false;
        };
        form.control(name)
            .is_some_and(|live| !live.value.is_same(&captured.value))
    }
}
