//! In-memory reactive form group

use super::error::FormError;
use super::field::FormControl;
use super::form_state::{FormId, ReactiveForm, Subscription, ValueChangeListener};
use super::value::FieldValue;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

struct Listener {
    id: u64,
    active: Rc<Cell<bool>>,
    callback: Rc<RefCell<ValueChangeListener>>,
}

struct GroupInner {
    id: FormId,
    controls: RefCell<Vec<(String, FormControl)>>,
    pristine: Cell<bool>,
    touched: Cell<bool>,
    listeners: RefCell<Vec<Listener>>,
    next_listener: Cell<u64>,
}

/// A set of named controls with a value-change stream
///
/// `FormGroup` is a cheap handle: clones refer to the same form and share
/// its [`FormId`].
#[derive(Clone)]
pub struct FormGroup {
    inner: Rc<GroupInner>,
}

impl FormGroup {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(GroupInner {
                id: FormId::next(),
                controls: RefCell::new(Vec::new()),
                pristine: Cell::new(true),
                touched: Cell::new(false),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
            }),
        }
    }

    /// Builder-style control registration. A control with an existing name
    /// replaces the previous one.
    pub fn with_control(self, name: &str, control: FormControl) -> Self {
        {
            let mut controls = self.inner.controls.borrow_mut();
            match controls.iter_mut().find(|(n, _)| n == name) {
                Some((_, existing)) => *existing = control,
                None => controls.push((name.to_string(), control)),
            }
        }
        self
    }

    /// Add a control after construction
    pub fn add_control(&self, name: &str, control: FormControl) -> Result<(), FormError> {
        {
            let mut controls = self.inner.controls.borrow_mut();
            if controls.iter().any(|(n, _)| n == name) {
                return Err(FormError::DuplicateControl {
                    name: name.to_string(),
                });
            }
            controls.push((name.to_string(), control));
        }
        self.emit();
        Ok(())
    }

    /// Remove a control, returning it if it existed
    pub fn remove_control(&self, name: &str) -> Option<FormControl> {
        let removed = {
            let mut controls = self.inner.controls.borrow_mut();
            let index = controls.iter().position(|(n, _)| n == name)?;
            controls.remove(index).1
        };
        self.emit();
        Some(removed)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.controls.borrow().iter().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.inner.controls.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.controls.borrow().is_empty()
    }

    /// Current value of a control
    pub fn value(&self, name: &str) -> Option<FieldValue> {
        self.inner
            .controls
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.value.clone())
    }

    /// All control values, in form order
    pub fn values(&self) -> Vec<(String, FieldValue)> {
        self.inner
            .controls
            .borrow()
            .iter()
            .map(|(n, c)| (n.clone(), c.value.clone()))
            .collect()
    }

    /// Programmatically set a control's value. Does not change dirty state.
    pub fn set_value(&self, name: &str, value: impl Into<FieldValue>) -> Result<(), FormError> {
        self.set_control_value(name, value.into())
    }

    pub fn enable(&self, name: &str) -> Result<(), FormError> {
        self.set_disabled(name, false)
    }

    pub fn disable(&self, name: &str) -> Result<(), FormError> {
        self.set_disabled(name, true)
    }

    fn set_disabled(&self, name: &str, disabled: bool) -> Result<(), FormError> {
        self.update_control(name, |control| control.disabled = disabled)?;
        self.emit();
        Ok(())
    }

    pub fn mark_as_dirty(&self) {
        self.inner.pristine.set(false);
    }

    pub fn mark_as_touched(&self) {
        self.inner.touched.set(true);
    }

    pub fn is_pristine(&self) -> bool {
        self.inner.pristine.get()
    }

    pub fn is_dirty(&self) -> bool {
        !self.is_pristine()
    }

    pub fn is_touched(&self) -> bool {
        self.inner.touched.get()
    }

    /// Validation errors per control, for controls that have any
    pub fn errors(&self) -> Vec<(String, Vec<String>)> {
        self.inner
            .controls
            .borrow()
            .iter()
            .filter_map(|(n, c)| {
                let errors = c.errors();
                (!errors.is_empty()).then(|| (n.clone(), errors))
            })
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.inner.controls.borrow().iter().all(|(_, c)| c.is_valid())
    }

    /// Number of attached value-change listeners
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn update_control(
        &self,
        name: &str,
        update: impl FnOnce(&mut FormControl),
    ) -> Result<(), FormError> {
        let mut controls = self.inner.controls.borrow_mut();
        let (_, control) = controls
            .iter_mut()
            .find(|(n, _)| n == name)
            .ok_or_else(|| FormError::unknown(name))?;
        update(control);
        Ok(())
    }

    /// Notify listeners. The listener list is copied first so callbacks may
    /// subscribe or unsubscribe while being notified.
    fn emit(&self) {
        let pending: Vec<_> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|l| (l.active.clone(), l.callback.clone()))
            .collect();

        for (active, callback) in pending {
            if !active.get() {
                continue;
            }
            // A listener that triggers a change on its own form is not re-entered.
            let Ok(mut guard) = callback.try_borrow_mut() else {
                continue;
            };
            let callback: &mut dyn FnMut(&dyn ReactiveForm) = &mut **guard;
            callback(self);
        }
    }
}

impl Default for FormGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormGroup")
            .field("id", &self.inner.id)
            .field("controls", &self.inner.controls.borrow())
            .field("pristine", &self.inner.pristine.get())
            .finish()
    }
}

impl ReactiveForm for FormGroup {
    fn id(&self) -> FormId {
        self.inner.id
    }

    fn control_names(&self) -> Vec<String> {
        self.inner
            .controls
            .borrow()
            .iter()
            .map(|(n, _)| n.clone())
            .collect()
    }

    fn control(&self, name: &str) -> Option<FormControl> {
        self.inner
            .controls
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.clone())
    }

    fn patch_values(&self, values: &[(String, FieldValue)]) -> Result<(), FormError> {
        {
            let mut controls = self.inner.controls.borrow_mut();
            if let Some((name, _)) = values
                .iter()
                .find(|(name, _)| !controls.iter().any(|(n, _)| n == name))
            {
                return Err(FormError::unknown(name));
            }
            for (name, value) in values {
                if let Some((_, control)) = controls.iter_mut().find(|(n, _)| n == name) {
                    control.value = value.clone();
                }
            }
        }
        self.emit();
        Ok(())
    }

    fn set_control_value(&self, name: &str, value: FieldValue) -> Result<(), FormError> {
        self.update_control(name, |control| control.value = value)?;
        self.emit();
        Ok(())
    }

    fn mark_as_pristine(&self) {
        self.inner.pristine.set(true);
        self.inner.touched.set(false);
    }

    fn on_value_change(&self, listener: ValueChangeListener) -> Subscription {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        let active = Rc::new(Cell::new(true));

        self.inner.listeners.borrow_mut().push(Listener {
            id,
            active: active.clone(),
            callback: Rc::new(RefCell::new(listener)),
        });

        let form: Weak<GroupInner> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            active.set(false);
            if let Some(inner) = form.upgrade() {
                inner.listeners.borrow_mut().retain(|l| l.id != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::Validator;

    fn contact_form() -> FormGroup {
        FormGroup::new()
            .with_control("name", FormControl::new("John"))
            .with_control("email", FormControl::new("john@x.com"))
    }

    fn counting_listener(form: &FormGroup) -> (Rc<Cell<usize>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let sub = form.on_value_change(Box::new(move |_| counter.set(counter.get() + 1)));
        (count, sub)
    }

    mod controls {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_new_is_empty_and_pristine() {
            let form = FormGroup::new();
            assert!(form.is_empty());
            assert!(form.is_pristine());
            assert!(!form.is_touched());
        }

        #[test]
        fn test_control_names_keep_insertion_order() {
            let form = contact_form();
            assert_eq!(form.control_names(), vec!["name", "email"]);
            assert_eq!(form.len(), 2);
        }

        #[test]
        fn test_with_control_replaces_same_name() {
            let form = contact_form().with_control("name", FormControl::new("Jane"));
            assert_eq!(form.len(), 2);
            assert_eq!(form.value("name"), Some(FieldValue::text("Jane")));
        }

        #[test]
        fn test_add_control_rejects_duplicate() {
            let form = contact_form();
            let err = form.add_control("name", FormControl::new("x")).unwrap_err();
            assert_eq!(
                err,
                FormError::DuplicateControl {
                    name: "name".to_string()
                }
            );
        }

        #[test]
        fn test_remove_control() {
            let form = contact_form();
            let removed = form.remove_control("email");
            assert!(removed.is_some());
            assert!(!form.contains("email"));
            assert!(form.remove_control("email").is_none());
        }

        #[test]
        fn test_clones_share_identity() {
            let form = contact_form();
            let other = form.clone();
            other.set_value("name", "Jane").unwrap();
            assert_eq!(form.id(), other.id());
            assert_eq!(form.value("name"), Some(FieldValue::text("Jane")));
            assert_ne!(form.id(), contact_form().id());
        }
    }

    mod values {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_set_value_unknown_control() {
            let form = contact_form();
            assert_eq!(
                form.set_value("phone", "123"),
                Err(FormError::UnknownControl {
                    name: "phone".to_string()
                })
            );
        }

        #[test]
        fn test_set_value_keeps_pristine() {
            let form = contact_form();
            form.set_value("name", "Jane").unwrap();
            assert!(form.is_pristine());
        }

        #[test]
        fn test_patch_values_is_atomic() {
            let form = contact_form();
            let result = form.patch_values(&[
                ("name".to_string(), FieldValue::text("Jane")),
                ("phone".to_string(), FieldValue::text("123")),
            ]);
            assert!(result.is_err());
            assert_eq!(form.value("name"), Some(FieldValue::text("John")));
        }

        #[test]
        fn test_patch_values_partial() {
            let form = contact_form();
            form.patch_values(&[("email".to_string(), FieldValue::text("jane@x.com"))])
                .unwrap();
            assert_eq!(
                form.values(),
                vec![
                    ("name".to_string(), FieldValue::text("John")),
                    ("email".to_string(), FieldValue::text("jane@x.com")),
                ]
            );
        }

        #[test]
        fn test_mark_as_pristine_clears_dirty_and_touched() {
            let form = contact_form();
            form.mark_as_dirty();
            form.mark_as_touched();
            assert!(form.is_dirty());
            form.mark_as_pristine();
            assert!(form.is_pristine());
            assert!(!form.is_touched());
        }
    }

    mod validation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_errors_per_control() {
            let form = FormGroup::new()
                .with_control("name", FormControl::new("").with_validator(Validator::required()))
                .with_control("email", FormControl::new("a@b.c"));
            assert!(!form.is_valid());
            assert_eq!(
                form.errors(),
                vec![(
                    "name".to_string(),
                    vec!["This field is required".to_string()]
                )]
            );
        }

        #[test]
        fn test_disabling_invalid_control_makes_form_valid() {
            let form = FormGroup::new()
                .with_control("name", FormControl::new("").with_validator(Validator::required()));
            form.disable("name").unwrap();
            assert!(form.is_valid());
            form.enable("name").unwrap();
            assert!(!form.is_valid());
        }
    }

    mod value_changes {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_each_mutation_emits_once() {
            let form = contact_form();
            let (count, _sub) = counting_listener(&form);

            form.set_value("name", "Jane").unwrap();
            form.patch_values(&[
                ("name".to_string(), FieldValue::text("John")),
                ("email".to_string(), FieldValue::text("j@x.com")),
            ])
            .unwrap();
            form.add_control("phone", FormControl::new("")).unwrap();
            form.disable("phone").unwrap();

            assert_eq!(count.get(), 4);
        }

        #[test]
        fn test_failed_writes_do_not_emit() {
            let form = contact_form();
            let (count, _sub) = counting_listener(&form);
            let _ = form.set_value("phone", "1");
            let _ = form.patch_values(&[("phone".to_string(), FieldValue::Null)]);
            assert_eq!(count.get(), 0);
        }

        #[test]
        fn test_listener_sees_new_value() {
            let form = contact_form();
            let seen = Rc::new(RefCell::new(None));
            let sink = seen.clone();
            let _sub = form.on_value_change(Box::new(move |f: &dyn ReactiveForm| {
                *sink.borrow_mut() = f.control("name").map(|c| c.value);
            }));
            form.set_value("name", "Jane").unwrap();
            assert_eq!(*seen.borrow(), Some(FieldValue::text("Jane")));
        }

        #[test]
        fn test_unsubscribe_detaches_listener() {
            let form = contact_form();
            let (count, sub) = counting_listener(&form);
            assert_eq!(form.listener_count(), 1);
            sub.unsubscribe();
            assert_eq!(form.listener_count(), 0);
            form.set_value("name", "Jane").unwrap();
            assert_eq!(count.get(), 0);
        }

        #[test]
        fn test_unsubscribe_after_form_dropped() {
            let form = contact_form();
            let (_count, sub) = counting_listener(&form);
            drop(form);
            sub.unsubscribe();
        }

        #[test]
        fn test_listener_unsubscribed_mid_dispatch_is_skipped() {
            let form = contact_form();
            let second_calls = Rc::new(Cell::new(0));
            let holder: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

            let to_cancel = holder.clone();
            let _first = form.on_value_change(Box::new(move |_| {
                to_cancel.borrow_mut().take();
            }));

            let counter = second_calls.clone();
            let second = form.on_value_change(Box::new(move |_| counter.set(counter.get() + 1)));
            *holder.borrow_mut() = Some(second);

            form.set_value("name", "Jane").unwrap();
            assert_eq!(second_calls.get(), 0);
            assert_eq!(form.listener_count(), 1);
        }

        #[test]
        fn test_reentrant_change_does_not_recurse() {
            let form = contact_form();
            let calls = Rc::new(Cell::new(0));
            let counter = calls.clone();
            let handle = form.clone();
            let _sub = form.on_value_change(Box::new(move |_| {
                counter.set(counter.get() + 1);
                let _ = handle.set_value("email", "loop@x.com");
            }));
            form.set_value("name", "Jane").unwrap();
            assert_eq!(calls.get(), 1);
            assert_eq!(form.value("email"), Some(FieldValue::text("loop@x.com")));
        }
    }
}
