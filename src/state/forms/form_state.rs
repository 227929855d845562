//! The reactive form contract consumed by the form state registry

use super::error::FormError;
use super::field::FormControl;
use super::value::FieldValue;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a form instance. Two handles to the same form share an id;
/// two forms with identical fields never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormId(u64);

impl FormId {
    /// Allocate a fresh, process-unique id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        FormId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Callback invoked after a form's value changed. It receives the form that
/// emitted the change, so listeners never need to keep the form alive.
pub type ValueChangeListener = Box<dyn FnMut(&dyn ReactiveForm)>;

/// Handle to an active value-change subscription
///
/// Dropping the handle or calling [`Subscription::unsubscribe`] detaches the
/// listener immediately.
#[must_use = "dropping a Subscription detaches its listener"]
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap a disposer that detaches the listener when run
    pub fn new(dispose: impl FnOnce() + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    /// A subscription with nothing to detach
    pub fn empty() -> Self {
        Self { dispose: None }
    }

    /// Detach the listener now
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.dispose.is_some())
            .finish()
    }
}

/// Operations the registry needs from a form
#[cfg_attr(test, mockall::automock)]
pub trait ReactiveForm {
    /// Identity of this form instance
    fn id(&self) -> FormId;

    /// Names of the controls currently on the form, in form order
    fn control_names(&self) -> Vec<String>;

    /// Current state of a control
    fn control(&self, name: &str) -> Option<FormControl>;

    /// Apply several values at once. Fails without modifying anything if a
    /// name is not a control of this form.
    fn patch_values(&self, values: &[(String, FieldValue)]) -> Result<(), FormError>;

    /// Set a single control's value
    fn set_control_value(&self, name: &str, value: FieldValue) -> Result<(), FormError>;

    /// Clear dirty/touched bookkeeping
    fn mark_as_pristine(&self);

    /// Subscribe to value changes
    fn on_value_change(&self, listener: ValueChangeListener) -> Subscription;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    mod form_id {
        use super::*;

        #[test]
        fn test_next_is_unique() {
            let a = FormId::next();
            let b = FormId::next();
            assert_ne!(a, b);
        }

        #[test]
        fn test_copy_keeps_identity() {
            let a = FormId::next();
            let b = a;
            assert_eq!(a, b);
        }
    }

    mod subscription {
        use super::*;

        #[test]
        fn test_unsubscribe_runs_disposer_once() {
            let calls = Rc::new(Cell::new(0));
            let counter = calls.clone();
            let sub = Subscription::new(move || counter.set(counter.get() + 1));
            sub.unsubscribe();
            assert_eq!(calls.get(), 1);
        }

        #[test]
        fn test_drop_runs_disposer() {
            let calls = Rc::new(Cell::new(0));
            let counter = calls.clone();
            {
                let _sub = Subscription::new(move || counter.set(counter.get() + 1));
            }
            assert_eq!(calls.get(), 1);
        }

        #[test]
        fn test_empty_is_inert() {
            let sub = Subscription::empty();
            assert!(format!("{:?}", sub).contains("active: false"));
            sub.unsubscribe();
        }
    }
}
