//! Form state registry
//!
//! Tracks, per form instance, a baseline snapshot of its controls, a
//! reactive "changed" flag kept in sync with the form's value stream, and the
//! subscription driving that flag. Forms are keyed by [`FormId`]; the
//! registry never keeps a form alive.

use super::forms::{FieldValue, FormId, ReactiveForm, Subscription};
use super::signal::{ReadSignal, Signal};
use super::snapshot::FormSnapshot;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

#[derive(Default)]
struct Tables {
    snapshots: HashMap<FormId, FormSnapshot>,
    signals: HashMap<FormId, Signal<bool>>,
    subscriptions: HashMap<FormId, Subscription>,
}

/// Remembers initial form values and reports divergence from them
///
/// All operations are synchronous and never fail: missing entries turn
/// operations into no-ops. The registry borrows its tables only while it is
/// not calling into a form mutation, so value-change events raised by its
/// own resets are handled re-entrantly.
pub struct FormStateRegistry {
    tables: Rc<RefCell<Tables>>,
}

impl FormStateRegistry {
    pub fn new() -> Self {
        Self {
            tables: Rc::new(RefCell::new(Tables::default())),
        }
    }

    /// Snapshot the form's current controls and start tracking changes.
    ///
    /// Re-registering replaces the snapshot and the subscription but keeps
    /// the changed signal, so existing readers see further updates.
    pub fn register<F: ReactiveForm + ?Sized>(&self, form: &F) {
        let id = form.id();
        let snapshot = FormSnapshot::capture(form);
        let field_count = snapshot.len();

        let (previous, signal) = {
            let mut tables = self.tables.borrow_mut();
            let previous = tables.subscriptions.remove(&id);
            let signal = tables
                .signals
                .entry(id)
                .or_insert_with(|| Signal::new(false))
                .clone();
            tables.snapshots.insert(id, snapshot);
            (previous, signal)
        };
        if let Some(previous) = previous {
            tracing::debug!("Replacing value subscription for form {id:?}");
            previous.unsubscribe();
        }

        let tables = Rc::downgrade(&self.tables);
        let listener_signal = signal.clone();
        let subscription = form.on_value_change(Box::new(move |form: &dyn ReactiveForm| {
            let Some(tables) = tables.upgrade() else {
                return;
            };
            let changed = tables
                .borrow()
                .snapshots
                .get(&id)
                .is_some_and(|snapshot| snapshot.differs_from(form));
            listener_signal.set(changed);
        }));

        let replaced = self
            .tables
            .borrow_mut()
            .subscriptions
            .insert(id, subscription);
        drop(replaced);

        // The fresh snapshot is the baseline, so the form is unchanged by definition
        signal.set(false);
        tracing::debug!("Registered form {id:?} with {field_count} fields");
    }

    /// The changed signal for a form, created at `false` if missing.
    ///
    /// `None` yields a detached signal that always reads `false`.
    pub fn changed_signal(&self, form: Option<&dyn ReactiveForm>) -> ReadSignal<bool> {
        let Some(form) = form else {
            return Signal::new(false).read_only();
        };
        self.tables
            .borrow_mut()
            .signals
            .entry(form.id())
            .or_insert_with(|| Signal::new(false))
            .read_only()
    }

    /// Restore every snapshot value and mark the form pristine.
    ///
    /// Values are applied in one batch; if the form rejects the batch (for
    /// instance because a snapshotted control was removed), they are applied
    /// one control at a time, skipping controls that no longer exist.
    pub fn reset_all<F: ReactiveForm + ?Sized>(&self, form: &F) {
        let id = form.id();
        let Some(values) = self.snapshot_values(id) else {
            return;
        };

        if let Err(err) = form.patch_values(&values) {
            tracing::debug!("Bulk restore of form {id:?} failed ({err}), restoring per field");
            for (name, value) in values {
                if form.control(&name).is_none() {
                    continue;
                }
                if let Err(err) = form.set_control_value(&name, value) {
                    tracing::warn!("Could not restore field {name} of form {id:?}: {err}");
                }
            }
        }

        form.mark_as_pristine();
        self.refresh(form);
    }

    /// Restore the named controls only. Names unknown to the form or to the
    /// snapshot are skipped.
    pub fn reset_fields<F, I, S>(&self, form: &F, names: I)
    where
        F: ReactiveForm + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let id = form.id();
        let restores: Vec<(String, FieldValue)> = {
            let tables = self.tables.borrow();
            let Some(snapshot) = tables.snapshots.get(&id) else {
                return;
            };
            names
                .into_iter()
                .filter_map(|name| {
                    let name = name.as_ref();
                    snapshot
                        .get(name)
                        .map(|field| (name.to_string(), field.value.clone()))
                })
                .collect()
        };

        for (name, value) in restores {
            if form.control(&name).is_none() {
                continue;
            }
            if let Err(err) = form.set_control_value(&name, value) {
                tracing::warn!("Could not restore field {name} of form {id:?}: {err}");
            }
        }

        self.refresh(form);
    }

    /// Whether leaving the form loses nothing. Forms never seen, and `None`,
    /// are always safe to leave.
    pub fn can_deactivate(&self, form: Option<&dyn ReactiveForm>) -> bool {
        let Some(form) = form else {
            return true;
        };
        self.tables
            .borrow()
            .signals
            .get(&form.id())
            .map_or(true, |signal| !signal.get())
    }

    /// Add snapshot entries for controls added since registration. Existing
    /// entries keep their original values. Without a prior registration this
    /// creates the snapshot but does not subscribe to changes.
    pub fn capture_new_fields<F: ReactiveForm + ?Sized>(&self, form: &F) {
        let id = form.id();
        let added = {
            let mut tables = self.tables.borrow_mut();
            tables.snapshots.entry(id).or_default().capture_missing(form)
        };
        if !added.is_empty() {
            tracing::debug!("Captured new fields {added:?} for form {id:?}");
        }
    }

    /// Stop tracking a form and drop all its state
    pub fn release_form<F: ReactiveForm + ?Sized>(&self, form: &F) {
        self.release_by_id(form.id());
    }

    /// Stop tracking a form by id, e.g. after the form itself was dropped
    pub fn release_by_id(&self, id: FormId) {
        let subscription = {
            let mut tables = self.tables.borrow_mut();
            tables.snapshots.remove(&id);
            tables.signals.remove(&id);
            tables.subscriptions.remove(&id)
        };
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
            tracing::debug!("Released form {id:?}");
        }
    }

    /// Unsubscribe everything and clear all tables
    pub fn teardown_all(&self) {
        let tables = std::mem::take(&mut *self.tables.borrow_mut());
        let count = tables.subscriptions.len();
        for (_, subscription) in tables.subscriptions {
            subscription.unsubscribe();
        }
        if count > 0 {
            tracing::debug!("Tore down {count} form subscriptions");
        }
    }

    /// Copy of the stored snapshot
    pub fn snapshot<F: ReactiveForm + ?Sized>(&self, form: &F) -> Option<FormSnapshot> {
        self.tables.borrow().snapshots.get(&form.id()).cloned()
    }

    pub fn is_registered<F: ReactiveForm + ?Sized>(&self, form: &F) -> bool {
        self.tables.borrow().snapshots.contains_key(&form.id())
    }

    /// Names of controls currently differing from the snapshot, in form order
    pub fn changed_fields<F: ReactiveForm + ?Sized>(&self, form: &F) -> Vec<String> {
        self.tables
            .borrow()
            .snapshots
            .get(&form.id())
            .map(|snapshot| snapshot.changed_fields(form))
            .unwrap_or_default()
    }

    /// Number of forms with any tracked state
    pub fn tracked_forms(&self) -> usize {
        let tables = self.tables.borrow();
        tables
            .snapshots
            .keys()
            .chain(tables.signals.keys())
            .chain(tables.subscriptions.keys())
            .collect::<HashSet<_>>()
            .len()
    }

    fn snapshot_values(&self, id: FormId) -> Option<Vec<(String, FieldValue)>> {
        self.tables
            .borrow()
            .snapshots
            .get(&id)
            .map(FormSnapshot::values)
    }

    /// Recompute the changed flag for a form that has a signal
    fn refresh<F: ReactiveForm + ?Sized>(&self, form: &F) {
        let tables = self.tables.borrow();
        let id = form.id();
        if let Some(signal) = tables.signals.get(&id) {
            let changed = tables
                .snapshots
                .get(&id)
                .is_some_and(|snapshot| snapshot.differs_from(form));
            signal.set(changed);
        }
    }
}

impl Default for FormStateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FormStateRegistry {
    fn drop(&mut self) {
        self.teardown_all();
    }
}
