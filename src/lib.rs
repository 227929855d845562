//! Centy form state - snapshot-based change tracking for reactive forms
//!
//! A [`FormStateRegistry`] remembers the initial values of a form, exposes a
//! reactive "changed" flag, restores all or selected fields to their initial
//! values, and answers whether a form can be left without losing edits.
//!
//! ```
//! use centy_form_state::state::forms::{FormControl, FormGroup};
//! use centy_form_state::FormStateRegistry;
//!
//! let form = FormGroup::new()
//!     .with_control("name", FormControl::new("John"))
//!     .with_control("email", FormControl::new("john@x.com"));
//!
//! let registry = FormStateRegistry::new();
//! registry.register(&form);
//! let changed = registry.changed_signal(Some(&form));
//!
//! form.set_value("name", "Jane").unwrap();
//! assert!(changed.get());
//! assert!(!registry.can_deactivate(Some(&form)));
//!
//! registry.reset_all(&form);
//! assert!(!changed.get());
//! ```

pub mod state;

pub use state::FormStateRegistry;
