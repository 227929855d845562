//! Dialog components for TUI

mod base;
mod confirm_dialog;

pub use confirm_dialog::render_leave_dialog;
pub use base::render_error_dialog;
