//! Application state and core logic for the issue edit demo

use crate::config::TuiConfig;
use anyhow::Result;
use centy_form_state::state::forms::{FieldValue, FormControl, FormGroup, ReactiveForm, Validator};
use centy_form_state::state::ReadSignal;
use centy_form_state::FormStateRegistry;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Name of the control added on demand with Ctrl+L
pub const LABELS_FIELD: &str = "labels";

/// Display metadata for a form control
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub is_multiline: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, label: &'static str, is_multiline: bool) -> Self {
        Self {
            name,
            label,
            is_multiline,
        }
    }
}

/// Options of the unsaved-changes dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaveOption {
    #[default]
    Cancel,
    Discard,
}

impl LeaveOption {
    fn toggle(self) -> Self {
        match self {
            LeaveOption::Cancel => LeaveOption::Discard,
            LeaveOption::Discard => LeaveOption::Cancel,
        }
    }
}

/// Main application struct
pub struct App {
    /// The issue being edited
    pub form: FormGroup,
    /// Baseline tracking for `form`
    pub registry: FormStateRegistry,
    /// Whether `form` differs from its baseline
    pub changed: ReadSignal<bool>,
    /// Controls in display order
    pub fields: Vec<FieldSpec>,
    /// Index into `fields`
    pub active_field: usize,
    /// Open unsaved-changes dialog and its selected option
    pub leave_dialog: Option<LeaveOption>,
    /// Error dialog message
    pub error_message: Option<String>,
    /// Feedback shown in the status bar
    pub status_message: Option<String>,
    config: TuiConfig,
    quit: bool,
}

impl App {
    /// Create a new App editing the sample issue
    pub fn new(config: TuiConfig) -> Self {
        let form = FormGroup::new()
            .with_control(
                "title",
                FormControl::new("Login redirect loops on expired session")
                    .with_validator(Validator::required())
                    .with_validator(Validator::max_length(80)),
            )
            .with_control(
                "description",
                FormControl::new(
                    "After the session cookie expires, /login redirects back to itself.",
                ),
            )
            .with_control("priority", FormControl::new(2u32))
            .with_control(
                "status",
                FormControl::new("open").with_validator(Validator::required()),
            );

        let registry = FormStateRegistry::new();
        registry.register(&form);
        let changed = registry.changed_signal(Some(&form));

        Self {
            form,
            registry,
            changed,
            fields: vec![
                FieldSpec::new("title", "Title", false),
                FieldSpec::new("description", "Description", true),
                FieldSpec::new("priority", "Priority (1-3)", false),
                FieldSpec::new("status", "Status", false),
            ],
            active_field: 0,
            leave_dialog: None,
            error_message: None,
            status_message: None,
            config,
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn is_changed(&self) -> bool {
        self.changed.get()
    }

    pub fn active_spec(&self) -> &FieldSpec {
        &self.fields[self.active_field]
    }

    /// Whether a field differs from the baseline
    pub fn is_field_modified(&self, name: &str) -> bool {
        self.registry
            .changed_fields(&self.form)
            .iter()
            .any(|n| n == name)
    }

    /// Display value of a field
    pub fn field_display(&self, spec: &FieldSpec) -> String {
        match self.form.value(spec.name) {
            Some(FieldValue::Number(n)) if spec.name == "priority" => match n as u32 {
                0 => "Default".to_string(),
                1 => "1 (high)".to_string(),
                2 => "2 (medium)".to_string(),
                3 => "3 (low)".to_string(),
                n => n.to_string(),
            },
            Some(value) => value.display_value(),
            None => String::new(),
        }
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.error_message.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.error_message = None;
            }
            return Ok(());
        }

        if let Some(selected) = self.leave_dialog {
            self.handle_leave_dialog_key(key, selected);
            return Ok(());
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('r') => self.reset_all(),
                KeyCode::Char('u') => self.reset_active_field(),
                KeyCode::Char('l') => self.add_labels_field()?,
                KeyCode::Char('s') => self.save(),
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Esc => self.request_leave(),
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.prev_field(),
            KeyCode::Enter if self.active_spec().is_multiline => self.push_char('\n')?,
            KeyCode::Char(c) => self.push_char(c)?,
            KeyCode::Backspace => self.pop_char()?,
            _ => {}
        }
        Ok(())
    }

    fn handle_leave_dialog_key(&mut self, key: KeyEvent, selected: LeaveOption) {
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Tab | KeyCode::BackTab => {
                self.leave_dialog = Some(selected.toggle());
            }
            KeyCode::Enter => match selected {
                LeaveOption::Cancel => self.leave_dialog = None,
                LeaveOption::Discard => self.leave(),
            },
            KeyCode::Esc => self.leave_dialog = None,
            _ => {}
        }
    }

    pub fn next_field(&mut self) {
        self.active_field = (self.active_field + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        if self.active_field == 0 {
            self.active_field = self.fields.len() - 1;
        } else {
            self.active_field -= 1;
        }
    }

    /// Leave immediately when nothing would be lost, otherwise ask
    pub fn request_leave(&mut self) {
        if self.registry.can_deactivate(Some(&self.form)) || !self.config.confirm_discard() {
            self.leave();
        } else {
            self.leave_dialog = Some(LeaveOption::default());
        }
    }

    fn leave(&mut self) {
        self.registry.release_form(&self.form);
        self.leave_dialog = None;
        self.quit = true;
    }

    pub fn reset_all(&mut self) {
        self.registry.reset_all(&self.form);
        self.status_message = Some("Reverted all fields".to_string());
    }

    pub fn reset_active_field(&mut self) {
        let name = self.active_spec().name;
        self.registry.reset_fields(&self.form, [name]);
        self.status_message = Some(format!("Reverted {name}"));
    }

    /// Add the labels control and include it in change tracking
    pub fn add_labels_field(&mut self) -> Result<()> {
        if self.form.contains(LABELS_FIELD) {
            return Ok(());
        }
        self.form.add_control(LABELS_FIELD, FormControl::new(""))?;
        self.registry.capture_new_fields(&self.form);
        self.fields
            .push(FieldSpec::new(LABELS_FIELD, "Labels (comma separated)", false));
        self.active_field = self.fields.len() - 1;
        self.status_message = Some("Added labels field".to_string());
        Ok(())
    }

    /// Accept the current values as the new baseline
    pub fn save(&mut self) {
        let errors = self.form.errors();
        if !errors.is_empty() {
            let message = errors
                .iter()
                .map(|(name, errs)| format!("{name}: {}", errs.join(", ")))
                .collect::<Vec<_>>()
                .join("\n");
            self.error_message = Some(message);
            return;
        }
        self.registry.register(&self.form);
        self.form.mark_as_pristine();
        self.status_message = Some("Saved".to_string());
    }

    fn push_char(&mut self, c: char) -> Result<()> {
        self.edit_active(|value| match value {
            FieldValue::Number(_) => c
                .to_digit(10)
                .map(FieldValue::from)
                .unwrap_or_else(|| value.clone()),
            other => {
                let mut text = other.as_text().to_string();
                text.push(c);
                FieldValue::Text(text)
            }
        })
    }

    fn pop_char(&mut self) -> Result<()> {
        self.edit_active(|value| match value {
            // Priority fields don't support backspace (single digit)
            FieldValue::Number(_) => value.clone(),
            other => {
                let mut text = other.as_text().to_string();
                text.pop();
                FieldValue::Text(text)
            }
        })
    }

    fn edit_active(&mut self, edit: impl FnOnce(&FieldValue) -> FieldValue) -> Result<()> {
        let name = self.active_spec().name;
        let current = self.form.value(name).unwrap_or_default();
        let next = edit(&current);
        if next.is_same(&current) {
            return Ok(());
        }
        self.form.set_value(name, next)?;
        self.form.mark_as_dirty();
        self.form.mark_as_touched();
        self.status_message = None;
        Ok(())
    }
}
