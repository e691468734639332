//! Form state shared by every create/update screen.
//!
//! A form moves through `Idle -> LoadingReferences -> Ready -> Submitting`
//! and ends in `Succeeded` (the screen navigates away after a delay) or
//! back in `Ready` with the backend's field errors attached.

use crate::api::{ApiError, ApiResult};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

pub mod choices;
pub mod field;

use field::{validate, ChoiceOption, FieldKind, FieldSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(u64),
}

impl FormMode {
    pub fn editing(self) -> Option<u64> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    LoadingReferences,
    Ready,
    Submitting,
    Succeeded { at: Instant },
}

/// Why a submit did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBlocked {
    /// At least one field fails its local rules. No request is issued.
    Invalid,
    /// The form is still loading, already submitting, or done.
    NotReady,
}

pub struct FormState {
    mode: FormMode,
    phase: FormPhase,
    fields: Vec<FieldSpec>,
    values: Vec<String>,
    touched: Vec<bool>,
    server_errors: Vec<Option<String>>,
}

impl FormState {
    pub fn new(mode: FormMode, fields: Vec<FieldSpec>) -> Self {
        let values = fields.iter().map(|f| f.default.clone()).collect();
        let count = fields.len();
        Self {
            mode,
            phase: FormPhase::Idle,
            fields,
            values,
            touched: vec![false; count],
            server_errors: vec![None; count],
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn begin_loading(&mut self) {
        if self.phase == FormPhase::Idle {
            self.phase = FormPhase::LoadingReferences;
        }
    }

    pub fn mark_ready(&mut self) {
        self.phase = FormPhase::Ready;
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key == key)
    }

    pub fn value(&self, key: &str) -> &str {
        self.index_of(key)
            .map(|i| self.values[i].as_str())
            .unwrap_or_default()
    }

    pub fn value_at(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or_default()
    }

    /// Sets a value without marking the field as touched (used for prefill).
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
        if let Some(i) = self.index_of(key) {
            self.values[i] = value.into();
            self.server_errors[i] = None;
        }
    }

    fn edited(&mut self, index: usize) {
        self.touched[index] = true;
        self.server_errors[index] = None;
    }

    pub fn push_char(&mut self, index: usize, c: char) {
        let Some(spec) = self.fields.get(index) else {
            return;
        };
        if let Some(c) = spec.accept(&self.values[index], c) {
            self.values[index].push(c);
            self.edited(index);
        }
    }

    pub fn pop_char(&mut self, index: usize) {
        if index < self.len() && !matches!(self.fields[index].kind, FieldKind::Choice(_)) {
            self.values[index].pop();
            self.edited(index);
        }
    }

    /// Moves a choice field to the next (or previous) option.
    pub fn cycle_choice(&mut self, index: usize, forward: bool) {
        let Some(spec) = self.fields.get(index) else {
            return;
        };
        let options = spec.options();
        if options.is_empty() {
            return;
        }
        let position = options.iter().position(|o| o.value == self.values[index]);
        let next = match (position, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => (i + options.len() - 1) % options.len(),
        };
        self.values[index] = options[next].value.clone();
        self.edited(index);
    }

    /// Replaces the options of a choice field.
    pub fn set_options(&mut self, key: &str, options: Vec<ChoiceOption>) {
        if let Some(i) = self.index_of(key) {
            self.fields[i].kind = FieldKind::Choice(options);
        }
    }

    /// Text shown for a field: the option label for choices.
    pub fn display_value(&self, index: usize) -> String {
        let value = self.value_at(index);
        match self.fields.get(index).map(|f| &f.kind) {
            Some(FieldKind::Choice(options)) => options
                .iter()
                .find(|o| o.value == value)
                .map(|o| o.label.clone())
                .unwrap_or_else(|| {
                    if value.is_empty() {
                        "Select...".to_string()
                    } else {
                        value.to_string()
                    }
                }),
            _ => value.to_string(),
        }
    }

    fn local_error(&self, index: usize) -> Option<String> {
        let spec = &self.fields[index];
        validate(spec.label, &self.values[index], &spec.rules)
    }

    /// Message to show under a field: a backend error, or a local one once
    /// the field has been touched.
    pub fn field_error(&self, index: usize) -> Option<String> {
        if index >= self.len() {
            return None;
        }
        if let Some(server) = &self.server_errors[index] {
            return Some(server.clone());
        }
        if self.touched[index] {
            self.local_error(index)
        } else {
            None
        }
    }

    pub fn is_valid(&self) -> bool {
        (0..self.len()).all(|i| self.local_error(i).is_none())
    }

    /// Starts a submission. While any field is invalid, every field is
    /// marked as touched and nothing is submitted.
    pub fn begin_submit(&mut self) -> Result<FormValues, SubmitBlocked> {
        if self.phase != FormPhase::Ready {
            return Err(SubmitBlocked::NotReady);
        }
        if !self.is_valid() {
            self.touched.iter_mut().for_each(|t| *t = true);
            return Err(SubmitBlocked::Invalid);
        }

        self.phase = FormPhase::Submitting;
        Ok(FormValues(
            self.fields
                .iter()
                .zip(&self.values)
                .map(|(spec, value)| (spec.key, value.trim().to_string()))
                .collect(),
        ))
    }

    pub fn submit_succeeded(&mut self, at: Instant) {
        self.phase = FormPhase::Succeeded { at };
    }

    /// Returns to `Ready`, attaches backend field errors to their fields and
    /// returns the notification text.
    pub fn submit_failed(&mut self, error: &ApiError, entity: &str) -> String {
        self.phase = FormPhase::Ready;

        let Some(errors) = error.field_errors() else {
            return format!("Could not save {entity}: {error}");
        };

        let mut first_field = None;
        for (i, spec) in self.fields.iter().enumerate() {
            let message = errors.first_for(spec.key).map(str::to_string);
            if first_field.is_none() {
                if let Some(message) = &message {
                    first_field = Some(format!("{}: {}", spec.label, message));
                }
            }
            self.server_errors[i] = message;
        }

        let unmatched = errors
            .fields
            .iter()
            .find(|(key, _)| self.index_of(key).is_none())
            .and_then(|(key, messages)| messages.first().map(|m| format!("{key}: {m}")));

        first_field
            .or_else(|| errors.non_field.first().cloned())
            .or(unmatched)
            .unwrap_or_else(|| format!("Could not save {entity}"))
    }

    /// True once the success delay has elapsed.
    pub fn should_navigate(&self, now: Instant, delay: Duration) -> bool {
        match self.phase {
            FormPhase::Succeeded { at } => now.saturating_duration_since(at) >= delay,
            _ => false,
        }
    }
}

/// Trimmed values of a valid form, by field key.
#[derive(Debug, Clone, Default)]
pub struct FormValues(BTreeMap<&'static str, String>);

impl FormValues {
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or_default()
    }

    pub fn text(&self, key: &str) -> String {
        self.get(key).to_string()
    }

    /// A choice value holding a record id.
    pub fn id(&self, key: &str) -> ApiResult<u64> {
        self.get(key)
            .parse()
            .map_err(|_| ApiError::Encode(format!("{key} is not a valid id")))
    }

    pub fn number<T: std::str::FromStr>(&self, key: &str) -> ApiResult<T> {
        self.get(key)
            .parse()
            .map_err(|_| ApiError::Encode(format!("{key} is not a valid number")))
    }
}
