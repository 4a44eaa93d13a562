//! Per-command input form state.
//!
//! An [`InputState`] is created fresh whenever a command with prompts is
//! activated and is dropped again on cancel or on a successful submit.
//! Cursor offsets are counted in characters, not bytes.

use crate::catalog::InputField;

/// Result of pressing the activation key inside the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The active field was not the last one; focus moved to the next field.
    Advanced,
    /// At least one required field is empty.
    Rejected,
    /// Every required field has a value.
    Accepted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    fields: Vec<InputField>,
    values: Vec<String>,
    cursors: Vec<usize>,
    active: usize,
    attempted: bool,
}

impl InputState {
    pub fn new(fields: &[InputField]) -> Self {
        Self {
            fields: fields.to_vec(),
            values: vec![String::new(); fields.len()],
            cursors: vec![0; fields.len()],
            active: 0,
            attempted: false,
        }
    }

    pub fn fields(&self) -> &[InputField] {
        &self.fields
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Cursor offset within the active field.
    pub fn cursor(&self) -> usize {
        self.cursors.get(self.active).copied().unwrap_or(0)
    }

    pub fn attempted(&self) -> bool {
        self.attempted
    }

    pub fn is_last_field(&self) -> bool {
        self.active + 1 >= self.fields.len()
    }

    /// Replaces a field's value and parks its cursor at the end.
    pub fn set_value(&mut self, index: usize, value: &str) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value.to_string();
            self.cursors[index] = value.chars().count();
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let Some(value) = self.values.get_mut(self.active) else {
            return;
        };
        let cursor = self.cursors[self.active];
        value.insert(byte_offset(value, cursor), c);
        self.cursors[self.active] = cursor + 1;
    }

    /// Removes the character before the cursor.
    pub fn backspace(&mut self) {
        let Some(value) = self.values.get_mut(self.active) else {
            return;
        };
        let cursor = self.cursors[self.active];
        if cursor == 0 {
            return;
        }
        value.remove(byte_offset(value, cursor - 1));
        self.cursors[self.active] = cursor - 1;
    }

    /// Removes the character at the cursor.
    pub fn delete(&mut self) {
        let Some(value) = self.values.get_mut(self.active) else {
            return;
        };
        let cursor = self.cursors[self.active];
        if cursor >= value.chars().count() {
            return;
        }
        value.remove(byte_offset(value, cursor));
    }

    pub fn move_left(&mut self) {
        if let Some(cursor) = self.cursors.get_mut(self.active) {
            *cursor = cursor.saturating_sub(1);
        }
    }

    pub fn move_right(&mut self) {
        let len = self.active_len();
        if let Some(cursor) = self.cursors.get_mut(self.active) {
            *cursor = (*cursor + 1).min(len);
        }
    }

    pub fn home(&mut self) {
        if let Some(cursor) = self.cursors.get_mut(self.active) {
            *cursor = 0;
        }
    }

    pub fn end(&mut self) {
        let len = self.active_len();
        if let Some(cursor) = self.cursors.get_mut(self.active) {
            *cursor = len;
        }
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + 1) % self.fields.len();
        }
    }

    pub fn previous_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Indexes of required fields that are still empty.
    pub fn missing_required(&self) -> Vec<usize> {
        self.fields
            .iter()
            .zip(&self.values)
            .enumerate()
            .filter(|(_, (field, value))| field.required && value.is_empty())
            .map(|(index, _)| index)
            .collect()
    }

    /// Handles the activation key: advance on any field but the last, and
    /// validate on the last.
    pub fn submit(&mut self) -> SubmitOutcome {
        if !self.is_last_field() {
            self.active += 1;
            return SubmitOutcome::Advanced;
        }

        if self.missing_required().is_empty() {
            SubmitOutcome::Accepted
        } else {
            self.attempted = true;
            SubmitOutcome::Rejected
        }
    }

    fn active_len(&self) -> usize {
        self.values
            .get(self.active)
            .map_or(0, |value| value.chars().count())
    }
}

fn byte_offset(value: &str, char_index: usize) -> usize {
    value
        .char_indices()
        .nth(char_index)
        .map_or(value.len(), |(offset, _)| offset)
}
