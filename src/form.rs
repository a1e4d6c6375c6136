//! Draft task held by the add-task form, with field-level validation.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    models::{NewTask, Priority, Status},
    parser::parse_task_input,
};

pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Title,
    Description,
    Priority,
    DueDate,
}

impl Field {
    pub fn next(self) -> Field {
        match self {
            Field::Title => Field::Description,
            Field::Description => Field::Priority,
            Field::Priority => Field::DueDate,
            Field::DueDate => Field::Title,
        }
    }
}

pub type FieldErrors = BTreeMap<Field, &'static str>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: String,
    pub errors: FieldErrors,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors for the current draft; empty when it can be submitted.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.title.trim().is_empty() {
            errors.insert(Field::Title, "Title is required");
        }
        if self.due_date.trim().is_empty() {
            errors.insert(Field::DueDate, "Due date is required");
        } else if self.parsed_due_date().is_none() {
            errors.insert(Field::DueDate, "Due date must be YYYY-MM-DD");
        }
        errors
    }

    pub fn can_submit(&self) -> bool {
        self.validate().is_empty()
    }

    /// Records the validation result and returns the task to send, if any.
    pub fn submit(&mut self) -> Option<NewTask> {
        self.errors = self.validate();
        if !self.errors.is_empty() {
            return None;
        }
        Some(NewTask {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            priority: self.priority,
            due_date: self.parsed_due_date()?,
            status: Status::Pending,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Moves inline `!priority` and `due:` tokens from the title into their fields.
    pub fn apply_quick_add(&mut self) {
        let parsed = parse_task_input(&self.title);
        self.title = parsed.title;
        if let Some(priority) = parsed.priority {
            self.priority = priority;
        }
        if let Some(due_date) = parsed.due_date {
            self.due_date = due_date;
        }
    }

    pub fn field_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Title => Some(&mut self.title),
            Field::Description => Some(&mut self.description),
            Field::DueDate => Some(&mut self.due_date),
            Field::Priority => None,
        }
    }

    fn parsed_due_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.due_date.trim(), DUE_DATE_FORMAT).ok()
    }
}
