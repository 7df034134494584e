//! Field-level validation for admin forms
//!
//! `FieldErrors` collects per-field messages so a form can show every problem at
//! once. It absorbs `validator::ValidationErrors` from derived rules and accepts
//! custom messages for rules the derive cannot express.

use std::collections::BTreeMap;
use std::fmt;

use validator::ValidationErrors;

/// Per-field validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    /// Messages recorded for one field.
    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, messages)| (name.as_str(), messages.as_slice()))
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Require at least one non-blank entry in a list field (labels, authors).
pub fn require_non_blank_items(errors: &mut FieldErrors, field: &str, items: &[String], what: &str) {
    if !items.iter().any(|item| !item.trim().is_empty()) {
        errors.add(field, format!("At least one {} is required", what));
    }
}

/// Require a non-blank text field.
pub fn require_text(errors: &mut FieldErrors, field: &str, value: &str, label: &str) {
    if value.trim().is_empty() {
        errors.add(field, format!("{} is required", label));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Title is required"))]
        title: String,
    }

    #[test]
    fn converts_validator_errors_with_messages() {
        let sample = Sample {
            title: String::new(),
        };
        let errors: FieldErrors = sample.validate().unwrap_err().into();
        assert_eq!(errors.get("title"), ["Title is required".to_string()]);
    }

    #[test]
    fn list_and_text_helpers() {
        let mut errors = FieldErrors::new();
        require_non_blank_items(&mut errors, "labels", &["  ".to_string()], "label");
        require_text(&mut errors, "name", "Ada", "Name");
        assert!(errors.contains("labels"));
        assert!(!errors.contains("name"));
        assert_eq!(errors.len(), 1);
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn merge_and_display() {
        let mut a = FieldErrors::new();
        a.add("title", "Title is required");
        let mut b = FieldErrors::new();
        b.add("title", "Title is too long");
        b.add("cover", "File is empty");
        a.merge(b);
        assert_eq!(a.get("title").len(), 2);
        assert_eq!(
            a.to_string(),
            "cover: File is empty; title: Title is required; title: Title is too long"
        );
    }
}
