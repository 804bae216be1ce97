//! Required-field and value validation shared by all record kinds.
//!
//! # Responsibility
//! - Collect every missing and invalid field of one submission.
//! - Report them together so a form can highlight all problems at once.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// One field whose value is present but unacceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidField {
    pub field: &'static str,
    pub reason: String,
}

/// Rejection of a create or update submission.
///
/// `missing` keeps declaration order of the kind's required fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
    pub invalid: Vec<InvalidField>,
}

impl ValidationError {
    /// Builds an error carrying one invalid field.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            missing: Vec::new(),
            invalid: vec![InvalidField {
                field,
                reason: reason.into(),
            }],
        }
    }

    /// Returns whether `field` was reported as missing.
    pub fn is_missing(&self, field: &str) -> bool {
        self.missing.iter().any(|name| *name == field)
    }

    /// Returns whether `field` was reported as invalid.
    pub fn is_invalid(&self, field: &str) -> bool {
        self.invalid.iter().any(|item| item.field == field)
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.missing.is_empty() {
            write!(
                f,
                "please fill in all required fields: {}",
                self.missing.join(", ")
            )?;
        }
        for (index, item) in self.invalid.iter().enumerate() {
            if index > 0 || !self.missing.is_empty() {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", item.field, item.reason)?;
        }
        Ok(())
    }
}

impl Error for ValidationError {}

/// Accumulator used by drafts and records to build a `ValidationError`.
#[derive(Debug, Default)]
pub struct FieldCheck {
    error: ValidationError,
}

impl FieldCheck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires non-blank text.
    pub fn text(&mut self, field: &'static str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.error.missing.push(field);
        }
        self
    }

    /// Requires a value to be supplied.
    pub fn present<T>(&mut self, field: &'static str, value: &Option<T>) -> &mut Self {
        if value.is_none() {
            self.error.missing.push(field);
        }
        self
    }

    /// Requires a finite, non-negative amount.
    pub fn amount(&mut self, field: &'static str, value: f64) -> &mut Self {
        if !value.is_finite() || value < 0.0 {
            self.reject(field, format!("must be a non-negative amount, got {value}"));
        }
        self
    }

    /// Requires a percentage in `0..=100`.
    pub fn percent(&mut self, field: &'static str, value: u8) -> &mut Self {
        if value > 100 {
            self.reject(field, format!("must be between 0 and 100, got {value}"));
        }
        self
    }

    pub fn reject(&mut self, field: &'static str, reason: impl Into<String>) -> &mut Self {
        self.error.invalid.push(InvalidField {
            field,
            reason: reason.into(),
        });
        self
    }

    /// Finishes the check, returning every collected problem.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.error.missing.is_empty() && self.error.invalid.is_empty() {
            Ok(())
        } else {
            Err(self.error)
        }
    }
}
