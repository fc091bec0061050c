use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use shared::domain::Category;

use crate::{
    form::{FieldValue, FormState},
    schema::{current_year, schema_for, FieldKind, FieldSpec},
};

/// Field name → first failing rule's message.
pub type FieldErrors = BTreeMap<String, String>;

const REQUIRED_MESSAGE: &str = "This field is required";

/// Outcome of checking a whole form on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValidation {
    pub errors: FieldErrors,
    /// Every field that was checked, valid or not.
    pub checked: Vec<&'static str>,
}

impl FormValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Per-field and whole-form rules for one category.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    category: Category,
    current_year: i32,
}

impl Validator {
    pub fn new(category: Category) -> Self {
        Self::for_year(category, current_year())
    }

    /// Pins the upper bound of year fields, mostly for deterministic tests.
    pub fn for_year(category: Category, current_year: i32) -> Self {
        Self {
            category,
            current_year,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Checks one field against its rule. Fields unknown to the category never fail.
    ///
    /// `form` supplies the rest of the screen for cross-field rules (conditionally
    /// required insurance details).
    pub fn validate_field(
        &self,
        field: &str,
        value: &FieldValue,
        form: &FormState,
    ) -> Option<String> {
        let spec = schema_for(self.category).field(field)?;
        if value.is_blank() {
            return spec
                .is_required_in(form)
                .then(|| self.missing_message(spec));
        }
        self.check_present(spec, value)
    }

    /// Runs every checked field's rule and aggregates the failures.
    pub fn validate_form(&self, form: &FormState) -> FormValidation {
        let mut validation = FormValidation::default();
        for spec in schema_for(self.category).checked_fields(form) {
            validation.checked.push(spec.name);
            if let Some(message) = self.validate_field(spec.name, form.get(spec.name), form) {
                validation.errors.insert(spec.name.to_string(), message);
            }
        }
        validation
    }

    fn missing_message(&self, spec: &FieldSpec) -> String {
        match spec.kind {
            FieldKind::Text { min, .. } if min > 1 => {
                format!("{} must be at least {min} characters", spec.label)
            }
            FieldKind::Text { .. } => REQUIRED_MESSAGE.to_string(),
            FieldKind::Price { .. } | FieldKind::Count { .. } | FieldKind::Digits(_) => {
                format!("Please enter a valid {}", spec.label.to_lowercase())
            }
            FieldKind::Date => format!("Please enter {}", spec.label.to_lowercase()),
            FieldKind::Year { .. } | FieldKind::Choice(_) | FieldKind::Flag => {
                format!("Please select {}", spec.label.to_lowercase())
            }
            FieldKind::Feature => REQUIRED_MESSAGE.to_string(),
        }
    }

    fn check_present(&self, spec: &FieldSpec, value: &FieldValue) -> Option<String> {
        match spec.kind {
            FieldKind::Text { min, max } => {
                let length = value.trimmed().chars().count();
                if length < min {
                    Some(format!("{} must be at least {min} characters", spec.label))
                } else if length > max {
                    Some(format!("{} must not exceed {max} characters", spec.label))
                } else {
                    None
                }
            }
            FieldKind::Price { max } => match value.as_number() {
                None => Some(format!("Please enter a valid {}", spec.label.to_lowercase())),
                Some(amount) if amount <= 0.0 => {
                    Some(format!("{} must be greater than 0", spec.label))
                }
                Some(amount) if amount > max => Some(format!("{} seems too high", spec.label)),
                Some(_) => None,
            },
            FieldKind::Count { min, max } => {
                let Some(count) = value.as_integer() else {
                    return Some(format!("Please enter a valid {}", spec.label.to_lowercase()));
                };
                match max {
                    Some(max) if count < min || count > max => Some(format!(
                        "{} must be between {min} and {max}",
                        spec.label
                    )),
                    None if count < min => {
                        Some(format!("{} must be at least {min}", spec.label))
                    }
                    _ => None,
                }
            }
            FieldKind::Year { min } => match value.as_integer() {
                Some(year) if year >= i64::from(min) && year <= i64::from(self.current_year) => {
                    None
                }
                _ => Some(format!("Year must be between {min} and {}", self.current_year)),
            },
            FieldKind::Date => NaiveDate::parse_from_str(&value.trimmed(), "%Y-%m-%d")
                .err()
                .map(|_| format!("{} must be a date (YYYY-MM-DD)", spec.label)),
            FieldKind::Choice(options) => {
                let choice = value.trimmed();
                (!options.contains(&choice.as_str()))
                    .then(|| format!("Please select a valid {}", spec.label.to_lowercase()))
            }
            FieldKind::Flag => value
                .flag()
                .is_none()
                .then(|| format!("Please select {}", spec.label.to_lowercase())),
            FieldKind::Feature => None,
            FieldKind::Digits(count) => {
                let digits = value.trimmed();
                let matches =
                    digits.len() == count && digits.chars().all(|c| c.is_ascii_digit());
                (!matches).then(|| format!("{} must be {count} digits", spec.label))
            }
        }
    }
}

/// Touched/error bookkeeping for one create or update screen.
///
/// Errors are shown only for fields the user has blurred, or for every checked field
/// once a submit has been attempted.
#[derive(Debug, Clone)]
pub struct FormSession {
    validator: Validator,
    form: FormState,
    errors: FieldErrors,
    touched: BTreeSet<String>,
}

impl FormSession {
    pub fn new(validator: Validator, form: FormState) -> Self {
        Self {
            validator,
            form,
            errors: FieldErrors::new(),
            touched: BTreeSet::new(),
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    /// Replaces the whole form (e.g. after loading) and forgets touched state.
    pub fn reset(&mut self, form: FormState) {
        self.form = form;
        self.errors.clear();
        self.touched.clear();
    }

    /// Records a keystroke; already touched fields are re-validated immediately.
    pub fn set_value(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.form.set(field, value);
        if self.touched.contains(field) {
            self.refresh_error(field);
        }
    }

    /// Marks a field touched and validates it.
    pub fn blur(&mut self, field: &str) {
        self.touched.insert(field.to_string());
        self.refresh_error(field);
    }

    /// Submit-time check: replaces the error map and marks every checked field touched.
    pub fn validate_all(&mut self) -> bool {
        let validation = self.validator.validate_form(&self.form);
        self.touched
            .extend(validation.checked.iter().map(|name| name.to_string()));
        let is_valid = validation.is_valid();
        self.errors = validation.errors;
        is_valid
    }

    pub fn visible_error(&self, field: &str) -> Option<&str> {
        if !self.touched.contains(field) {
            return None;
        }
        self.errors.get(field).map(String::as_str)
    }

    fn refresh_error(&mut self, field: &str) {
        match self
            .validator
            .validate_field(field, self.form.get(field), &self.form)
        {
            Some(message) => {
                self.errors.insert(field.to_string(), message);
            }
            None => {
                self.errors.remove(field);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
