use std::{collections::BTreeMap, fmt, ops::Deref, sync::Arc};

use shared::{
    domain::Category,
    protocol::{lenient, ListingDetail},
};

use crate::schema::{schema_for, FieldKind};

/// Raw user input for one form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Nothing chosen yet (dropdowns, yes/no pickers).
    Unset,
    Text(String),
    Flag(bool),
    Number(f64),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Input as the user would see it typed; `Unset` reads as the empty string.
    pub fn raw(&self) -> String {
        match self {
            FieldValue::Unset => String::new(),
            FieldValue::Text(text) => text.clone(),
            FieldValue::Flag(flag) => flag.to_string(),
            FieldValue::Number(number) => number.to_string(),
        }
    }

    pub fn trimmed(&self) -> String {
        match self {
            FieldValue::Text(text) => text.trim().to_string(),
            other => other.raw(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Unset => true,
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Flag(_) | FieldValue::Number(_) => false,
        }
    }

    pub fn flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Finite numeric reading of the value, `None` when blank or unparseable.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(number) => Some(*number).filter(|v| v.is_finite()),
            FieldValue::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                text.parse::<f64>().ok().filter(|v| v.is_finite())
            }
            FieldValue::Unset | FieldValue::Flag(_) => None,
        }
    }

    /// Whole-number reading; fractional or out-of-range input does not count.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Text(text) => {
                let text = text.trim();
                text.parse::<i64>()
                    .ok()
                    .or_else(|| text.parse::<f64>().ok().and_then(lenient::whole_number))
            }
            FieldValue::Number(number) => lenient::whole_number(*number),
            _ => None,
        }
    }

    /// Comparison form used for change detection: strings are trimmed, everything else
    /// is taken as-is.
    pub fn normalized(&self) -> FieldValue {
        match self {
            FieldValue::Text(text) => FieldValue::Text(text.trim().to_string()),
            other => other.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<Option<bool>> for FieldValue {
    fn from(value: Option<bool>) -> Self {
        value.map_or(FieldValue::Unset, FieldValue::Flag)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw())
    }
}

static UNSET: FieldValue = FieldValue::Unset;

/// Field name → raw input for one create/update screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    values: BTreeMap<String, FieldValue>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank form for a category: every schema field present, text empty, pickers unset,
    /// feature flags off.
    pub fn blank(category: Category) -> Self {
        let mut form = Self::new();
        for spec in schema_for(category).fields {
            let value = match spec.kind {
                FieldKind::Feature => FieldValue::Flag(false),
                FieldKind::Flag | FieldKind::Choice(_) => FieldValue::Unset,
                _ => FieldValue::Text(String::new()),
            };
            form.set(spec.name, value);
        }
        form
    }

    /// Update-screen form populated from a fetched listing.
    pub fn from_detail(category: Category, detail: &ListingDetail) -> Self {
        let mut form = Self::new();
        for spec in schema_for(category).fields {
            let raw = detail.field(spec.name);
            let value = match spec.kind {
                FieldKind::Feature => {
                    FieldValue::Flag(raw.and_then(|v| v.as_bool()).unwrap_or(false))
                }
                FieldKind::Flag => raw.and_then(|v| v.as_bool()).into(),
                FieldKind::Choice(_) => raw
                    .and_then(lenient::value_as_text)
                    .map_or(FieldValue::Unset, FieldValue::Text),
                _ => FieldValue::Text(raw.and_then(lenient::value_as_text).unwrap_or_default()),
            };
            form.set(spec.name, value);
        }
        form
    }

    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Missing fields read as `Unset`.
    pub fn get(&self, name: &str) -> &FieldValue {
        self.values.get(name).unwrap_or(&UNSET)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).flag()
    }

    pub fn trimmed(&self, name: &str) -> String {
        self.get(name).trimmed()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Immutable copy of a form as loaded from the server.
///
/// Cloning shares the underlying state; a fresh snapshot is captured only after a
/// successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineSnapshot(Arc<FormState>);

impl BaselineSnapshot {
    pub fn capture(form: &FormState) -> Self {
        Self(Arc::new(form.clone()))
    }
}

impl Deref for BaselineSnapshot {
    type Target = FormState;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
