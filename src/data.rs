use std::fmt;

use serde::{Deserialize, Serialize};

/// A loosely typed scalar as it arrives from a CSV field or a workbook cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl Value {
    /// String representation used for distinct-value counting and chart categories.
    pub fn as_display(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => format_number_literal(*n),
            Value::Boolean(b) => b.to_string(),
        }
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(self, Value::Text(s) if s.is_empty())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Outcome of interpreting a value as a finite number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coercion {
    Numeric(f64),
    NotNumeric,
}

impl Coercion {
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Coercion::Numeric(n) => Some(n),
            Coercion::NotNumeric => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Coercion::Numeric(_))
    }
}

/// Interprets a cell as a finite number.
///
/// Text is trimmed and parsed with Rust's decimal float grammar: an optional
/// sign, digits with an optional fraction, and an optional exponent
/// (`1.5e3` is accepted). Hexadecimal literals, digit separators, currency
/// symbols, and the `inf`/`nan` spellings are rejected, as is anything that
/// overflows to infinity. Booleans never coerce. Missing cells are
/// `NotNumeric`.
pub fn coerce(value: Option<&Value>) -> Coercion {
    match value {
        Some(Value::Number(n)) if n.is_finite() => Coercion::Numeric(*n),
        Some(Value::Text(text)) => coerce_text(text),
        _ => Coercion::NotNumeric,
    }
}

fn coerce_text(text: &str) -> Coercion {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return Coercion::NotNumeric;
    }
    match trimmed.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Coercion::Numeric(parsed),
        _ => Coercion::NotNumeric,
    }
}

fn format_number_literal(value: f64) -> String {
    if value == 0.0 {
        // -0 prints as "0" so it groups with 0.
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// One source record: headers paired with their raw cell, in source column order.
///
/// A `None` cell is an explicit null. Headers that a record does not carry are
/// simply absent from `fields`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub fields: Vec<(String, Option<Value>)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, header: impl Into<String>, value: Option<Value>) {
        self.fields.push((header.into(), value));
    }

    pub fn get(&self, header: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == header)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Option<Value>)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (String, Option<Value>)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
