use crate::value::Value;
use catalog_core::parse_date;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

/// One option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Rule turning a raw query-string value into a typed [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum Coercion {
    /// Pass-through, surrounding whitespace stripped.
    Text,
    Integer,
    Decimal,
    Boolean,
    Date,
    /// One of a fixed set of codes.
    Choice(Vec<Choice>),
    /// Comma-separated list, each item coerced with `item`.
    Csv {
        item: Box<Coercion>,
        len: Option<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("Enter a whole number.")]
    Integer,
    #[error("Enter a number.")]
    Decimal,
    #[error("Enter a valid boolean.")]
    Boolean,
    #[error("Enter a valid date.")]
    Date,
    #[error("Select a valid choice. {0} is not one of the available choices.")]
    Choice(String),
    #[error("Expected {expected} comma-separated values, got {found}.")]
    Length { expected: usize, found: usize },
    #[error("{0}")]
    Item(Box<CoercionError>),
}

impl Coercion {
    /// Choice coercion from `(code, label)` pairs.
    pub fn choices<I, V, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        Self::Choice(pairs.into_iter().map(|(v, l)| Choice::new(v, l)).collect())
    }

    /// Comma-separated pair, as used by `range` lookups.
    pub fn range_of(item: Coercion) -> Self {
        Self::Csv {
            item: Box::new(item),
            len: Some(2),
        }
    }

    pub fn list_of(item: Coercion) -> Self {
        Self::Csv {
            item: Box::new(item),
            len: None,
        }
    }

    pub fn coerce(&self, raw: &str) -> Result<Value, CoercionError> {
        let raw = raw.trim();
        match self {
            Self::Text => Ok(Value::Text(raw.to_string())),
            Self::Integer => raw
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| CoercionError::Integer),
            Self::Decimal => Decimal::from_str(raw)
                .map(Value::Decimal)
                .map_err(|_| CoercionError::Decimal),
            Self::Boolean => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
                "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
                _ => Err(CoercionError::Boolean),
            },
            Self::Date => parse_date(raw)
                .map(Value::Date)
                .map_err(|_| CoercionError::Date),
            Self::Choice(choices) => {
                if choices.iter().any(|c| c.value == raw) {
                    Ok(Value::Text(raw.to_string()))
                } else {
                    Err(CoercionError::Choice(raw.to_string()))
                }
            }
            Self::Csv { item, len } => {
                let parts: Vec<&str> = raw.split(',').collect();
                if let Some(expected) = len
                    && parts.len() != *expected
                {
                    return Err(CoercionError::Length {
                        expected: *expected,
                        found: parts.len(),
                    });
                }
                parts
                    .into_iter()
                    .map(|p| item.coerce(p).map_err(|e| CoercionError::Item(Box::new(e))))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List)
            }
        }
    }

    /// HTML input type used when rendering the field.
    pub fn widget(&self) -> &'static str {
        match self {
            Self::Text | Self::Csv { .. } => "text",
            Self::Integer | Self::Decimal => "number",
            Self::Date => "date",
            Self::Boolean | Self::Choice(_) => "select",
        }
    }

    /// Options for select widgets; empty for free-form inputs.
    pub fn options(&self) -> Vec<Choice> {
        match self {
            Self::Choice(choices) => choices.clone(),
            Self::Boolean => vec![Choice::new("true", "Yes"), Choice::new("false", "No")],
            _ => Vec::new(),
        }
    }
}
