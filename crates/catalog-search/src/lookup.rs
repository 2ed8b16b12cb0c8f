use crate::value::Value;
use std::cmp::Ordering;
use std::fmt;

/// Separator between relation hops and the trailing lookup: `author__name__icontains`.
pub const LOOKUP_SEP: &str = "__";

/// Comparison operator applied between a record value and an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    Exact,
    IExact,
    Contains,
    IContains,
    StartsWith,
    IStartsWith,
    EndsWith,
    IEndsWith,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Range,
    Year,
    IsNull,
}

impl Lookup {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "exact" => Some(Self::Exact),
            "iexact" => Some(Self::IExact),
            "contains" => Some(Self::Contains),
            "icontains" => Some(Self::IContains),
            "startswith" => Some(Self::StartsWith),
            "istartswith" => Some(Self::IStartsWith),
            "endswith" => Some(Self::EndsWith),
            "iendswith" => Some(Self::IEndsWith),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "in" => Some(Self::In),
            "range" => Some(Self::Range),
            "year" => Some(Self::Year),
            "isnull" => Some(Self::IsNull),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::IExact => "iexact",
            Self::Contains => "contains",
            Self::IContains => "icontains",
            Self::StartsWith => "startswith",
            Self::IStartsWith => "istartswith",
            Self::EndsWith => "endswith",
            Self::IEndsWith => "iendswith",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::In => "in",
            Self::Range => "range",
            Self::Year => "year",
            Self::IsNull => "isnull",
        }
    }

    /// Split `price__gte` into `("price", Gte)`.
    ///
    /// A path whose last segment is not a lookup name is an exact match on the
    /// whole path: `author__name` becomes `("author__name", Exact)`.
    pub fn split_path(path: &str) -> (&str, Lookup) {
        if let Some((column, last)) = path.rsplit_once(LOOKUP_SEP)
            && let Some(lookup) = Lookup::parse(last)
        {
            return (column, lookup);
        }
        (path, Lookup::Exact)
    }

    /// Whether `record` satisfies this lookup against `operand`.
    pub fn apply(&self, record: &Value, operand: &Value) -> bool {
        match self {
            Self::Exact => record.equals(operand),
            Self::IExact => text_match(record, operand, |r, o| r.to_lowercase() == o.to_lowercase()),
            Self::Contains => text_match(record, operand, |r, o| r.contains(o)),
            Self::IContains => {
                text_match(record, operand, |r, o| r.to_lowercase().contains(&o.to_lowercase()))
            }
            Self::StartsWith => text_match(record, operand, |r, o| r.starts_with(o)),
            Self::IStartsWith => text_match(record, operand, |r, o| {
                r.to_lowercase().starts_with(&o.to_lowercase())
            }),
            Self::EndsWith => text_match(record, operand, |r, o| r.ends_with(o)),
            Self::IEndsWith => text_match(record, operand, |r, o| {
                r.to_lowercase().ends_with(&o.to_lowercase())
            }),
            Self::Gt => record.compare(operand) == Some(Ordering::Greater),
            Self::Gte => matches!(
                record.compare(operand),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Self::Lt => record.compare(operand) == Some(Ordering::Less),
            Self::Lte => matches!(
                record.compare(operand),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Self::In => match operand {
                Value::List(items) => items.iter().any(|item| record.equals(item)),
                other => record.equals(other),
            },
            Self::Range => match operand {
                Value::List(bounds) if bounds.len() == 2 => {
                    Self::Gte.apply(record, &bounds[0]) && Self::Lte.apply(record, &bounds[1])
                }
                _ => false,
            },
            Self::Year => match (record, operand) {
                (Value::Date(date), Value::Integer(year)) => i64::from(date.year()) == *year,
                _ => false,
            },
            Self::IsNull => match operand {
                Value::Bool(expected) => record.is_null() == *expected,
                _ => false,
            },
        }
    }
}

fn text_match(record: &Value, operand: &Value, matcher: impl Fn(&str, &str) -> bool) -> bool {
    match (record.as_text(), operand.as_text()) {
        (Some(r), Some(o)) => matcher(&r, &o),
        _ => false,
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
