use crate::lookup::{LOOKUP_SEP, Lookup};
use crate::value::Value;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

/// A record that filter expressions can be evaluated against.
pub trait Record {
    /// Values reachable through `path` (one segment per relation hop).
    ///
    /// Single-valued fields return one element; reverse relations may return
    /// many. An unknown path returns an empty vector.
    fn values(&self, path: &[&str]) -> Vec<Value>;

    /// Rows behind a multi-valued relation such as `published_books`.
    ///
    /// Conjoined predicates through the same relation must hold on one row.
    /// `None` for unknown or single-valued relations.
    fn related(&self, _relation: &str) -> Option<Vec<Box<dyn Record + '_>>> {
        None
    }
}

/// One column comparison, e.g. `price__gte = 5`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub lookup: Lookup,
    pub value: Value,
}

impl Predicate {
    pub fn new(column: impl Into<String>, lookup: Lookup, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            lookup,
            value: value.into(),
        }
    }

    /// Build from a combined path such as `author__name__icontains`.
    pub fn from_path(path: &str, value: impl Into<Value>) -> Self {
        let (column, lookup) = Lookup::split_path(path);
        Self::new(column, lookup, value)
    }

    /// A multi-valued path matches when any of its values matches. A path with
    /// no values is treated as a single null.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        let segments: Vec<&str> = self.column.split(LOOKUP_SEP).collect();
        let values = record.values(&segments);
        if values.is_empty() {
            return self.lookup.apply(&Value::Null, &self.value);
        }
        values.iter().any(|v| self.lookup.apply(v, &self.value))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{LOOKUP_SEP}{} = {}", self.column, self.lookup, self.value)
    }
}

/// Boolean filter over records.
///
/// `All` is the identity for conjunction: it matches every record and is what
/// an empty search produces.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterExpression {
    #[default]
    All,
    Predicate(Predicate),
    And(Vec<FilterExpression>),
    Or(Vec<FilterExpression>),
    Not(Box<FilterExpression>),
}

impl FilterExpression {
    pub fn predicate(column: impl Into<String>, lookup: Lookup, value: impl Into<Value>) -> Self {
        Self::Predicate(Predicate::new(column, lookup, value))
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Conjoin `other` onto this expression, flattening nested `And`s.
    #[must_use]
    pub fn and(self, other: FilterExpression) -> Self {
        match (self, other) {
            (Self::All, e) | (e, Self::All) => e,
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), e) => {
                left.push(e);
                Self::And(left)
            }
            (e, Self::And(mut right)) => {
                right.insert(0, e);
                Self::And(right)
            }
            (a, b) => Self::And(vec![a, b]),
        }
    }

    /// Disjoin `other` with this expression. `All` absorbs the other side.
    #[must_use]
    pub fn or(self, other: FilterExpression) -> Self {
        match (self, other) {
            (Self::All, _) | (_, Self::All) => Self::All,
            (Self::Or(mut left), Self::Or(right)) => {
                left.extend(right);
                Self::Or(left)
            }
            (Self::Or(mut left), e) => {
                left.push(e);
                Self::Or(left)
            }
            (a, b) => Self::Or(vec![a, b]),
        }
    }

    /// Conjunction of all expressions; `All` when the iterator is empty.
    pub fn all_of(exprs: impl IntoIterator<Item = FilterExpression>) -> Self {
        exprs.into_iter().fold(Self::All, Self::and)
    }

    /// Disjunction of all expressions; matches nothing when the iterator is empty.
    pub fn any_of(exprs: impl IntoIterator<Item = FilterExpression>) -> Self {
        Self::Or(exprs.into_iter().collect())
    }

    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Self::All => true,
            Self::Predicate(p) => p.matches(record),
            Self::And(items) => and_matches(items, record),
            Self::Or(items) => items.iter().any(|e| e.matches(record)),
            Self::Not(inner) => !inner.matches(record),
        }
    }

    /// Every predicate in the tree, depth first.
    pub fn predicates(&self) -> Vec<&Predicate> {
        let mut out = Vec::new();
        self.collect_predicates(&mut out);
        out
    }

    fn collect_predicates<'a>(&'a self, out: &mut Vec<&'a Predicate>) {
        match self {
            Self::All => {}
            Self::Predicate(p) => out.push(p),
            Self::And(items) | Self::Or(items) => {
                for item in items {
                    item.collect_predicates(out);
                }
            }
            Self::Not(inner) => inner.collect_predicates(out),
        }
    }
}

/// Direct predicate children that traverse the same multi-valued relation
/// are evaluated together against each related row; everything else is
/// evaluated on its own.
fn and_matches<R: Record + ?Sized>(items: &[FilterExpression], record: &R) -> bool {
    let mut groups: Vec<(&str, Vec<&Predicate>)> = Vec::new();
    for item in items {
        if let FilterExpression::Predicate(p) = item
            && let Some((relation, _)) = p.column.split_once(LOOKUP_SEP)
            && record.related(relation).is_some()
        {
            match groups.iter_mut().find(|(name, _)| *name == relation) {
                Some((_, preds)) => preds.push(p),
                None => groups.push((relation, vec![p])),
            }
            continue;
        }
        if !item.matches(record) {
            return false;
        }
    }

    groups.into_iter().all(|(relation, preds)| match preds.as_slice() {
        [single] => single.matches(record),
        _ => {
            let scoped: Vec<Predicate> = preds
                .iter()
                .map(|p| {
                    let rest = &p.column[relation.len() + LOOKUP_SEP.len()..];
                    Predicate::new(rest, p.lookup, p.value.clone())
                })
                .collect();
            record.related(relation).is_some_and(|rows| {
                rows.iter()
                    .any(|row| scoped.iter().all(|p| p.matches(&**row)))
            })
        }
    })
}

impl From<Predicate> for FilterExpression {
    fn from(p: Predicate) -> Self {
        Self::Predicate(p)
    }
}

impl BitAnd for FilterExpression {
    type Output = FilterExpression;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl BitOr for FilterExpression {
    type Output = FilterExpression;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl Not for FilterExpression {
    type Output = FilterExpression;

    fn not(self) -> Self::Output {
        match self {
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[FilterExpression], op: &str) -> fmt::Result {
            f.write_str("(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " {op} ")?;
                }
                write!(f, "{item}")?;
            }
            f.write_str(")")
        }

        match self {
            Self::All => f.write_str("ALL"),
            Self::Predicate(p) => write!(f, "{p}"),
            Self::And(items) => join(f, items, "AND"),
            Self::Or(items) => join(f, items, "OR"),
            Self::Not(inner) => write!(f, "NOT {inner}"),
        }
    }
}
