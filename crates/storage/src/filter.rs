//! Predicate AST for base filters
//!
//! Callers narrow the live view with a `Filter` combined (AND) with the
//! temporal-resolution predicate. The AST is deliberately small: equality and
//! range comparisons on named columns, substring match, and the boolean
//! combinators. Free-text query parsing stays outside this crate; the one
//! concession is `Filter::keyword`, which fans a needle out across a set of
//! fields as an OR of `Contains`.
//!
//! Columns are addressed by name; system columns (`key`, `effdt`, `effstatus`,
//! `prio`, `id`) resolve through the same projection the archive diff uses.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use tempora_core::{Value, VersionRow};

/// A predicate over a single versioned row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    /// Matches every row
    All,
    /// Column equals value
    Eq(String, Value),
    /// Column does not equal value
    Ne(String, Value),
    /// Column is strictly less than value (same-typed comparison)
    Lt(String, Value),
    /// Column is less than or equal to value
    Le(String, Value),
    /// Column is strictly greater than value
    Gt(String, Value),
    /// Column is greater than or equal to value
    Ge(String, Value),
    /// String column contains the needle, case-insensitive
    Contains(String, String),
    /// Both operands match
    And(Box<Filter>, Box<Filter>),
    /// Either operand matches
    Or(Box<Filter>, Box<Filter>),
    /// Operand does not match
    Not(Box<Filter>),
}

impl Filter {
    /// Keyword search across several fields: OR of case-insensitive contains
    ///
    /// An empty field list matches nothing (there is nowhere to look).
    pub fn keyword<S: AsRef<str>>(fields: &[S], needle: &str) -> Filter {
        let mut iter = fields.iter();
        let first = match iter.next() {
            Some(f) => Filter::Contains(f.as_ref().to_string(), needle.to_string()),
            None => return Filter::Not(Box::new(Filter::All)),
        };
        iter.fold(first, |acc, f| {
            Filter::Or(
                Box::new(acc),
                Box::new(Filter::Contains(f.as_ref().to_string(), needle.to_string())),
            )
        })
    }

    /// AND-combine with another filter, consuming both
    pub fn and(self, other: Filter) -> Filter {
        Filter::And(Box::new(self), Box::new(other))
    }

    /// Evaluate against a row
    pub fn matches(&self, row: &VersionRow) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(col, v) => row.display_value(col) == *v,
            Filter::Ne(col, v) => row.display_value(col) != *v,
            Filter::Lt(col, v) => Self::cmp(row, col, v) == Some(Ordering::Less),
            Filter::Le(col, v) => {
                matches!(Self::cmp(row, col, v), Some(Ordering::Less | Ordering::Equal))
            }
            Filter::Gt(col, v) => Self::cmp(row, col, v) == Some(Ordering::Greater),
            Filter::Ge(col, v) => {
                matches!(
                    Self::cmp(row, col, v),
                    Some(Ordering::Greater | Ordering::Equal)
                )
            }
            Filter::Contains(col, needle) => match row.display_value(col) {
                Value::String(s) => s.to_lowercase().contains(&needle.to_lowercase()),
                _ => false,
            },
            Filter::And(a, b) => a.matches(row) && b.matches(row),
            Filter::Or(a, b) => a.matches(row) || b.matches(row),
            Filter::Not(inner) => !inner.matches(row),
        }
    }

    fn cmp(row: &VersionRow, col: &str, v: &Value) -> Option<Ordering> {
        row.display_value(col).partial_cmp_same_type(v)
    }
}
