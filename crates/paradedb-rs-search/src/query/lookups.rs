//! Lookups and Q objects for search filters.
//!
//! [`Lookup`] is a comparison applied to one column: either a ParadeDB search
//! or an ordinary comparison bound as a parameter. [`Q`] combines lookups and
//! similarity predicates with AND, OR and NOT.
//!
//! # Examples
//!
//! ```
//! use paradedb_rs_search::query::lookups::{Lookup, Q};
//! use paradedb_rs_search::query::expressions::ParadeDB;
//! use paradedb_rs_core::Value;
//!
//! // description &&& 'shoes' AND rating >= 4
//! let q = Q::search("description", ParadeDB::new("shoes"))
//!     & Q::filter("rating", Lookup::Gte(Value::from(4)));
//!
//! // NOT (in_stock = false)
//! let in_stock = !Q::filter("in_stock", Lookup::Exact(Value::from(false)));
//! ```

use std::ops;

use paradedb_rs_core::Value;

use super::expressions::{MoreLikeThis, ParadeDB};

/// A column-level comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Full-text search with a ParadeDB operator.
    Search(ParadeDB),
    /// Equality (`col = $n`, or `IS NULL` for a null value).
    Exact(Value),
    /// Membership (`col IN ($1, $2, ...)`).
    In(Vec<Value>),
    /// Greater than.
    Gt(Value),
    /// Greater than or equal.
    Gte(Value),
    /// Less than.
    Lt(Value),
    /// Less than or equal.
    Lte(Value),
    /// `IS NULL` when `true`, `IS NOT NULL` when `false`.
    IsNull(bool),
}

impl Lookup {
    /// Returns `true` for ParadeDB searches.
    pub const fn is_search(&self) -> bool {
        matches!(self, Self::Search(_))
    }
}

/// A composable filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Q {
    /// A lookup on one field.
    Filter {
        /// The field (column) name.
        field: String,
        /// The comparison.
        lookup: Lookup,
    },
    /// A similarity predicate on the key field.
    MoreLikeThis(MoreLikeThis),
    /// Logical AND.
    And(Vec<Q>),
    /// Logical OR.
    Or(Vec<Q>),
    /// Logical NOT.
    Not(Box<Q>),
}

impl Q {
    /// Creates a filter on a field.
    pub fn filter(field: impl Into<String>, lookup: Lookup) -> Self {
        Self::Filter {
            field: field.into(),
            lookup,
        }
    }

    /// Creates a ParadeDB search on a field.
    pub fn search(field: impl Into<String>, search: impl Into<ParadeDB>) -> Self {
        Self::filter(field, Lookup::Search(search.into()))
    }

    /// Creates a similarity predicate.
    pub fn more_like_this(mlt: MoreLikeThis) -> Self {
        Self::MoreLikeThis(mlt)
    }

    /// Returns `true` if this is an empty group.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::And(children) | Self::Or(children) => children.is_empty(),
            _ => false,
        }
    }
}

impl ops::BitAnd for Q {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), other) => {
                left.push(other);
                Self::And(left)
            }
            (other, Self::And(mut right)) => {
                right.insert(0, other);
                Self::And(right)
            }
            (left, right) => Self::And(vec![left, right]),
        }
    }
}

impl ops::BitOr for Q {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Or(mut left), Self::Or(right)) => {
                left.extend(right);
                Self::Or(left)
            }
            (Self::Or(mut left), other) => {
                left.push(other);
                Self::Or(left)
            }
            (other, Self::Or(mut right)) => {
                right.insert(0, other);
                Self::Or(right)
            }
            (left, right) => Self::Or(vec![left, right]),
        }
    }
}

impl ops::Not for Q {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_filter() {
        let q = Q::search("description", ParadeDB::new("shoes"));
        match &q {
            Q::Filter { field, lookup } => {
                assert_eq!(field, "description");
                assert!(lookup.is_search());
            }
            _ => panic!("Expected Filter"),
        }
    }

    #[test]
    fn test_and_flattening() {
        let q = (Q::filter("a", Lookup::Exact(Value::from(1)))
            & Q::filter("b", Lookup::Exact(Value::from(2))))
            & Q::more_like_this(MoreLikeThis::id(3));
        match &q {
            Q::And(children) => {
                assert_eq!(children.len(), 3);
                assert!(matches!(children[2], Q::MoreLikeThis(_)));
            }
            _ => panic!("Expected And"),
        }
    }

    #[test]
    fn test_or_flattening() {
        let q = Q::filter("a", Lookup::IsNull(true))
            | (Q::filter("b", Lookup::IsNull(true)) | Q::filter("c", Lookup::IsNull(false)));
        match &q {
            Q::Or(children) => assert_eq!(children.len(), 3),
            _ => panic!("Expected Or"),
        }
    }

    #[test]
    fn test_double_negation() {
        let q = Q::search("description", ParadeDB::new("shoes"));
        assert_eq!(!!q.clone(), q);
    }

    #[test]
    fn test_is_empty() {
        assert!(Q::And(Vec::new()).is_empty());
        assert!(!Q::filter("a", Lookup::IsNull(true)).is_empty());
    }
}
