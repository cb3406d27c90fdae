//! The boolean composition tree.
//!
//! [`PQ`] combines search expressions with `&`, `|` and `!`. Combinators build
//! new trees and flatten nested groups of the same kind, so
//! `a & b & c` is one three-way `And`.
//!
//! ```
//! use paradedb_rs_search::query::expressions::{Fuzzy, PQ};
//!
//! let tree = PQ::term("shoes") | PQ::term("boots");
//! assert_eq!(tree.compile("description").unwrap(), "description ||| ARRAY['shoes', 'boots']");
//!
//! let mixed = PQ::term("running") & PQ::from(Fuzzy::new("sheos"));
//! assert_eq!(
//!     mixed.compile("description").unwrap(),
//!     "(description &&& 'running') AND (description ||| 'sheos'::pdb.fuzzy(1))"
//! );
//! ```

use std::collections::BTreeSet;
use std::ops;

use paradedb_rs_core::{ParadeError, ParadeResult};

use super::nodes::{
    All, Expr, Fuzzy, Match, MatchOperator, Parse, Phrase, PhrasePrefix, Proximity, ProximityArray,
    ProximityRegex, RangeTerm, Regex, RegexPhrase, Term,
};

/// A boolean tree of search expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum PQ {
    /// A single search expression.
    Leaf(Expr),
    /// All children must match.
    And(Vec<PQ>),
    /// Any child may match.
    Or(Vec<PQ>),
    /// The child must not match.
    Not(Box<PQ>),
}

/// Facts gathered in one pass over a tree.
#[derive(Debug, Default)]
struct TreeStats {
    fuzzy_operators: BTreeSet<MatchOperator>,
    proximity_leaves: usize,
}

impl PQ {
    /// A plain search string.
    pub fn term(text: impl Into<String>) -> Self {
        Self::Leaf(Expr::Match(Match::new(text)))
    }

    /// Returns `true` if this is a group with no children.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::And(children) | Self::Or(children) => children.is_empty(),
            _ => false,
        }
    }

    /// Checks every leaf and the cross-leaf rules of the tree.
    ///
    /// All `Fuzzy` leaves must share one operator, and a tree may contain at
    /// most one bare `Proximity` leaf.
    pub fn validate(&self) -> ParadeResult<()> {
        let mut stats = TreeStats::default();
        self.collect(&mut stats)?;

        if stats.fuzzy_operators.len() > 1 {
            let found = stats
                .fuzzy_operators
                .iter()
                .map(|op| op.name())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ParadeError::MixedFuzzyOperators { found });
        }
        if stats.proximity_leaves > 1 {
            return Err(ParadeError::MultipleProximityTerms {
                count: stats.proximity_leaves,
            });
        }
        Ok(())
    }

    fn collect(&self, stats: &mut TreeStats) -> ParadeResult<()> {
        match self {
            Self::Leaf(expr) => {
                expr.validate()?;
                match expr {
                    Expr::Fuzzy(f) => {
                        stats.fuzzy_operators.insert(f.match_operator());
                    }
                    Expr::Proximity(_) => stats.proximity_leaves += 1,
                    _ => {}
                }
                Ok(())
            }
            Self::And(children) | Self::Or(children) => {
                if children.is_empty() {
                    return Err(ParadeError::invalid(
                        "PQ groups must contain at least one expression",
                    ));
                }
                children.iter().try_for_each(|child| child.collect(stats))
            }
            Self::Not(inner) => inner.collect(stats),
        }
    }

    /// Validates and compiles the tree into one boolean SQL fragment.
    ///
    /// Groups are parenthesized child by child, so the output reads the same
    /// regardless of the consumer's operator precedence. A group whose children
    /// are all bare strings collapses into a single array match.
    pub fn compile(&self, column: &str) -> ParadeResult<String> {
        self.validate()?;
        self.render(column)
    }

    fn render(&self, column: &str) -> ParadeResult<String> {
        match self {
            Self::Leaf(expr) => expr.compile(column),
            Self::And(children) => render_group(children, MatchOperator::And, "AND", column),
            Self::Or(children) => render_group(children, MatchOperator::Or, "OR", column),
            Self::Not(inner) => Ok(format!("NOT ({})", inner.render(column)?)),
        }
    }

    /// Returns `true` if the compiled form is a bare `AND`/`OR` chain that
    /// needs parentheses when spliced next to other conditions.
    pub(crate) fn is_compound(&self) -> bool {
        match self {
            Self::And(children) => group_is_compound(children, MatchOperator::And),
            Self::Or(children) => group_is_compound(children, MatchOperator::Or),
            Self::Leaf(_) | Self::Not(_) => false,
        }
    }

    /// The terms of a simple-AND set of bare strings, if this is one.
    pub(crate) fn bare_and_terms(&self) -> Option<Vec<String>> {
        match self {
            Self::Leaf(expr) => expr.as_bare_match().map(|m| m.texts().to_vec()),
            Self::And(children) => collapse_terms(children, MatchOperator::And),
            _ => None,
        }
    }
}

fn group_is_compound(children: &[PQ], operator: MatchOperator) -> bool {
    match children {
        [only] => only.is_compound(),
        _ => collapse_terms(children, operator).is_none(),
    }
}

fn render_group(
    children: &[PQ],
    operator: MatchOperator,
    keyword: &str,
    column: &str,
) -> ParadeResult<String> {
    if let [only] = children {
        return only.render(column);
    }
    if let Some(terms) = collapse_terms(children, operator) {
        return Expr::Match(Match::terms(terms).operator(operator)).compile(column);
    }
    let parts = children
        .iter()
        .map(|child| child.render(column).map(|sql| format!("({sql})")))
        .collect::<ParadeResult<Vec<_>>>()?;
    Ok(parts.join(&format!(" {keyword} ")))
}

/// Gathers the strings of a group that can compile as one array match.
///
/// Under `And` every child must be a bare string leaf. Under `Or` each child
/// must also hold exactly one string, since a multi-term leaf means AND.
fn collapse_terms(children: &[PQ], operator: MatchOperator) -> Option<Vec<String>> {
    let mut terms = Vec::new();
    for child in children {
        let PQ::Leaf(expr) = child else {
            return None;
        };
        let m = expr.as_bare_match()?;
        if operator == MatchOperator::Or && m.texts().len() != 1 {
            return None;
        }
        terms.extend(m.texts().iter().cloned());
    }
    if terms.is_empty() {
        None
    } else {
        Some(terms)
    }
}

macro_rules! pq_from {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for PQ {
                fn from(expr: $source) -> Self {
                    Self::Leaf(expr.into())
                }
            }
        )+
    };
}

pq_from!(
    Expr,
    &str,
    String,
    Match,
    Phrase,
    Fuzzy,
    Term,
    Regex,
    Parse,
    Proximity,
    ProximityRegex,
    ProximityArray,
    PhrasePrefix,
    RegexPhrase,
    RangeTerm,
    All,
);

impl ops::BitAnd for PQ {
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

impl ops::BitOr for PQ {
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

impl ops::Not for PQ {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }
}
