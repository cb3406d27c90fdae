//! The `ParadeDB` search predicate.
//!
//! [`ParadeDB`] is the value a lookup compares a column against. It wraps a
//! [`PQ`] tree and optionally applies an operator, tokenizer or scoring
//! modifier to the whole search when the tree is made of plain strings.

use paradedb_rs_core::logging::compile_span;
use paradedb_rs_core::{ParadeError, ParadeResult};

use super::nodes::{Expr, Match, MatchOperator, Scoring};
use super::pq::PQ;

/// A full-text search against one column.
///
/// # Examples
///
/// ```
/// use paradedb_rs_search::query::expressions::{MatchOperator, ParadeDB, PQ};
///
/// let search = ParadeDB::terms(["shoes", "boots"]).unwrap().boost(2.0);
/// assert_eq!(
///     search.compile("description").unwrap(),
///     "description &&& ARRAY['shoes', 'boots']::pdb.boost(2.0)"
/// );
///
/// let either = ParadeDB::new(PQ::term("shoes") | PQ::term("boots"));
/// assert_eq!(
///     either.compile("description").unwrap(),
///     "description ||| ARRAY['shoes', 'boots']"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParadeDB {
    query: PQ,
    operator: Option<MatchOperator>,
    tokenizer: Option<String>,
    scoring: Option<Scoring>,
}

impl ParadeDB {
    /// Wraps a search tree or a single expression.
    pub fn new(query: impl Into<PQ>) -> Self {
        Self {
            query: query.into(),
            operator: None,
            tokenizer: None,
            scoring: None,
        }
    }

    /// Several plain strings that must all match.
    ///
    /// Returns an error if `terms` is empty.
    pub fn terms<I, S>(terms: I) -> ParadeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms: Vec<String> = terms.into_iter().map(Into::into).collect();
        if terms.is_empty() {
            return Err(ParadeError::invalid(
                "ParadeDB requires at least one search term",
            ));
        }
        Ok(Self::new(Match::terms(terms)))
    }

    /// Sets the operator for a plain-string search.
    #[must_use]
    pub const fn operator(mut self, operator: MatchOperator) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Sets the tokenizer for a plain-string search.
    #[must_use]
    pub fn tokenizer(mut self, name: impl Into<String>) -> Self {
        self.tokenizer = Some(name.into());
        self
    }

    /// Boosts a plain-string search.
    #[must_use]
    pub fn boost(mut self, factor: f64) -> Self {
        self.scoring = Some(Scoring::Boost(factor));
        self
    }

    /// Gives a plain-string search a constant score.
    #[must_use]
    pub fn constant(mut self, score: f64) -> Self {
        self.scoring = Some(Scoring::Const(score));
        self
    }

    /// The wrapped tree.
    pub const fn query(&self) -> &PQ {
        &self.query
    }

    /// Checks the tree and the wrapper options.
    pub fn validate(&self) -> ParadeResult<()> {
        self.query.validate()?;
        self.merged_match().map(|_| ())
    }

    /// Compiles the search into a predicate on `column`.
    ///
    /// `column` is spliced verbatim, so pass it already quoted.
    pub fn compile(&self, column: &str) -> ParadeResult<String> {
        let span = compile_span("predicate");
        let _guard = span.enter();

        self.query.validate()?;
        let sql = match self.merged_match()? {
            Some(merged) => Expr::Match(merged).compile(column)?,
            None => self.query.compile(column)?,
        };
        tracing::debug!(column = column, sql_len = sql.len(), "compiled ParadeDB predicate");
        Ok(sql)
    }

    /// Returns `true` if the compiled form needs parentheses when combined
    /// with other conditions.
    pub(crate) fn is_compound(&self) -> bool {
        self.first_option().is_none() && self.query.is_compound()
    }

    fn first_option(&self) -> Option<&'static str> {
        if self.operator.is_some() {
            Some("operator")
        } else if self.tokenizer.is_some() {
            Some("tokenizer")
        } else {
            match self.scoring {
                Some(Scoring::Boost(_)) => Some("boost"),
                Some(Scoring::Const(_)) => Some("const"),
                None => None,
            }
        }
    }

    /// Folds wrapper options into one `Match`, or `None` if there are none.
    fn merged_match(&self) -> ParadeResult<Option<Match>> {
        let Some(option) = self.first_option() else {
            return Ok(None);
        };
        let base = match &self.query {
            PQ::Leaf(Expr::Match(m)) => m.clone(),
            tree => match tree.bare_and_terms() {
                Some(terms) => Match::terms(terms),
                None => {
                    return Err(ParadeError::IncompatibleOperatorCombination(format!(
                        "ParadeDB {option} is only supported with plain string terms"
                    )))
                }
            },
        };
        Ok(Some(base.with_options(
            self.operator,
            self.tokenizer.as_deref(),
            self.scoring,
        )))
    }
}

impl From<PQ> for ParadeDB {
    fn from(query: PQ) -> Self {
        Self::new(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::expressions::nodes::{Fuzzy, Phrase};

    #[test]
    fn test_single_term() {
        let s = ParadeDB::new("shoes");
        assert_eq!(s.compile("description").unwrap(), "description &&& 'shoes'");
    }

    #[test]
    fn test_terms_match_pq_and_collapse() {
        let sugared = ParadeDB::terms(["x", "y"]).unwrap();
        let tree = ParadeDB::new(PQ::term("x") & PQ::term("y"));
        assert_eq!(sugared.compile("t").unwrap(), tree.compile("t").unwrap());
        assert_eq!(sugared.compile("t").unwrap(), "t &&& ARRAY['x', 'y']");
    }

    #[test]
    fn test_empty_terms_rejected() {
        let err = ParadeDB::terms(Vec::<String>::new()).unwrap_err();
        assert!(err.to_string().contains("at least one search term"));
    }

    #[test]
    fn test_operator_or() {
        let s = ParadeDB::terms(["shoes", "boots"]).unwrap().operator(MatchOperator::Or);
        assert_eq!(s.compile("description").unwrap(), "description ||| ARRAY['shoes', 'boots']");
    }

    #[test]
    fn test_operator_term() {
        let s = ParadeDB::new("Shoes").operator(MatchOperator::Term);
        assert_eq!(s.compile("category").unwrap(), "category === 'Shoes'");
    }

    #[test]
    fn test_tokenizer_and_boost() {
        let s = ParadeDB::new("shoes").tokenizer("whitespace").boost(2.0);
        assert_eq!(
            s.compile("description").unwrap(),
            "description &&& 'shoes'::pdb.whitespace::pdb.boost(2.0)"
        );
    }

    #[test]
    fn test_options_on_and_tree_merge() {
        let s = ParadeDB::new(PQ::term("a") & PQ::term("b")).constant(1.0);
        assert_eq!(s.compile("t").unwrap(), "t &&& ARRAY['a', 'b']::pdb.const(1.0)");
    }

    #[test]
    fn test_operator_on_phrase_rejected() {
        let err = ParadeDB::new(Phrase::new("running shoes"))
            .operator(MatchOperator::Or)
            .compile("t")
            .unwrap_err();
        assert!(matches!(err, ParadeError::IncompatibleOperatorCombination(_)));
        assert!(err.to_string().contains("operator is only supported"));
    }

    #[test]
    fn test_boost_on_or_tree_rejected() {
        let err = ParadeDB::new(PQ::term("a") | PQ::term("b"))
            .boost(2.0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("boost is only supported"));
    }

    #[test]
    fn test_tokenizer_on_fuzzy_rejected() {
        let err = ParadeDB::new(Fuzzy::new("shose"))
            .tokenizer("whitespace")
            .compile("t")
            .unwrap_err();
        assert!(err.to_string().contains("tokenizer is only supported"));
    }

    #[test]
    fn test_tree_errors_surface() {
        let s = ParadeDB::new(PQ::from(Fuzzy::new("a")) | PQ::from(Fuzzy::new("b").operator(MatchOperator::And)));
        assert!(matches!(
            s.compile("t").unwrap_err(),
            ParadeError::MixedFuzzyOperators { .. }
        ));
    }
}
