//! Leaf search expressions.
//!
//! Each node type compiles to exactly one ParadeDB operator or function call
//! against a column:
//!
//! | Node | SQL |
//! |---|---|
//! | [`Match`] | `col &&& 'a'`, `col ||| ARRAY['a', 'b']`, `col === 'a'` |
//! | [`Phrase`] | `col ### 'a b'::pdb.slop(n)` |
//! | [`Fuzzy`] | `col ||| 'a'::pdb.fuzzy(d[, prefix][, transposition])` |
//! | [`Term`] | `col === 'a'` |
//! | [`Regex`] | `col @@@ pdb.regex('p')` |
//! | [`Parse`] | `col @@@ pdb.parse('q', lenient => true)` |
//! | [`Proximity`] | `col @@@ pdb.proximity('a' ## d ## 'b')` |
//! | [`ProximityRegex`] | `col @@@ pdb.proximity('a' ## d ## pdb.prox_regex('p', n))` |
//! | [`ProximityArray`] | `col @@@ pdb.proximity(pdb.prox_array('a', 'b') ## d ## 'c')` |
//! | [`PhrasePrefix`] | `col @@@ pdb.phrase_prefix(ARRAY[...])` |
//! | [`RegexPhrase`] | `col @@@ pdb.regex_phrase(ARRAY[...])` |
//! | [`RangeTerm`] | `col @@@ pdb.range_term(...)` |
//! | [`All`] | `col @@@ pdb.all()` |
//!
//! Nodes are plain values. Builder methods consume and return `self`, so a
//! node never changes after it has been placed in a tree. Argument checks that
//! cannot be expressed in the types run in [`Expr::validate`], which every
//! compile path calls first.

use std::fmt;
use std::str::FromStr;

use paradedb_rs_core::sql::{ensure_identifier, format_bool, format_float, literal_array, quote_literal};
use paradedb_rs_core::{ParadeError, ParadeResult};

/// Default `max_expansions` for regex proximity targets.
pub const DEFAULT_PROX_REGEX_EXPANSIONS: u32 = 50;

/// Largest edit distance the engine accepts for fuzzy matching.
pub const MAX_FUZZY_DISTANCE: u8 = 2;

// ============================================================
// Operators and scoring
// ============================================================

/// How the terms of a [`Match`] or [`Fuzzy`] node are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum MatchOperator {
    /// Every term must match (`&&&`).
    #[default]
    And,
    /// Any term may match (`|||`).
    Or,
    /// Exact, untokenized match (`===`).
    Term,
}

impl MatchOperator {
    /// The ParadeDB operator symbol.
    pub const fn sql_operator(self) -> &'static str {
        match self {
            Self::And => "&&&",
            Self::Or => "|||",
            Self::Term => "===",
        }
    }

    /// The upper-case name used in messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Term => "TERM",
        }
    }
}

impl fmt::Display for MatchOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MatchOperator {
    type Err = ParadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            "TERM" => Ok(Self::Term),
            _ => Err(ParadeError::invalid(format!(
                "ParadeDB operator must be 'AND', 'OR', or 'TERM', got '{s}'"
            ))),
        }
    }
}

/// A relevance modifier appended to a compiled fragment.
///
/// Boost and const cannot be combined; the enum holds exactly one. Values are
/// forwarded as given and the engine validates their range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scoring {
    /// Multiply the BM25 score (`::pdb.boost(f)`).
    Boost(f64),
    /// Replace the score with a constant (`::pdb.const(f)`).
    Const(f64),
}

impl Scoring {
    /// Renders the cast suffix, e.g. `::pdb.boost(2.0)`.
    pub fn to_sql(self) -> String {
        match self {
            Self::Boost(v) => format!("::pdb.boost({})", format_float(v)),
            Self::Const(v) => format!("::pdb.const({})", format_float(v)),
        }
    }
}

fn push_scoring(sql: &mut String, scoring: Option<Scoring>) {
    if let Some(scoring) = scoring {
        sql.push_str(&scoring.to_sql());
    }
}

macro_rules! scoring_builders {
    ($($node:ty),+ $(,)?) => {
        $(
            impl $node {
                /// Boosts this node's score. Replaces any previous scoring modifier.
                #[must_use]
                pub fn boost(mut self, factor: f64) -> Self {
                    self.scoring = Some(Scoring::Boost(factor));
                    self
                }

                /// Assigns a constant score. Replaces any previous scoring modifier.
                #[must_use]
                pub fn constant(mut self, score: f64) -> Self {
                    self.scoring = Some(Scoring::Const(score));
                    self
                }

                /// Returns the scoring modifier, if any.
                pub const fn scoring(&self) -> Option<Scoring> {
                    self.scoring
                }
            }
        )+
    };
}

// ============================================================
// Match (plain strings)
// ============================================================

/// One or more plain search strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    terms: Vec<String>,
    operator: MatchOperator,
    tokenizer: Option<String>,
    scoring: Option<Scoring>,
}

impl Match {
    /// A single search string with the default `AND` operator.
    pub fn new(term: impl Into<String>) -> Self {
        Self::terms([term.into()])
    }

    /// Several search strings compiled as one array.
    pub fn terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
            operator: MatchOperator::And,
            tokenizer: None,
            scoring: None,
        }
    }

    /// Sets the match operator.
    #[must_use]
    pub const fn operator(mut self, operator: MatchOperator) -> Self {
        self.operator = operator;
        self
    }

    /// Casts the query text through a named tokenizer (`::pdb.<name>`).
    #[must_use]
    pub fn tokenizer(mut self, name: impl Into<String>) -> Self {
        self.tokenizer = Some(name.into());
        self
    }

    /// The search strings.
    pub fn texts(&self) -> &[String] {
        &self.terms
    }

    /// The match operator.
    pub const fn match_operator(&self) -> MatchOperator {
        self.operator
    }

    /// `true` for default-operator strings without tokenizer or scoring.
    pub(crate) fn is_bare(&self) -> bool {
        self.operator == MatchOperator::And && self.tokenizer.is_none() && self.scoring.is_none()
    }

    /// Folds wrapper-level options into this node.
    pub(crate) fn with_options(
        mut self,
        operator: Option<MatchOperator>,
        tokenizer: Option<&str>,
        scoring: Option<Scoring>,
    ) -> Self {
        if let Some(op) = operator {
            self.operator = op;
        }
        if let Some(tok) = tokenizer {
            self.tokenizer = Some(tok.to_string());
        }
        if scoring.is_some() {
            self.scoring = scoring;
        }
        self
    }

    fn validate(&self) -> ParadeResult<()> {
        if self.terms.is_empty() {
            return Err(ParadeError::invalid(
                "ParadeDB requires at least one search term",
            ));
        }
        if let Some(ref tok) = self.tokenizer {
            ensure_identifier(tok, "tokenizer")?;
        }
        Ok(())
    }

    fn compile(&self, column: &str) -> String {
        let mut rhs = if let [single] = self.terms.as_slice() {
            quote_literal(single)
        } else {
            literal_array(&self.terms)
        };
        if let Some(ref tok) = self.tokenizer {
            rhs.push_str(&format!("::pdb.{tok}"));
        }
        push_scoring(&mut rhs, self.scoring);
        format!("{column} {} {rhs}", self.operator.sql_operator())
    }
}

// ============================================================
// Phrase
// ============================================================

/// An ordered phrase match (`###`).
#[derive(Debug, Clone, PartialEq)]
pub struct Phrase {
    text: String,
    slop: Option<u32>,
    tokenizer: Option<String>,
    scoring: Option<Scoring>,
}

impl Phrase {
    /// Creates a phrase search.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            slop: None,
            tokenizer: None,
            scoring: None,
        }
    }

    /// Allows up to `slop` intervening tokens between phrase words.
    #[must_use]
    pub const fn slop(mut self, slop: u32) -> Self {
        self.slop = Some(slop);
        self
    }

    /// Casts the phrase through a named tokenizer.
    #[must_use]
    pub fn tokenizer(mut self, name: impl Into<String>) -> Self {
        self.tokenizer = Some(name.into());
        self
    }

    fn validate(&self) -> ParadeResult<()> {
        if let Some(ref tok) = self.tokenizer {
            ensure_identifier(tok, "tokenizer")?;
        }
        Ok(())
    }

    fn compile(&self, column: &str) -> String {
        let mut sql = format!("{column} ### {}", quote_literal(&self.text));
        if let Some(slop) = self.slop {
            sql.push_str(&format!("::pdb.slop({slop})"));
        }
        if let Some(ref tok) = self.tokenizer {
            sql.push_str(&format!("::pdb.{tok}"));
        }
        push_scoring(&mut sql, self.scoring);
        sql
    }
}

// ============================================================
// Fuzzy
// ============================================================

/// Edit-distance matching (`::pdb.fuzzy`).
#[derive(Debug, Clone, PartialEq)]
pub struct Fuzzy {
    text: String,
    distance: u8,
    operator: MatchOperator,
    prefix: bool,
    transposition_cost_one: bool,
    scoring: Option<Scoring>,
}

impl Fuzzy {
    /// Creates a fuzzy search with distance 1 and the `OR` operator.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            distance: 1,
            operator: MatchOperator::Or,
            prefix: false,
            transposition_cost_one: false,
            scoring: None,
        }
    }

    /// Sets the maximum edit distance (0 to 2).
    #[must_use]
    pub const fn distance(mut self, distance: u8) -> Self {
        self.distance = distance;
        self
    }

    /// Sets the operator used to combine tokens of the text.
    #[must_use]
    pub const fn operator(mut self, operator: MatchOperator) -> Self {
        self.operator = operator;
        self
    }

    /// Treats the text as a prefix.
    #[must_use]
    pub const fn prefix(mut self, prefix: bool) -> Self {
        self.prefix = prefix;
        self
    }

    /// Counts a transposition as a single edit.
    #[must_use]
    pub const fn transposition_cost_one(mut self, enabled: bool) -> Self {
        self.transposition_cost_one = enabled;
        self
    }

    /// The operator this node compiles with.
    pub const fn match_operator(&self) -> MatchOperator {
        self.operator
    }

    fn validate(&self) -> ParadeResult<()> {
        if self.distance > MAX_FUZZY_DISTANCE {
            return Err(ParadeError::invalid(format!(
                "Fuzzy distance must be <= {MAX_FUZZY_DISTANCE}, got {}",
                self.distance
            )));
        }
        Ok(())
    }

    fn compile(&self, column: &str) -> String {
        let mut args = vec![self.distance.to_string()];
        if self.prefix || self.transposition_cost_one {
            args.push(if self.prefix { "t" } else { "f" }.to_string());
        }
        if self.transposition_cost_one {
            args.push("t".to_string());
        }
        let mut sql = format!(
            "{column} {} {}::pdb.fuzzy({})",
            self.operator.sql_operator(),
            quote_literal(&self.text),
            args.join(", ")
        );
        push_scoring(&mut sql, self.scoring);
        sql
    }
}

// ============================================================
// Term / Regex / Parse
// ============================================================

/// Exact term match against the indexed tokens (`===`).
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    text: String,
    scoring: Option<Scoring>,
}

impl Term {
    /// Creates an exact term search.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            scoring: None,
        }
    }

    fn compile(&self, column: &str) -> String {
        let mut sql = format!("{column} === {}", quote_literal(&self.text));
        push_scoring(&mut sql, self.scoring);
        sql
    }
}

/// Regular-expression match over indexed tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Regex {
    pattern: String,
    scoring: Option<Scoring>,
}

impl Regex {
    /// Creates a regex search.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            scoring: None,
        }
    }

    fn compile(&self, column: &str) -> String {
        let mut sql = format!("{column} @@@ pdb.regex({})", quote_literal(&self.pattern));
        push_scoring(&mut sql, self.scoring);
        sql
    }
}

/// A query string in the engine's query-parser syntax.
#[derive(Debug, Clone, PartialEq)]
pub struct Parse {
    query: String,
    lenient: Option<bool>,
    conjunction_mode: Option<bool>,
    scoring: Option<Scoring>,
}

impl Parse {
    /// Creates a parsed query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            lenient: None,
            conjunction_mode: None,
            scoring: None,
        }
    }

    /// Tolerates syntax errors in the query string.
    #[must_use]
    pub const fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = Some(lenient);
        self
    }

    /// Joins bare terms with AND instead of OR.
    #[must_use]
    pub const fn conjunction_mode(mut self, enabled: bool) -> Self {
        self.conjunction_mode = Some(enabled);
        self
    }

    fn compile(&self, column: &str) -> String {
        let mut args = vec![quote_literal(&self.query)];
        if let Some(lenient) = self.lenient {
            args.push(format!("lenient => {}", format_bool(lenient)));
        }
        if let Some(conjunction) = self.conjunction_mode {
            args.push(format!("conjunction_mode => {}", format_bool(conjunction)));
        }
        let mut sql = format!("{column} @@@ pdb.parse({})", args.join(", "));
        push_scoring(&mut sql, self.scoring);
        sql
    }
}

// ============================================================
// Proximity family
// ============================================================

const fn proximity_operator(ordered: bool) -> &'static str {
    if ordered {
        "##>"
    } else {
        "##"
    }
}

/// Words within `distance` tokens of each other.
///
/// The text is split on whitespace and must contain at least two words.
#[derive(Debug, Clone, PartialEq)]
pub struct Proximity {
    text: String,
    distance: u32,
    ordered: bool,
    scoring: Option<Scoring>,
}

impl Proximity {
    /// Creates an unordered proximity search.
    pub fn new(text: impl Into<String>, distance: u32) -> Self {
        Self {
            text: text.into(),
            distance,
            ordered: false,
            scoring: None,
        }
    }

    /// Requires the words to appear in the given order (`##>`).
    #[must_use]
    pub const fn ordered(mut self, ordered: bool) -> Self {
        self.ordered = ordered;
        self
    }

    fn validate(&self) -> ParadeResult<()> {
        if self.text.split_whitespace().count() < 2 {
            return Err(ParadeError::invalid(
                "Proximity text must include at least two whitespace-separated terms",
            ));
        }
        Ok(())
    }

    fn compile(&self, column: &str) -> String {
        let sep = format!(" {} {} {} ", proximity_operator(self.ordered), self.distance, proximity_operator(self.ordered));
        let words: Vec<String> = self.text.split_whitespace().map(quote_literal).collect();
        let mut sql = format!("{column} @@@ pdb.proximity({})", words.join(&sep));
        push_scoring(&mut sql, self.scoring);
        sql
    }
}

/// A term near any token matching a regex.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityRegex {
    left: String,
    pattern: String,
    distance: u32,
    max_expansions: u32,
    ordered: bool,
    scoring: Option<Scoring>,
}

impl ProximityRegex {
    /// Creates a regex proximity search with 50 max expansions.
    pub fn new(left: impl Into<String>, pattern: impl Into<String>, distance: u32) -> Self {
        Self {
            left: left.into(),
            pattern: pattern.into(),
            distance,
            max_expansions: DEFAULT_PROX_REGEX_EXPANSIONS,
            ordered: false,
            scoring: None,
        }
    }

    /// Limits how many index terms the pattern may expand to.
    #[must_use]
    pub const fn max_expansions(mut self, n: u32) -> Self {
        self.max_expansions = n;
        self
    }

    /// Requires the term to precede the pattern match.
    #[must_use]
    pub const fn ordered(mut self, ordered: bool) -> Self {
        self.ordered = ordered;
        self
    }

    fn validate(&self) -> ParadeResult<()> {
        if self.left.trim().is_empty() {
            return Err(ParadeError::invalid("ProximityRegex requires a left term"));
        }
        Ok(())
    }

    fn compile(&self, column: &str) -> String {
        let op = proximity_operator(self.ordered);
        let mut sql = format!(
            "{column} @@@ pdb.proximity({} {op} {} {op} pdb.prox_regex({}, {}))",
            quote_literal(&self.left),
            self.distance,
            quote_literal(&self.pattern),
            self.max_expansions
        );
        push_scoring(&mut sql, self.scoring);
        sql
    }
}

/// Right-hand side of a [`ProximityArray`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProximityTarget {
    /// A literal term.
    Term(String),
    /// Any token matching a regex.
    Pattern {
        /// The regular expression.
        pattern: String,
        /// Expansion limit for the pattern.
        max_expansions: u32,
    },
}

impl ProximityTarget {
    /// A literal term target.
    pub fn term(text: impl Into<String>) -> Self {
        Self::Term(text.into())
    }

    /// A regex target with the default expansion limit.
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            max_expansions: DEFAULT_PROX_REGEX_EXPANSIONS,
        }
    }

    /// Sets the expansion limit. No effect on term targets.
    #[must_use]
    pub fn max_expansions(self, n: u32) -> Self {
        match self {
            Self::Pattern { pattern, .. } => Self::Pattern {
                pattern,
                max_expansions: n,
            },
            term @ Self::Term(_) => term,
        }
    }

    fn to_sql(&self) -> String {
        match self {
            Self::Term(text) => quote_literal(text),
            Self::Pattern {
                pattern,
                max_expansions,
            } => format!("pdb.prox_regex({}, {max_expansions})", quote_literal(pattern)),
        }
    }
}

impl From<&str> for ProximityTarget {
    fn from(text: &str) -> Self {
        Self::term(text)
    }
}

impl From<String> for ProximityTarget {
    fn from(text: String) -> Self {
        Self::Term(text)
    }
}

/// Any of several terms near a target.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityArray {
    left: Vec<String>,
    right: ProximityTarget,
    distance: u32,
    ordered: bool,
    scoring: Option<Scoring>,
}

impl ProximityArray {
    /// Creates an array proximity search.
    pub fn new<I, S>(left: I, right: impl Into<ProximityTarget>, distance: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            left: left.into_iter().map(Into::into).collect(),
            right: right.into(),
            distance,
            ordered: false,
            scoring: None,
        }
    }

    /// Requires the left terms to precede the target.
    #[must_use]
    pub const fn ordered(mut self, ordered: bool) -> Self {
        self.ordered = ordered;
        self
    }

    fn validate(&self) -> ParadeResult<()> {
        if self.left.is_empty() {
            return Err(ParadeError::invalid(
                "ProximityArray requires at least one left term",
            ));
        }
        Ok(())
    }

    fn compile(&self, column: &str) -> String {
        let op = proximity_operator(self.ordered);
        let left: Vec<String> = self.left.iter().map(|t| quote_literal(t)).collect();
        let mut sql = format!(
            "{column} @@@ pdb.proximity(pdb.prox_array({}) {op} {} {op} {})",
            left.join(", "),
            self.distance,
            self.right.to_sql()
        );
        push_scoring(&mut sql, self.scoring);
        sql
    }
}

// ============================================================
// Phrase prefix / regex phrase
// ============================================================

/// A phrase whose last term is matched as a prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct PhrasePrefix {
    terms: Vec<String>,
    max_expansion: Option<u32>,
    scoring: Option<Scoring>,
}

impl PhrasePrefix {
    /// Creates a phrase-prefix search.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
            max_expansion: None,
            scoring: None,
        }
    }

    /// Limits how many index terms the prefix may expand to.
    #[must_use]
    pub const fn max_expansion(mut self, n: u32) -> Self {
        self.max_expansion = Some(n);
        self
    }

    fn validate(&self) -> ParadeResult<()> {
        if self.terms.is_empty() {
            return Err(ParadeError::invalid(
                "PhrasePrefix requires at least one phrase term",
            ));
        }
        Ok(())
    }

    fn compile(&self, column: &str) -> String {
        let mut args = vec![literal_array(&self.terms)];
        if let Some(n) = self.max_expansion {
            args.push(format!("max_expansion => {n}"));
        }
        let mut sql = format!("{column} @@@ pdb.phrase_prefix({})", args.join(", "));
        push_scoring(&mut sql, self.scoring);
        sql
    }
}

/// A phrase whose positions are matched by regular expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct RegexPhrase {
    patterns: Vec<String>,
    slop: Option<u32>,
    max_expansions: Option<u32>,
    scoring: Option<Scoring>,
}

impl RegexPhrase {
    /// Creates a regex-phrase search.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            slop: None,
            max_expansions: None,
            scoring: None,
        }
    }

    /// Allows intervening tokens between pattern positions.
    #[must_use]
    pub const fn slop(mut self, slop: u32) -> Self {
        self.slop = Some(slop);
        self
    }

    /// Limits expansions per pattern.
    #[must_use]
    pub const fn max_expansions(mut self, n: u32) -> Self {
        self.max_expansions = Some(n);
        self
    }

    fn validate(&self) -> ParadeResult<()> {
        if self.patterns.is_empty() {
            return Err(ParadeError::invalid(
                "RegexPhrase requires at least one pattern",
            ));
        }
        Ok(())
    }

    fn compile(&self, column: &str) -> String {
        let mut args = vec![literal_array(&self.patterns)];
        if let Some(slop) = self.slop {
            args.push(format!("slop => {slop}"));
        }
        if let Some(n) = self.max_expansions {
            args.push(format!("max_expansions => {n}"));
        }
        let mut sql = format!("{column} @@@ pdb.regex_phrase({})", args.join(", "));
        push_scoring(&mut sql, self.scoring);
        sql
    }
}

// ============================================================
// RangeTerm
// ============================================================

/// A scalar compared against a range-typed column.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeScalar {
    /// An integer.
    Int(i64),
    /// A float.
    Float(f64),
    /// A literal such as a date.
    Text(String),
}

impl RangeScalar {
    fn to_sql(&self) -> String {
        match self {
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format_float(*f),
            Self::Text(s) => quote_literal(s),
        }
    }
}

impl From<i64> for RangeScalar {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for RangeScalar {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for RangeScalar {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for RangeScalar {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Postgres range types accepted by `pdb.range_term`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeType {
    /// `int4range`
    Int4Range,
    /// `int8range`
    Int8Range,
    /// `numrange`
    NumRange,
    /// `daterange`
    DateRange,
    /// `tsrange`
    TsRange,
    /// `tstzrange`
    TsTzRange,
}

impl RangeType {
    /// The SQL type name.
    pub const fn sql_name(self) -> &'static str {
        match self {
            Self::Int4Range => "int4range",
            Self::Int8Range => "int8range",
            Self::NumRange => "numrange",
            Self::DateRange => "daterange",
            Self::TsRange => "tsrange",
            Self::TsTzRange => "tstzrange",
        }
    }
}

/// How a query range relates to the indexed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRelation {
    /// The ranges overlap.
    Intersects,
    /// The indexed range contains the query range.
    Contains,
    /// The indexed range lies within the query range.
    Within,
}

impl RangeRelation {
    /// The relation name passed to the engine.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Intersects => "Intersects",
            Self::Contains => "Contains",
            Self::Within => "Within",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum RangeQuery {
    Scalar(RangeScalar),
    Range {
        literal: String,
        range_type: RangeType,
        relation: RangeRelation,
    },
}

/// Matches range-typed columns against a value or another range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeTerm {
    query: RangeQuery,
    scoring: Option<Scoring>,
}

impl RangeTerm {
    /// Rows whose range contains `value`.
    pub fn value(value: impl Into<RangeScalar>) -> Self {
        Self {
            query: RangeQuery::Scalar(value.into()),
            scoring: None,
        }
    }

    /// Rows whose range relates to `literal` (e.g. `"(10, 12]"`) by `relation`.
    pub fn range(literal: impl Into<String>, range_type: RangeType, relation: RangeRelation) -> Self {
        Self {
            query: RangeQuery::Range {
                literal: literal.into(),
                range_type,
                relation,
            },
            scoring: None,
        }
    }

    fn compile(&self, column: &str) -> String {
        let args = match &self.query {
            RangeQuery::Scalar(v) => v.to_sql(),
            RangeQuery::Range {
                literal,
                range_type,
                relation,
            } => format!(
                "{}::{}, {}",
                quote_literal(literal),
                range_type.sql_name(),
                quote_literal(relation.name())
            ),
        };
        let mut sql = format!("{column} @@@ pdb.range_term({args})");
        push_scoring(&mut sql, self.scoring);
        sql
    }
}

/// Matches every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct All;

impl All {
    /// Creates a match-all expression.
    pub const fn new() -> Self {
        Self
    }
}

scoring_builders!(
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
);

// ============================================================
// Expr
// ============================================================

/// Any leaf search expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Plain strings.
    Match(Match),
    /// Phrase search.
    Phrase(Phrase),
    /// Fuzzy search.
    Fuzzy(Fuzzy),
    /// Exact term.
    Term(Term),
    /// Regex search.
    Regex(Regex),
    /// Query-parser string.
    Parse(Parse),
    /// Word proximity.
    Proximity(Proximity),
    /// Term near a regex match.
    ProximityRegex(ProximityRegex),
    /// Terms near a target.
    ProximityArray(ProximityArray),
    /// Phrase with prefix tail.
    PhrasePrefix(PhrasePrefix),
    /// Regex phrase.
    RegexPhrase(RegexPhrase),
    /// Range match.
    RangeTerm(RangeTerm),
    /// Match everything.
    All(All),
}

impl Expr {
    /// Short name of the node type, used in messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Match(_) => "Match",
            Self::Phrase(_) => "Phrase",
            Self::Fuzzy(_) => "Fuzzy",
            Self::Term(_) => "Term",
            Self::Regex(_) => "Regex",
            Self::Parse(_) => "Parse",
            Self::Proximity(_) => "Proximity",
            Self::ProximityRegex(_) => "ProximityRegex",
            Self::ProximityArray(_) => "ProximityArray",
            Self::PhrasePrefix(_) => "PhrasePrefix",
            Self::RegexPhrase(_) => "RegexPhrase",
            Self::RangeTerm(_) => "RangeTerm",
            Self::All(_) => "All",
        }
    }

    /// Checks this node's own arguments.
    pub fn validate(&self) -> ParadeResult<()> {
        match self {
            Self::Match(m) => m.validate(),
            Self::Phrase(p) => p.validate(),
            Self::Fuzzy(f) => f.validate(),
            Self::Proximity(p) => p.validate(),
            Self::ProximityRegex(p) => p.validate(),
            Self::ProximityArray(p) => p.validate(),
            Self::PhrasePrefix(p) => p.validate(),
            Self::RegexPhrase(r) => r.validate(),
            Self::Term(_) | Self::Regex(_) | Self::Parse(_) | Self::RangeTerm(_) | Self::All(_) => {
                Ok(())
            }
        }
    }

    /// Compiles this node into a predicate on `column`.
    ///
    /// `column` is spliced verbatim, so pass it already quoted.
    pub fn compile(&self, column: &str) -> ParadeResult<String> {
        self.validate()?;
        Ok(match self {
            Self::Match(m) => m.compile(column),
            Self::Phrase(p) => p.compile(column),
            Self::Fuzzy(f) => f.compile(column),
            Self::Term(t) => t.compile(column),
            Self::Regex(r) => r.compile(column),
            Self::Parse(p) => p.compile(column),
            Self::Proximity(p) => p.compile(column),
            Self::ProximityRegex(p) => p.compile(column),
            Self::ProximityArray(p) => p.compile(column),
            Self::PhrasePrefix(p) => p.compile(column),
            Self::RegexPhrase(r) => r.compile(column),
            Self::RangeTerm(r) => r.compile(column),
            Self::All(_) => format!("{column} @@@ pdb.all()"),
        })
    }

    /// Returns the node as a bare [`Match`], if it is one.
    pub(crate) fn as_bare_match(&self) -> Option<&Match> {
        match self {
            Self::Match(m) if m.is_bare() => Some(m),
            _ => None,
        }
    }
}

macro_rules! expr_from {
    ($($variant:ident),+ $(,)?) => {
        $(
            impl From<$variant> for Expr {
                fn from(node: $variant) -> Self {
                    Self::$variant(node)
                }
            }
        )+
    };
}

expr_from!(
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

impl From<&str> for Expr {
    fn from(term: &str) -> Self {
        Self::Match(Match::new(term))
    }
}

impl From<String> for Expr {
    fn from(term: String) -> Self {
        Self::Match(Match::new(term))
    }
}
