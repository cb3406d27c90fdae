//! Integration tests for search compilation.
//!
//! Covers the end-to-end flow from expression construction through the
//! queryset to SQL text and bound parameters.

use paradedb_rs_core::{ParadeError, Value};
use paradedb_rs_search::{
    Fuzzy, Lookup, MatchOperator, MoreLikeThis, OrderBy, ParadeDB, Phrase, Proximity, Regex,
    Score, SearchQuerySet, Snippet, PQ, Q,
};

// ── Literal safety ──────────────────────────────────────────────────

#[test]
fn test_injection_attempt_is_one_literal() {
    let sql = ParadeDB::new("'; DROP TABLE products; --")
        .compile("description")
        .unwrap();
    assert_eq!(sql, "description &&& '''; DROP TABLE products; --'");
}

#[test]
fn test_escaped_literal_round_trips() {
    let inputs = ["plain", "it's", "''", "a'b'c", "\\'", "O'Reilly's \"book\""];
    for input in inputs {
        let sql = ParadeDB::new(input).compile("t").unwrap();
        let literal = sql.strip_prefix("t &&& ").unwrap();
        let inner = &literal[1..literal.len() - 1];
        assert_eq!(inner.replace("''", "'"), input);
        assert_eq!(inner.matches('\'').count() % 2, 0, "unpaired quote in {literal}");
    }
}

#[test]
fn test_queryset_injection_stays_in_literal() {
    let (sql, params) = SearchQuerySet::new("products")
        .search("description", ParadeDB::new("x' OR 1=1 --"))
        .unwrap()
        .sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM \"products\" WHERE \"description\" &&& 'x'' OR 1=1 --'"
    );
    assert!(params.is_empty());
}

// ── Composition ─────────────────────────────────────────────────────

#[test]
fn test_or_scenario() {
    let sql = ParadeDB::new(PQ::term("shoes") | PQ::term("boots"))
        .compile("description")
        .unwrap();
    assert_eq!(sql, "description ||| ARRAY['shoes', 'boots']");
}

#[test]
fn test_simple_and_matches_sugar() {
    let tree = ParadeDB::new(PQ::term("x") & PQ::term("y"));
    let sugar = ParadeDB::terms(["x", "y"]).unwrap();
    assert_eq!(tree.compile("c").unwrap(), sugar.compile("c").unwrap());
}

#[test]
fn test_precedence_scenario() {
    let a = PQ::from(Phrase::new("a"));
    let b = PQ::from(Phrase::new("b"));
    let c = PQ::from(Phrase::new("c"));
    let sql = ParadeDB::new(!(a & (b | c))).compile("t").unwrap();
    assert_eq!(sql, "NOT ((t ### 'a') AND ((t ### 'b') OR (t ### 'c')))");
}

#[test]
fn test_compilation_is_idempotent() {
    let search = ParadeDB::new(
        PQ::from(Fuzzy::new("sheos").prefix(true)) & !PQ::from(Regex::new("sand.*")),
    );
    let first = search.compile("description").unwrap();
    let second = search.compile("description").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_validation_errors_name_the_rule() {
    let mixed = ParadeDB::new(
        PQ::from(Fuzzy::new("a")) & PQ::from(Fuzzy::new("b").operator(MatchOperator::And)),
    );
    assert!(matches!(
        mixed.validate().unwrap_err(),
        ParadeError::MixedFuzzyOperators { .. }
    ));

    let proximity = ParadeDB::new(
        PQ::from(Proximity::new("a b", 1)) | PQ::from(Proximity::new("c d", 2)),
    );
    let err = proximity.validate().unwrap_err();
    assert!(matches!(err, ParadeError::MultipleProximityTerms { count: 2 }));

    let operator = ParadeDB::new(Regex::new("a.*")).operator(MatchOperator::Or);
    assert!(matches!(
        operator.validate().unwrap_err(),
        ParadeError::IncompatibleOperatorCombination(_)
    ));
}

// ── Similarity ──────────────────────────────────────────────────────

#[test]
fn test_more_like_this_ids_scenario() {
    let mut params = Vec::new();
    let sql = MoreLikeThis::ids([1, 2, 3])
        .unwrap()
        .compile("id", &mut params)
        .unwrap();
    assert_eq!(
        sql,
        "(id @@@ pdb.more_like_this(1)) OR (id @@@ pdb.more_like_this(2)) OR (id @@@ pdb.more_like_this(3))"
    );
}

// ── Full queries ────────────────────────────────────────────────────

#[test]
fn test_search_with_score_and_snippet() {
    let (sql, params) = SearchQuerySet::new("products")
        .search("description", ParadeDB::terms(["running", "shoes"]).unwrap())
        .unwrap()
        .filter("rating", Lookup::Gte(Value::from(4)))
        .unwrap()
        .annotate("score", Score::new("id"))
        .annotate("snippet", Snippet::new("description"))
        .order_by(vec![OrderBy::desc("score")])
        .limit(10)
        .sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT *, pdb.score(\"id\") AS \"score\", pdb.snippet(\"description\") AS \"snippet\" \
         FROM \"products\" WHERE (\"description\" &&& ARRAY['running', 'shoes'] AND \"rating\" >= $1) \
         ORDER BY \"score\" DESC LIMIT 10"
    );
    assert_eq!(params, vec![Value::Int(4)]);
}

#[test]
fn test_or_of_searches_across_fields() {
    let q = Q::search("description", ParadeDB::new("shoes"))
        | Q::search("category", ParadeDB::new("Footwear").operator(MatchOperator::Term));
    let (sql, _) = SearchQuerySet::new("products")
        .filter_q(q)
        .unwrap()
        .sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM \"products\" WHERE (\"description\" &&& 'shoes' OR \"category\" === 'Footwear')"
    );
}

#[test]
fn test_invalid_tree_never_reaches_sql() {
    let err = SearchQuerySet::new("products")
        .search("description", ParadeDB::new(PQ::Or(Vec::new())))
        .unwrap_err();
    assert!(err.to_string().contains("at least one expression"));
}
