//! End-to-end ranking scenarios over the reference corpus.
//!
//! N = 4 throughout; expected scores follow straight from
//! `(1 + log₁₀ tf) · log₁₀(N / df)`.

use crate::common::{build_index, doc_ids, reference_corpus};

#[test]
fn test_equal_scores_tie_break_by_doc_id() {
    let (_dir, mut searcher) = build_index(&reference_corpus());
    // "daminozide" appears once in WSJ001 and once in WSJ004 (df = 2):
    // identical scores, alphabetical order decides.
    let hits = searcher.search("Daminozide", None).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].doc_id, "WSJ001");
    assert_eq!(hits[1].doc_id, "WSJ004");
    assert!((hits[0].score - hits[1].score).abs() < 1e-12);
}

#[test]
fn test_term_frequency_ranks_repetition_higher() {
    let (_dir, mut searcher) = build_index(&reference_corpus());
    let hits = searcher.search("policy", None).unwrap();
    assert_eq!(hits.len(), 2);
    // WSJ003: tf=3, df=2 → (1 + log10 3) · log10 2 ≈ 0.4447
    assert_eq!(hits[0].doc_id, "WSJ003");
    assert!((hits[0].score - 0.4447).abs() < 1e-4);
    // WSJ002: tf=1 → log10 2 ≈ 0.3010
    assert_eq!(hits[1].doc_id, "WSJ002");
    assert!((hits[1].score - 0.3010).abs() < 1e-4);
}

#[test]
fn test_matching_both_terms_wins() {
    let (_dir, mut searcher) = build_index(&reference_corpus());
    let hits = searcher.search("economic policy", None).unwrap();
    assert_eq!(hits[0].doc_id, "WSJ002");
    // log10(4/1) + log10(4/2) ≈ 0.9031
    assert!((hits[0].score - 0.9031).abs() < 1e-4);
    assert_eq!(hits[1].doc_id, "WSJ003");
}

#[test]
fn test_rare_term_dominates_common_term() {
    let (_dir, mut searcher) = build_index(&reference_corpus());
    // "the" only occurs in WSJ004; "growth" occurs in three documents.
    let hits = searcher.search("the growth", None).unwrap();
    assert_eq!(hits[0].doc_id, "WSJ004");
    assert!(hits[0].score > hits[1].score);
}

#[test]
fn test_common_term_ties_break_alphabetically() {
    let (_dir, mut searcher) = build_index(&reference_corpus());
    // "growth" has tf=1 in all three matches: pure doc_id ordering.
    assert_eq!(doc_ids(&mut searcher, "growth"), ["WSJ001", "WSJ002", "WSJ004"]);
}

#[test]
fn test_unknown_term_is_empty_not_error() {
    let (_dir, mut searcher) = build_index(&reference_corpus());
    assert!(searcher.search("quantum", None).unwrap().is_empty());
}

#[test]
fn test_empty_query_is_empty_not_error() {
    let (_dir, mut searcher) = build_index(&reference_corpus());
    assert!(searcher.search("", None).unwrap().is_empty());
    assert!(searcher.search("   \t  ", None).unwrap().is_empty());
    assert!(searcher.search("!!! ...", None).unwrap().is_empty());
}

#[test]
fn test_term_in_every_document_scores_zero() {
    let (_dir, mut searcher) = build_index(&[
        ("WSJ010", "apple pie recipe"),
        ("WSJ011", "apple tart recipe"),
    ]);
    // df = N for "apple" and "recipe": no positive score, empty result.
    assert!(searcher.search("apple", None).unwrap().is_empty());
    assert!(searcher.search("apple recipe", None).unwrap().is_empty());
    // "pie" still distinguishes.
    assert_eq!(doc_ids(&mut searcher, "pie"), ["WSJ010"]);
    // The universal term adds nothing on top of the discriminating one.
    let combined = searcher.search("apple pie", None).unwrap();
    let alone = searcher.search("pie", None).unwrap();
    assert_eq!(combined, alone);
}

#[test]
fn test_query_term_multiplicity_ignored() {
    let (_dir, mut searcher) = build_index(&reference_corpus());
    let once = searcher.search("policy", None).unwrap();
    let thrice = searcher.search("policy policy policy", None).unwrap();
    assert_eq!(once, thrice);
}

#[test]
fn test_limit_truncates_after_ranking() {
    let (_dir, mut searcher) = build_index(&reference_corpus());
    let hits = searcher.search("growth", Some(2)).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].doc_id, "WSJ001");
    assert_eq!(hits[1].doc_id, "WSJ002");
}

#[test]
fn test_query_normalization_matches_index_side() {
    let (_dir, mut searcher) = build_index(&reference_corpus());
    // Case, punctuation, entity references: all collapse to the same term.
    assert_eq!(doc_ids(&mut searcher, "DAMINOZIDE!"), ["WSJ001", "WSJ004"]);
    assert_eq!(doc_ids(&mut searcher, "da-minozide"), ["WSJ001", "WSJ004"]);
}

#[test]
fn test_document_searches_for_itself() {
    let corpus = reference_corpus();
    let (_dir, mut searcher) = build_index(&corpus);
    for (doc_id, body) in &corpus {
        let hits = searcher.search(body, None).unwrap();
        assert!(
            hits.iter().any(|hit| hit.doc_id == *doc_id && hit.score > 0.0),
            "{} did not retrieve itself",
            doc_id
        );
    }
}

#[test]
fn test_scores_positive_finite_and_sorted() {
    let (_dir, mut searcher) = build_index(&reference_corpus());
    for query in ["growth", "economic policy", "the growth of daminozide"] {
        let hits = searcher.search(query, None).unwrap();
        assert!(!hits.is_empty());
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for hit in &hits {
            assert!(hit.score > 0.0 && hit.score.is_finite());
        }
    }
}
