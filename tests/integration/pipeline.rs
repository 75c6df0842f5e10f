//! The full pipeline: raw feed → document store → build → search.

use std::fs;

use newsdex::binary::POSTINGS_FILE;
use newsdex::build::run_build;
use newsdex::wsj::{extract_feed, DOCUMENT_STORE_FILE};
use newsdex::{ErrorKind, Searcher};

use crate::common::write_store;

const FEED: &str = "\
<DOC>
<DOCNO> WSJ870108-0012 </DOCNO>
<HL> Daminozide Debate Continues </HL>
<TEXT>
Daminozide is a plant growth regulator used on apples.
Critics say the chemical&apos;s risks outweigh its benefits.
</TEXT>
</DOC>
<DOC>
<DOCNO> WSJ870108-0013 </DOCNO>
<HL> Fed Policy Outlook </HL>
<TEXT>
Economic policy affects growth, analysts said.
</TEXT>
</DOC>
";

#[test]
fn test_feed_to_ranked_results() {
    let dir = tempfile::tempdir().unwrap();
    let feed_path = dir.path().join("feed.xml");
    fs::write(&feed_path, FEED).unwrap();

    let store_path = dir.path().join(DOCUMENT_STORE_FILE);
    let count = extract_feed(&feed_path, &store_path).unwrap();
    assert_eq!(count, 2);

    let index_dir = dir.path().join("index");
    let stats = run_build(&store_path, &index_dir).unwrap();
    assert_eq!(stats.num_docs, 2);
    assert!(stats.num_terms > 0);

    let mut searcher = Searcher::open(&index_dir).unwrap();
    let hits = searcher.search("daminozide", None).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].doc_id, "WSJ870108-0012");

    // The expanded apostrophe joins: "chemical&apos;s" indexes as "chemicals".
    let hits = searcher.search("chemicals", None).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].doc_id, "WSJ870108-0012");

    // Headline text is part of the body.
    let hits = searcher.search("outlook", None).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].doc_id, "WSJ870108-0013");
}

#[test]
fn test_duplicate_doc_id_aborts_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let store = write_store(
        dir.path(),
        &[
            r#"{"doc_id":"WSJ001","body":"one"}"#,
            r#"{"doc_id":"WSJ001","body":"two"}"#,
        ],
    );

    let index_dir = dir.path().join("index");
    let err = run_build(&store, &index_dir).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateDocId);
    assert!(err.to_string().contains("WSJ001"));
    // No partial artifacts left behind.
    assert!(!index_dir.join(POSTINGS_FILE).exists());
}

#[test]
fn test_malformed_record_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let store = write_store(
        dir.path(),
        &[
            r#"{"doc_id":"WSJ001","body":"fine"}"#,
            r#"{"doc_id":"WSJ002"}"#,
        ],
    );

    let err = run_build(&store, &dir.path().join("index")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[test]
fn test_non_string_doc_id_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let store = write_store(dir.path(), &[r#"{"doc_id":7,"body":"x"}"#]);

    let err = run_build(&store, &dir.path().join("index")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[test]
fn test_extra_record_fields_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let store = write_store(
        dir.path(),
        &[r#"{"doc_id":"WSJ001","body":"growth","headline":"x","page":7}"#],
    );

    let index_dir = dir.path().join("index");
    let stats = run_build(&store, &index_dir).unwrap();
    assert_eq!(stats.num_docs, 1);
}

#[test]
fn test_empty_body_document_still_counts() {
    let dir = tempfile::tempdir().unwrap();
    let store = write_store(
        dir.path(),
        &[
            r#"{"doc_id":"WSJ001","body":"growth"}"#,
            r#"{"doc_id":"WSJ002","body":"... !!!"}"#,
        ],
    );

    let index_dir = dir.path().join("index");
    let stats = run_build(&store, &index_dir).unwrap();
    assert_eq!(stats.num_docs, 2);

    // df = 1 < N = 2, so the one real term still scores.
    let mut searcher = Searcher::open(&index_dir).unwrap();
    let hits = searcher.search("growth", None).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].doc_id, "WSJ001");
}
