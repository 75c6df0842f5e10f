// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index builder: document stream in, four artifacts out.
//!
//! The builder is single-pass. Documents are numbered serially as they
//! arrive - that one serial point defines the positional doc_id table and
//! keeps every postings buffer sorted for free, because appends happen in
//! ascending document order. Normalizing and counting, the expensive part,
//! fans out over a rayon pool in fixed-size batches; results merge back in
//! document order, so the accumulator ends up byte-for-byte identical to a
//! serial run.
//!
//! At end of stream the terms are sorted and each postings list is encoded
//! and appended to the blob, which is what makes the dictionary byte ranges
//! tile the file exactly. Two builds over the same stream produce identical
//! artifacts (the wall-clock field in stats.json aside).
//!
//! Failure anywhere aborts the build and removes whatever was written -
//! partial artifact sets must never survive, and the load path rejects any
//! that do.

pub mod document;

pub use document::{count_records, DocumentRecord, DocumentStoreReader};

use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::binary::{
    encode_postings, write_dictionary, write_doc_ids, write_stats, DictEntry, IndexStats,
    Posting, DICTIONARY_FILE, DOC_IDS_FILE, MAX_DOC_COUNT, MAX_DOC_ID_LEN, MAX_TERM_LEN,
    POSTINGS_FILE, STATS_FILE,
};
use crate::error::{Error, ErrorKind, Result};
use crate::normalize::normalize;

/// Documents per parallel normalize-and-count batch.
const BATCH_SIZE: usize = 512;

/// In-memory accumulator for one build.
pub struct IndexBuilder {
    postings: HashMap<String, Vec<Posting>>,
    doc_ids: Vec<String>,
    seen: HashSet<String>,
    num_postings: u64,
    started: Instant,
}

impl IndexBuilder {
    pub fn new() -> Self {
        IndexBuilder {
            postings: HashMap::new(),
            doc_ids: Vec::new(),
            seen: HashSet::new(),
            num_postings: 0,
            started: Instant::now(),
        }
    }

    pub fn num_docs(&self) -> u64 {
        self.doc_ids.len() as u64
    }

    /// Ingest one document serially: assign its index, normalize, count,
    /// and append. The batched path in [`run_build`] produces byte-identical
    /// state through the same internals.
    pub fn add_document(&mut self, doc_id: String, body: &str) -> Result<()> {
        let doc_index = self.assign_doc(doc_id)?;
        self.insert_counts(doc_index, term_counts(body));
        Ok(())
    }

    /// The serial point: hand out the next doc_index.
    ///
    /// A doc_id seen before fails the whole build - the stream contract is
    /// one record per document.
    fn assign_doc(&mut self, doc_id: String) -> Result<u64> {
        if doc_id.len() > MAX_DOC_ID_LEN {
            return Err(Error::malformed(format!(
                "doc_id of {} bytes exceeds the {} byte limit",
                doc_id.len(),
                MAX_DOC_ID_LEN
            )));
        }
        if !self.seen.insert(doc_id.clone()) {
            return Err(Error::new(
                ErrorKind::DuplicateDocId,
                format!("{:?} appeared twice in the document stream", doc_id),
            ));
        }
        if self.doc_ids.len() as u64 >= MAX_DOC_COUNT {
            return Err(Error::malformed(format!(
                "document stream exceeds {} documents",
                MAX_DOC_COUNT
            )));
        }
        let doc_index = self.doc_ids.len() as u64;
        self.doc_ids.push(doc_id);
        Ok(doc_index)
    }

    /// Merge one document's term counts. Must be called in ascending
    /// doc_index order; each postings buffer then stays sorted by
    /// construction.
    fn insert_counts(&mut self, doc_index: u64, counts: HashMap<String, u32>) {
        for (term, tf) in counts {
            self.postings
                .entry(term)
                .or_default()
                .push(Posting { doc_index, tf });
            self.num_postings += 1;
        }
    }

    /// Normalize and count a batch on the rayon pool, then merge in
    /// document order. `collect` preserves input order, so the merge is
    /// deterministic regardless of which worker finished first.
    fn flush_batch(&mut self, batch: &mut Vec<(u64, String)>) {
        if batch.is_empty() {
            return;
        }
        let docs = std::mem::take(batch);
        let counted: Vec<(u64, HashMap<String, u32>)> = docs
            .into_par_iter()
            .map(|(doc_index, body)| (doc_index, term_counts(&body)))
            .collect();
        for (doc_index, counts) in counted {
            self.insert_counts(doc_index, counts);
        }
    }

    /// Emit the four artifacts under `out_dir`.
    ///
    /// Terms go out in ascending byte order; each encoded list is appended
    /// to the blob and its `(offset, len, df)` recorded. The statistics
    /// record is written last.
    pub fn finish(self, out_dir: &Path) -> Result<IndexStats> {
        let num_docs = self.doc_ids.len() as u64;

        let mut terms: Vec<(String, Vec<Posting>)> = self.postings.into_iter().collect();
        terms.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        fs::create_dir_all(out_dir)?;
        let postings_file = File::create(out_dir.join(POSTINGS_FILE))?;
        let mut writer = BufWriter::new(postings_file);

        let mut dictionary: Vec<(String, DictEntry)> = Vec::with_capacity(terms.len());
        let mut offset = 0u64;
        let mut buf = Vec::new();
        for (term, list) in terms {
            if term.len() > MAX_TERM_LEN {
                return Err(Error::malformed(format!(
                    "normalized term of {} bytes exceeds the {} byte limit",
                    term.len(),
                    MAX_TERM_LEN
                )));
            }
            buf.clear();
            encode_postings(&list, &mut buf);
            writer.write_all(&buf)?;
            dictionary.push((
                term,
                DictEntry {
                    offset,
                    len: buf.len() as u32,
                    doc_freq: list.len() as u32,
                },
            ));
            offset += buf.len() as u64;
        }
        writer.flush()?;

        write_dictionary(&out_dir.join(DICTIONARY_FILE), &dictionary)?;
        write_doc_ids(&out_dir.join(DOC_IDS_FILE), &self.doc_ids)?;

        let stats = IndexStats {
            num_docs,
            num_terms: dictionary.len() as u64,
            num_postings: self.num_postings,
            build_ms: self.started.elapsed().as_millis() as u64,
        };
        write_stats(&out_dir.join(STATS_FILE), &stats)?;

        Ok(stats)
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-document term frequencies.
fn term_counts(body: &str) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for term in normalize(body) {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

/// Build an index from a document store, with progress reporting.
///
/// This is the CLI entry point: it streams records, batches the
/// normalize-and-count stage across the rayon pool, and cleans up partial
/// artifacts if anything fails.
pub fn run_build(store_path: &Path, out_dir: &Path) -> Result<IndexStats> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:<10} {pos} {msg}").unwrap(),
    );
    pb.set_prefix("Indexing");
    pb.set_message("documents...");

    let result = build_streaming(store_path, out_dir, &pb);
    if result.is_err() {
        pb.abandon_with_message("failed");
        remove_partial(out_dir);
    } else {
        pb.finish_with_message("done");
    }
    result
}

fn build_streaming(store_path: &Path, out_dir: &Path, pb: &ProgressBar) -> Result<IndexStats> {
    let mut builder = IndexBuilder::new();
    let mut batch: Vec<(u64, String)> = Vec::with_capacity(BATCH_SIZE);

    for record in DocumentStoreReader::open(store_path)? {
        let record = record?;
        let doc_index = builder.assign_doc(record.doc_id)?;
        batch.push((doc_index, record.body));
        if batch.len() == BATCH_SIZE {
            builder.flush_batch(&mut batch);
            pb.set_position(builder.num_docs());
        }
    }
    builder.flush_batch(&mut batch);
    pb.set_position(builder.num_docs());

    builder.finish(out_dir)
}

/// Best-effort removal of a failed build's outputs.
fn remove_partial(out_dir: &Path) {
    for name in [POSTINGS_FILE, DICTIONARY_FILE, DOC_IDS_FILE, STATS_FILE] {
        let _ = fs::remove_file(out_dir.join(name));
    }
}
