// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query processor: TF-IDF ranking over the on-disk index.
//!
//! A [`Searcher`] loads the dictionary, the doc_id table, and the
//! statistics once, validates them against each other, and then serves
//! queries with one contiguous read per query term. Queries are bags of
//! terms with OR semantics - no phrases, no operators - and repeated terms
//! in a query carry no extra weight.
//!
//! Scoring is the classic log-weighted TF-IDF:
//!
//! ```text
//! score(doc) = Σ over query terms t present in doc:
//!              (1 + log₁₀ tf) · log₁₀(N / df_t)
//! ```
//!
//! A term in every document has zero IDF and is skipped outright; a term in
//! no document simply contributes nothing. Results order by score
//! descending, doc_id ascending - fully deterministic.
//!
//! One instance serves one query at a time (`&mut self`, one seek cursor).
//! Concurrent callers each open their own `Searcher`; the artifacts are
//! immutable so any number of instances can share a directory.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use crate::binary::{
    decode_postings, load_artifacts, DictEntry, IndexStats, Posting, POSTINGS_FILE,
};
use crate::error::{Error, Result};
use crate::normalize::normalize;

/// One ranked result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub doc_id: String,
    pub score: f64,
}

/// A loaded, validated index ready to serve queries.
#[derive(Debug)]
pub struct Searcher {
    dictionary: HashMap<String, DictEntry>,
    doc_ids: Vec<String>,
    stats: IndexStats,
    postings: File,
}

impl Searcher {
    /// Load and validate the artifact set under `index_dir`.
    ///
    /// Fails with `CorruptIndex` when any artifact is missing or the set is
    /// internally inconsistent; the caller's only remedy is a rebuild.
    pub fn open(index_dir: &Path) -> Result<Self> {
        let artifacts = load_artifacts(index_dir)?;
        let postings_path = index_dir.join(POSTINGS_FILE);
        let postings = match File::open(&postings_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::corrupt(format!(
                    "missing artifact {}",
                    postings_path.display()
                )))
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Searcher {
            dictionary: artifacts.dictionary.into_iter().collect(),
            doc_ids: artifacts.doc_ids,
            stats: artifacts.stats,
            postings,
        })
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Resolve a positional document index back to its doc_id.
    pub fn doc_id(&self, doc_index: u64) -> Option<&str> {
        self.doc_ids.get(doc_index as usize).map(String::as_str)
    }

    /// Rank documents for `query`, best first.
    ///
    /// Unknown terms and an empty normalized query are not errors - they
    /// yield smaller (possibly empty) results. `limit` truncates after
    /// ranking; `None` returns everything with a positive score.
    pub fn search(&mut self, query: &str, limit: Option<usize>) -> Result<Vec<SearchHit>> {
        let mut terms = normalize(query);
        terms.sort_unstable();
        terms.dedup();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let num_docs = self.stats.num_docs;
        let mut scores: HashMap<u64, f64> = HashMap::new();
        for term in &terms {
            let entry = match self.dictionary.get(term) {
                Some(entry) => *entry,
                None => continue,
            };
            // df = N makes the IDF factor zero; skip the read entirely.
            if entry.doc_freq as u64 >= num_docs {
                continue;
            }
            for posting in self.read_postings(entry)? {
                *scores.entry(posting.doc_index).or_insert(0.0) +=
                    tf_idf_weight(posting.tf, entry.doc_freq, num_docs);
            }
        }

        let mut hits = Vec::with_capacity(scores.len());
        for (doc_index, score) in scores {
            let doc_id = self.doc_ids.get(doc_index as usize).ok_or_else(|| {
                Error::corrupt(format!(
                    "posting references doc_index {} beyond table of {}",
                    doc_index,
                    self.doc_ids.len()
                ))
            })?;
            hits.push(SearchHit {
                doc_id: doc_id.clone(),
                score,
            });
        }

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        if let Some(limit) = limit {
            hits.truncate(limit);
        }
        Ok(hits)
    }

    /// One contiguous read of a term's postings list.
    fn read_postings(&mut self, entry: DictEntry) -> Result<Vec<Posting>> {
        self.postings.seek(SeekFrom::Start(entry.offset))?;
        let mut buf = vec![0u8; entry.len as usize];
        self.postings.read_exact(&mut buf)?;
        decode_postings(&buf, entry.doc_freq as usize)
    }
}

/// The per-posting score contribution.
///
/// `tf >= 1` keeps the left factor at least 1; `df < num_docs` keeps the
/// IDF strictly positive, so every contribution is positive and finite.
pub fn tf_idf_weight(tf: u32, doc_freq: u32, num_docs: u64) -> f64 {
    let tf_factor = 1.0 + (tf as f64).log10();
    let idf = (num_docs as f64 / doc_freq as f64).log10();
    tf_factor * idf
}
