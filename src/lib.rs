// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! TF-IDF full-text search over newswire archives.
//!
//! Three subsystems compose in a pipeline around a shared codec:
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ normalize.rs │────▶│   build/     │────▶│   search/    │
//! │ (raw text →  │     │ (stream →    │     │ (query →     │
//! │  term seq)   │     │  artifacts)  │     │  ranked hits)│
//! └──────────────┘     └──────────────┘     └──────────────┘
//!         │                   │                    │
//!         ▼                   ▼                    ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                       binary/                           │
//! │   (VByte codec, postings lists, artifact envelopes,     │
//! │    load-time consistency validation)                    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The builder consumes a line-delimited JSON document stream (produced
//! from the raw feed by [`wsj`]) and emits four immutable artifacts: a
//! postings blob, a dictionary, a positional doc_id table, and a statistics
//! record. The searcher loads them once, validates them against each other,
//! and ranks documents by `(1 + log₁₀ tf) · log₁₀(N/df)` with deterministic
//! `(-score, doc_id)` ordering.
//!
//! One normalizer serves both sides, so an indexed term and a query term
//! can never disagree about their canonical form.
//!
//! # Usage
//!
//! ```ignore
//! use newsdex::{IndexBuilder, Searcher};
//!
//! let mut builder = IndexBuilder::new();
//! builder.add_document("WSJ001".into(), "Daminozide is a plant growth regulator.")?;
//! builder.finish(Path::new("./index"))?;
//!
//! let mut searcher = Searcher::open(Path::new("./index"))?;
//! let hits = searcher.search("daminozide", Some(10))?;
//! ```

pub mod binary;
pub mod build;
pub mod error;
pub mod normalize;
pub mod search;
pub mod wsj;

// Re-exports for the public API
pub use binary::{DictEntry, IndexStats, Posting};
pub use build::{run_build, IndexBuilder};
pub use error::{Error, ErrorKind, Result};
pub use normalize::normalize;
pub use search::{tf_idf_weight, SearchHit, Searcher};
