// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Postings list codec: delta + VByte.
//!
//! Postings are the heart of an inverted index: for each term, which
//! documents contain it and how often. Document indices within a list are
//! sorted, so we store gaps instead of absolute values - if documents 100,
//! 102, 105, 110 contain a term, the index stream is [100, 2, 3, 5]. Small
//! gaps encode to one byte each, which is where the compression comes from.
//!
//! The serialized form interleaves the term frequency after each gap:
//! `[vbyte(delta₁), vbyte(tf₁), vbyte(delta₂), vbyte(tf₂), …]`. The list
//! length is not part of the stream; the dictionary entry carries the
//! document frequency, and the decoder demands exactly that many pairs in
//! exactly the byte range it was handed.
//!
//! # References
//!
//! - Zobel & Moffat (2006): "Inverted Files for Text Search Engines",
//!   ACM Computing Surveys - the d-gap representation.

use super::encoding::{decode_varint, encode_varint};
use crate::error::{Error, Result};

/// One `(document, term frequency)` occurrence within a postings list.
///
/// `doc_index` is the ordinal the builder assigned in ingestion order; the
/// string doc_id lives in the positional table, never in postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc_index: u64,
    pub tf: u32,
}

/// Append the encoded form of `postings` to `buf`.
///
/// Callers must pass a list sorted strictly ascending by `doc_index` with
/// every `tf >= 1`; the builder produces nothing else. Debug builds check.
pub fn encode_postings(postings: &[Posting], buf: &mut Vec<u8>) {
    let mut prev = 0u64;
    for (i, posting) in postings.iter().enumerate() {
        debug_assert!(i == 0 || posting.doc_index > prev, "unsorted postings");
        debug_assert!(posting.tf >= 1, "zero term frequency");
        encode_varint(posting.doc_index - prev, buf);
        encode_varint(posting.tf as u64, buf);
        prev = posting.doc_index;
    }
}

/// Decode exactly `doc_freq` postings from `bytes`.
///
/// The byte range comes straight out of a dictionary entry, so anything
/// irregular is corruption: trailing bytes after the last pair, a document
/// index that fails to increase, a zero term frequency, or truncation.
pub fn decode_postings(bytes: &[u8], doc_freq: usize) -> Result<Vec<Posting>> {
    let mut postings = Vec::with_capacity(doc_freq);
    let mut pos = 0;
    let mut prev = 0u64;

    for i in 0..doc_freq {
        let (delta, consumed) = decode_varint(&bytes[pos..])?;
        pos += consumed;
        let (tf, consumed) = decode_varint(&bytes[pos..])?;
        pos += consumed;

        if i > 0 && delta == 0 {
            return Err(Error::corrupt(format!(
                "postings not strictly increasing at entry {}",
                i
            )));
        }
        if tf == 0 {
            return Err(Error::corrupt(format!("zero term frequency at entry {}", i)));
        }
        if tf > u32::MAX as u64 {
            return Err(Error::corrupt(format!("term frequency overflow at entry {}", i)));
        }

        let doc_index = prev.checked_add(delta).ok_or_else(|| {
            Error::corrupt(format!("doc_index overflow at entry {}", i))
        })?;
        postings.push(Posting {
            doc_index,
            tf: tf as u32,
        });
        prev = doc_index;
    }

    if pos != bytes.len() {
        return Err(Error::corrupt(format!(
            "postings list has {} trailing bytes",
            bytes.len() - pos
        )));
    }

    Ok(postings)
}
