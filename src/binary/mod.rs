// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! On-disk index format.
//!
//! A build produces four artifacts in one directory, immutable once written:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │ postings.bin    concatenated encoded postings lists       │
//! │                 (no header, no padding - dictionary byte  │
//! │                 ranges tile the file exactly)             │
//! ├───────────────────────────────────────────────────────────┤
//! │ dictionary.bin  ENVELOPE[ vbyte(entry_count)              │
//! │                   then per term, ascending byte order:    │
//! │                   vbyte(term_len) term_bytes              │
//! │                   vbyte(offset) vbyte(len) vbyte(df) ]    │
//! ├───────────────────────────────────────────────────────────┤
//! │ doc_ids.bin     ENVELOPE[ vbyte(doc_count)                │
//! │                   then vbyte(len) doc_id_bytes            │
//! │                   in doc_index order ]                    │
//! ├───────────────────────────────────────────────────────────┤
//! │ stats.json      { "N", "num_terms", "num_postings",       │
//! │                   "build_ms" }                            │
//! └───────────────────────────────────────────────────────────┘
//!
//! ENVELOPE = 8-byte header (magic "NDEX", version, 3 reserved bytes)
//!          + payload
//!          + 8-byte footer (CRC32 of header+payload, magic "XEDN")
//! ```
//!
//! The postings blob itself carries no framing so that dictionary offsets
//! are plain file offsets and each lookup is one contiguous read. Integrity
//! comes from the enveloped artifacts plus cross-checks at load time: the
//! doc table length must equal `N`, the dictionary entry count must equal
//! `num_terms`, document frequencies must sum to `num_postings`, and the
//! dictionary byte ranges must tile `postings.bin` end to end. Anything
//! inconsistent - including a missing file - fails the load as corrupt;
//! the only fix is a rebuild.
//!
//! # Security Considerations
//!
//! Artifacts are parsed defensively even though they are normally
//! self-produced: all counts are bounded, string lengths are capped, the
//! varint decoder limits iteration, and the CRC32 footer catches truncation.

mod encoding;
mod postings;

pub use encoding::{decode_varint, encode_varint, MAX_VARINT_BYTES};
pub use postings::{decode_postings, encode_postings, Posting};

use std::fs;
use std::io;
use std::path::Path;

use crc32fast::Hasher as Crc32Hasher;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// CONSTANTS
// ============================================================================

pub const POSTINGS_FILE: &str = "postings.bin";
pub const DICTIONARY_FILE: &str = "dictionary.bin";
pub const DOC_IDS_FILE: &str = "doc_ids.bin";
pub const STATS_FILE: &str = "stats.json";

/// Magic bytes: "NDEX" (envelope header)
pub const MAGIC: [u8; 4] = *b"NDEX";

/// Footer magic: "XEDN" (reversed, marks a complete file)
pub const FOOTER_MAGIC: [u8; 4] = *b"XEDN";

/// Current format version
pub const VERSION: u8 = 1;

const ENVELOPE_HEADER_SIZE: usize = 8; // magic + version + 3 reserved
const ENVELOPE_FOOTER_SIZE: usize = 8; // crc32 + footer magic

// ============================================================================
// SECURITY LIMITS (prevent resource exhaustion from damaged artifacts)
// ============================================================================

/// Maximum number of documents
pub const MAX_DOC_COUNT: u64 = 10_000_000;

/// Maximum number of distinct terms
pub const MAX_TERM_COUNT: u64 = 50_000_000;

/// Maximum term length in bytes
pub const MAX_TERM_LEN: usize = 512;

/// Maximum doc_id length in bytes
pub const MAX_DOC_ID_LEN: usize = 256;

// ============================================================================
// DICTIONARY AND STATISTICS TYPES
// ============================================================================

/// Where one term's postings list lives in the blob, and how long it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictEntry {
    /// Byte offset of the encoded list in `postings.bin`.
    pub offset: u64,
    /// Encoded byte length.
    pub len: u32,
    /// Document frequency - the number of postings in the list.
    pub doc_freq: u32,
}

/// Corpus-level statistics persisted to `stats.json`.
///
/// `build_ms` is observability only; every other field participates in
/// load-time consistency validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Total number of indexed documents.
    #[serde(rename = "N")]
    pub num_docs: u64,
    /// Number of distinct terms.
    pub num_terms: u64,
    /// Total number of (term, document) pairs.
    pub num_postings: u64,
    /// Wall-clock build duration in milliseconds.
    pub build_ms: u64,
}

// ============================================================================
// ENVELOPE
// ============================================================================

fn crc32(data: &[u8]) -> u32 {
    let mut hasher = Crc32Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Write `payload` to `path` wrapped in the standard envelope.
pub fn write_envelope(path: &Path, payload: &[u8]) -> Result<()> {
    let mut bytes =
        Vec::with_capacity(ENVELOPE_HEADER_SIZE + payload.len() + ENVELOPE_FOOTER_SIZE);
    bytes.extend_from_slice(&MAGIC);
    bytes.push(VERSION);
    bytes.extend_from_slice(&[0u8; 3]);
    bytes.extend_from_slice(payload);
    let crc = crc32(&bytes);
    bytes.extend_from_slice(&crc.to_le_bytes());
    bytes.extend_from_slice(&FOOTER_MAGIC);
    fs::write(path, &bytes)?;
    Ok(())
}

/// Read an enveloped artifact, returning the payload.
///
/// A missing file is a corrupt index (the artifact set is all-or-nothing);
/// other read failures stay I/O errors.
pub fn read_envelope(path: &Path) -> Result<Vec<u8>> {
    let bytes = read_artifact(path)?;

    if bytes.len() < ENVELOPE_HEADER_SIZE + ENVELOPE_FOOTER_SIZE {
        return Err(Error::corrupt(format!(
            "{}: too short for envelope ({} bytes)",
            path.display(),
            bytes.len()
        )));
    }
    if bytes[..4] != MAGIC {
        return Err(Error::corrupt(format!(
            "{}: bad magic (expected NDEX)",
            path.display()
        )));
    }
    if bytes[4] != VERSION {
        return Err(Error::corrupt(format!(
            "{}: unsupported format version {}",
            path.display(),
            bytes[4]
        )));
    }

    let footer_start = bytes.len() - ENVELOPE_FOOTER_SIZE;
    if bytes[footer_start + 4..] != FOOTER_MAGIC {
        return Err(Error::corrupt(format!(
            "{}: bad footer magic (truncated file?)",
            path.display()
        )));
    }
    let stored_crc = u32::from_le_bytes([
        bytes[footer_start],
        bytes[footer_start + 1],
        bytes[footer_start + 2],
        bytes[footer_start + 3],
    ]);
    let computed_crc = crc32(&bytes[..footer_start]);
    if stored_crc != computed_crc {
        return Err(Error::corrupt(format!(
            "{}: CRC32 mismatch (stored {:08x}, computed {:08x})",
            path.display(),
            stored_crc,
            computed_crc
        )));
    }

    Ok(bytes[ENVELOPE_HEADER_SIZE..footer_start].to_vec())
}

/// Read a raw artifact file, mapping a missing file to `CorruptIndex`.
fn read_artifact(path: &Path) -> Result<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::corrupt(format!(
            "missing artifact {}",
            path.display()
        ))),
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// DICTIONARY PERSISTENCE
// ============================================================================

/// Persist the dictionary. `entries` must be sorted ascending by term bytes
/// (the builder emits them that way).
pub fn write_dictionary(path: &Path, entries: &[(String, DictEntry)]) -> Result<()> {
    let mut payload = Vec::new();
    encode_varint(entries.len() as u64, &mut payload);
    for (term, entry) in entries {
        encode_varint(term.len() as u64, &mut payload);
        payload.extend_from_slice(term.as_bytes());
        encode_varint(entry.offset, &mut payload);
        encode_varint(entry.len as u64, &mut payload);
        encode_varint(entry.doc_freq as u64, &mut payload);
    }
    write_envelope(path, &payload)
}

/// Load the dictionary in stored (ascending) order.
///
/// Validates term ordering, UTF-8, field ranges, and exact payload
/// consumption; anything off is corruption.
pub fn read_dictionary(path: &Path) -> Result<Vec<(String, DictEntry)>> {
    let payload = read_envelope(path)?;
    let (count, mut pos) = decode_varint(&payload)?;
    if count > MAX_TERM_COUNT {
        return Err(Error::corrupt(format!("dictionary claims {} terms", count)));
    }

    let mut entries: Vec<(String, DictEntry)> = Vec::with_capacity(count as usize);
    for i in 0..count {
        let (term_len, consumed) = decode_varint(&payload[pos..])?;
        pos += consumed;
        if term_len == 0 || term_len as usize > MAX_TERM_LEN {
            return Err(Error::corrupt(format!(
                "dictionary entry {}: term length {}",
                i, term_len
            )));
        }
        let end = pos + term_len as usize;
        if end > payload.len() {
            return Err(Error::corrupt(format!("dictionary entry {}: truncated term", i)));
        }
        let term = std::str::from_utf8(&payload[pos..end])
            .map_err(|_| Error::corrupt(format!("dictionary entry {}: invalid UTF-8", i)))?
            .to_string();
        pos = end;

        let (offset, consumed) = decode_varint(&payload[pos..])?;
        pos += consumed;
        let (len, consumed) = decode_varint(&payload[pos..])?;
        pos += consumed;
        let (doc_freq, consumed) = decode_varint(&payload[pos..])?;
        pos += consumed;

        if len > u32::MAX as u64 || doc_freq > u32::MAX as u64 || doc_freq == 0 {
            return Err(Error::corrupt(format!(
                "dictionary entry {} ({}): len {} df {}",
                i, term, len, doc_freq
            )));
        }
        if let Some((prev, _)) = entries.last() {
            if term.as_bytes() <= prev.as_bytes() {
                return Err(Error::corrupt(format!(
                    "dictionary terms out of order at entry {} ({:?} after {:?})",
                    i, term, prev
                )));
            }
        }

        entries.push((
            term,
            DictEntry {
                offset,
                len: len as u32,
                doc_freq: doc_freq as u32,
            },
        ));
    }

    if pos != payload.len() {
        return Err(Error::corrupt("dictionary has trailing bytes"));
    }
    Ok(entries)
}

// ============================================================================
// DOC_ID TABLE PERSISTENCE
// ============================================================================

/// Persist the positional doc_id table.
pub fn write_doc_ids(path: &Path, doc_ids: &[String]) -> Result<()> {
    let mut payload = Vec::new();
    encode_varint(doc_ids.len() as u64, &mut payload);
    for doc_id in doc_ids {
        encode_varint(doc_id.len() as u64, &mut payload);
        payload.extend_from_slice(doc_id.as_bytes());
    }
    write_envelope(path, &payload)
}

/// Load the doc_id table; position in the vector equals `doc_index`.
pub fn read_doc_ids(path: &Path) -> Result<Vec<String>> {
    let payload = read_envelope(path)?;
    let (count, mut pos) = decode_varint(&payload)?;
    if count > MAX_DOC_COUNT {
        return Err(Error::corrupt(format!("doc table claims {} documents", count)));
    }

    let mut doc_ids = Vec::with_capacity(count as usize);
    for i in 0..count {
        let (len, consumed) = decode_varint(&payload[pos..])?;
        pos += consumed;
        if len == 0 || len as usize > MAX_DOC_ID_LEN {
            return Err(Error::corrupt(format!("doc table entry {}: length {}", i, len)));
        }
        let end = pos + len as usize;
        if end > payload.len() {
            return Err(Error::corrupt(format!("doc table entry {}: truncated", i)));
        }
        let doc_id = std::str::from_utf8(&payload[pos..end])
            .map_err(|_| Error::corrupt(format!("doc table entry {}: invalid UTF-8", i)))?
            .to_string();
        pos = end;
        doc_ids.push(doc_id);
    }

    if pos != payload.len() {
        return Err(Error::corrupt("doc table has trailing bytes"));
    }
    Ok(doc_ids)
}

// ============================================================================
// STATISTICS PERSISTENCE
// ============================================================================

pub fn write_stats(path: &Path, stats: &IndexStats) -> Result<()> {
    let json = serde_json::to_string(stats)
        .map_err(|e| Error::new(crate::error::ErrorKind::Io, e.to_string()))?;
    fs::write(path, json)?;
    Ok(())
}

pub fn read_stats(path: &Path) -> Result<IndexStats> {
    let bytes = read_artifact(path)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::corrupt(format!("{}: {}", path.display(), e)))
}

// ============================================================================
// LOAD-TIME VALIDATION
// ============================================================================

/// Everything a search session needs besides the postings file handle.
#[derive(Debug)]
pub struct IndexArtifacts {
    /// Dictionary entries in ascending term order.
    pub dictionary: Vec<(String, DictEntry)>,
    /// Positional doc_id table.
    pub doc_ids: Vec<String>,
    pub stats: IndexStats,
}

/// Load and cross-validate the artifact set under `dir`.
///
/// All four files must exist and agree: table lengths against the stats
/// record, document frequencies against the pair count, and the dictionary
/// byte ranges against the size of `postings.bin` - the ranges must start at
/// zero and tile the blob with no gap or overlap.
pub fn load_artifacts(dir: &Path) -> Result<IndexArtifacts> {
    let stats = read_stats(&dir.join(STATS_FILE))?;
    let doc_ids = read_doc_ids(&dir.join(DOC_IDS_FILE))?;
    let dictionary = read_dictionary(&dir.join(DICTIONARY_FILE))?;

    let postings_path = dir.join(POSTINGS_FILE);
    let postings_size = match fs::metadata(&postings_path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::corrupt(format!(
                "missing artifact {}",
                postings_path.display()
            )))
        }
        Err(e) => return Err(e.into()),
    };

    if doc_ids.len() as u64 != stats.num_docs {
        return Err(Error::corrupt(format!(
            "doc table holds {} entries but stats claim N = {}",
            doc_ids.len(),
            stats.num_docs
        )));
    }
    if dictionary.len() as u64 != stats.num_terms {
        return Err(Error::corrupt(format!(
            "dictionary holds {} terms but stats claim {}",
            dictionary.len(),
            stats.num_terms
        )));
    }

    let mut total_postings = 0u64;
    let mut expected_offset = 0u64;
    for (term, entry) in &dictionary {
        if entry.offset != expected_offset {
            return Err(Error::corrupt(format!(
                "postings range for {:?} starts at {} (expected {})",
                term, entry.offset, expected_offset
            )));
        }
        expected_offset += entry.len as u64;
        total_postings += entry.doc_freq as u64;
    }
    if expected_offset != postings_size {
        return Err(Error::corrupt(format!(
            "dictionary ranges cover {} bytes but postings blob is {}",
            expected_offset, postings_size
        )));
    }
    if total_postings != stats.num_postings {
        return Err(Error::corrupt(format!(
            "document frequencies sum to {} but stats claim {} postings",
            total_postings, stats.num_postings
        )));
    }

    Ok(IndexArtifacts {
        dictionary,
        doc_ids,
        stats,
    })
}
