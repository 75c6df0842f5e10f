// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Document stream records.
//!
//! The upstream parser hands the builder a line-delimited JSON stream: one
//! record per line with a `doc_id` and a raw `body`. Additional fields are
//! legal and ignored, which lets the feed extractor evolve without breaking
//! indexing. The builder never looks inside `doc_id` - it is an opaque,
//! non-empty identifier like `WSJ870108-0012`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One record of the document stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub doc_id: String,
    pub body: String,
}

/// Streaming reader over a `document_store.jsonl` file.
///
/// Yields records in file order; blank lines are tolerated (a trailing
/// newline is not a record). A line that fails to parse - missing fields,
/// a non-string `doc_id`, broken JSON - is malformed input and fatal.
pub struct DocumentStoreReader {
    lines: std::io::Lines<BufReader<File>>,
    line_no: usize,
}

impl DocumentStoreReader {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            Error::new(
                crate::error::ErrorKind::Io,
                format!("{}: {}", path.display(), e),
            )
        })?;
        Ok(DocumentStoreReader {
            lines: BufReader::new(file).lines(),
            line_no: 0,
        })
    }
}

impl Iterator for DocumentStoreReader {
    type Item = Result<DocumentRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line_no += 1;
            match self.lines.next()? {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    return Some(parse_record(&line, self.line_no));
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

fn parse_record(line: &str, line_no: usize) -> Result<DocumentRecord> {
    let record: DocumentRecord = serde_json::from_str(line)
        .map_err(|e| Error::malformed(format!("record on line {}: {}", line_no, e)))?;
    if record.doc_id.is_empty() {
        return Err(Error::malformed(format!("record on line {}: empty doc_id", line_no)));
    }
    Ok(record)
}

/// Count the records in a document store without materializing them.
///
/// Used by the search CLI to confirm an index was built from the store it
/// is being served against.
pub fn count_records(path: &Path) -> Result<u64> {
    let file = File::open(path).map_err(|e| {
        Error::new(
            crate::error::ErrorKind::Io,
            format!("{}: {}", path.display(), e),
        )
    })?;
    let mut count = 0u64;
    for line in BufReader::new(file).lines() {
        if !line?.trim().is_empty() {
            count += 1;
        }
    }
    Ok(count)
}
