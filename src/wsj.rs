// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Feed extraction: the loosely-formed WSJ XML dialect → document stream.
//!
//! The feed is not XML in any sense a real parser would accept - unescaped
//! ampersands, no declaration, tags that open and close on their own lines.
//! What it does guarantee: each article sits between `<DOC>` and `</DOC>`,
//! carries exactly one `<DOCNO>` identifier, and everything else inside the
//! record is text behind decorative tags. So the extractor is a line
//! scanner: track whether we are inside a record, capture the identifier,
//! strip tag markup from the rest, and emit one JSON record per article.
//!
//! Character references in the text are left exactly as found - expansion
//! is the normalizer's job, and the stored body stays faithful to the feed.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::build::document::DocumentRecord;
use crate::error::{Error, Result};

/// File name of the extracted stream inside the output directory.
pub const DOCUMENT_STORE_FILE: &str = "document_store.jsonl";

#[derive(Default)]
struct PendingDoc {
    doc_id: Option<String>,
    body: String,
}

/// Extract every `<DOC>` record from `input_path` into a JSONL store at
/// `store_path`. Returns the number of records written.
pub fn extract_feed(input_path: &Path, store_path: &Path) -> Result<u64> {
    let input = File::open(input_path).map_err(|e| {
        Error::new(
            crate::error::ErrorKind::Io,
            format!("{}: {}", input_path.display(), e),
        )
    })?;
    let reader = BufReader::new(input);
    let mut writer = BufWriter::new(File::create(store_path)?);

    let mut count = 0u64;
    let mut current: Option<PendingDoc> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();

        if trimmed.starts_with("<DOC>") {
            if current.is_some() {
                return Err(Error::malformed(format!("line {}: nested <DOC>", line_no)));
            }
            current = Some(PendingDoc::default());
        } else if trimmed.starts_with("</DOC>") {
            let doc = current.take().ok_or_else(|| {
                Error::malformed(format!("line {}: </DOC> without <DOC>", line_no))
            })?;
            let doc_id = doc.doc_id.ok_or_else(|| {
                Error::malformed(format!("line {}: document without <DOCNO>", line_no))
            })?;
            let record = DocumentRecord {
                doc_id,
                body: doc.body,
            };
            let json = serde_json::to_string(&record)
                .map_err(|e| Error::new(crate::error::ErrorKind::Io, e.to_string()))?;
            writer.write_all(json.as_bytes())?;
            writer.write_all(b"\n")?;
            count += 1;
        } else if let Some(doc) = current.as_mut() {
            if let Some(inner) = tag_inner(trimmed, "DOCNO") {
                let doc_id = inner.trim();
                if doc_id.is_empty() {
                    return Err(Error::malformed(format!("line {}: empty <DOCNO>", line_no)));
                }
                if doc.doc_id.is_some() {
                    return Err(Error::malformed(format!(
                        "line {}: second <DOCNO> in one document",
                        line_no
                    )));
                }
                doc.doc_id = Some(doc_id.to_string());
            } else {
                strip_tags(&line, &mut doc.body);
                doc.body.push('\n');
            }
        }
        // Lines outside any <DOC> are feed chatter; skip them.
    }

    if current.is_some() {
        return Err(Error::malformed("feed ends inside an unterminated <DOC>"));
    }
    writer.flush()?;
    Ok(count)
}

/// `<TAG> inner </TAG>` on a single line, or nothing.
fn tag_inner<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = line.find(&open)? + open.len();
    let end = line.find(&close)?;
    if start <= end {
        Some(&line[start..end])
    } else {
        None
    }
}

/// Append `line` to `out` with `<...>` spans removed.
fn strip_tags(line: &str, out: &mut String) {
    let mut in_tag = false;
    for c in line.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
}
