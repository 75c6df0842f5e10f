// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for the search engine.
//!
//! Four kinds cover everything the core can get wrong: a duplicated document
//! id in the build stream, an index that fails load-time validation, a plain
//! I/O failure, and a malformed input record. Query-time misses (unknown
//! terms, empty queries) are not errors - they produce empty results.
//!
//! The CLI maps kinds to exit codes; the library never retries.

use std::fmt;
use std::io;

/// What went wrong, without the prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The build stream presented the same doc_id twice. Fatal to the build.
    DuplicateDocId,
    /// Artifact sizes or counts are inconsistent. Fatal to the load; rebuild.
    CorruptIndex,
    /// Underlying I/O failure. Safe to retry once the condition clears.
    Io,
    /// A record missing required fields or with a non-string doc_id.
    MalformedInput,
}

/// An error kind plus a human-readable context string.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Error {
            kind,
            context: context.into(),
        }
    }

    /// Shorthand for load-time validation failures.
    pub fn corrupt(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::CorruptIndex, context)
    }

    /// Shorthand for malformed input records.
    pub fn malformed(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::MalformedInput, context)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Process exit code for the CLI wrapper.
    ///
    /// 1 = malformed input, 2 = missing or corrupt index, 3 = I/O failure.
    /// A duplicated doc_id is a malformed stream, not a damaged index.
    pub fn exit_code(&self) -> i32 {
        match self.kind {
            ErrorKind::MalformedInput | ErrorKind::DuplicateDocId => 1,
            ErrorKind::CorruptIndex => 2,
            ErrorKind::Io => 3,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::DuplicateDocId => "duplicate doc_id",
            ErrorKind::CorruptIndex => "corrupt index",
            ErrorKind::Io => "i/o error",
            ErrorKind::MalformedInput => "malformed input",
        };
        write!(f, "{}: {}", kind, self.context)
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::new(ErrorKind::Io, err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
