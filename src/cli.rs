// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the newsdex command-line interface.
//!
//! Three subcommands mirror the pipeline: `parse` extracts the document
//! stream from a raw feed, `index` builds the on-disk artifacts, and
//! `search` serves queries from stdin. Status chatter goes to stderr;
//! stdout carries only result lines.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "newsdex",
    about = "TF-IDF full-text search over newswire archives",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the document stream from a raw WSJ XML feed
    Parse {
        /// Path to the feed file
        input: String,

        /// Output directory for document_store.jsonl
        #[arg(short, long)]
        output_dir: String,
    },

    /// Build the index artifacts from a document store
    Index {
        /// Path to a document_store.jsonl produced by `parse`
        document_store: String,

        /// Output directory for the four index artifacts
        #[arg(short, long)]
        output_dir: String,
    },

    /// Read one query per line from stdin, write ranked "<doc_id> <score>"
    /// lines to stdout
    Search {
        /// Directory holding the index artifacts
        #[arg(long)]
        index_dir: String,

        /// Document store the index was built from; when given, its record
        /// count is checked against the index before serving
        #[arg(long)]
        document_store: Option<String>,

        /// Maximum results per query (default: unbounded)
        #[arg(short, long)]
        limit: Option<usize>,
    },
}
