// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! newsdex CLI: parse a feed, build an index, serve queries.
//!
//! ```bash
//! # Extract the document stream from a raw WSJ feed
//! newsdex parse wsj.xml --output-dir ./corpus
//!
//! # Build the index artifacts
//! newsdex index ./corpus/document_store.jsonl --output-dir ./index
//!
//! # Serve queries (one per line on stdin)
//! echo "economic policy" | newsdex search --index-dir ./index
//! ```
//!
//! Exit codes: 0 success, 1 malformed input, 2 missing or corrupt index,
//! 3 I/O failure. On failure exactly one line goes to stderr.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;

use clap::Parser;

use newsdex::build::{count_records, run_build};
use newsdex::error::{Error, Result};
use newsdex::search::Searcher;
use newsdex::wsj;

mod cli;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { input, output_dir } => cmd_parse(&input, &output_dir),
        Commands::Index {
            document_store,
            output_dir,
        } => cmd_index(&document_store, &output_dir),
        Commands::Search {
            index_dir,
            document_store,
            limit,
        } => cmd_search(&index_dir, document_store.as_deref(), limit),
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        process::exit(e.exit_code());
    }
}

fn cmd_parse(input: &str, output_dir: &str) -> Result<()> {
    fs::create_dir_all(output_dir)?;
    let store_path = Path::new(output_dir).join(wsj::DOCUMENT_STORE_FILE);
    let count = wsj::extract_feed(Path::new(input), &store_path)?;
    eprintln!("✅ Parsed {} documents → {}", count, store_path.display());
    Ok(())
}

fn cmd_index(document_store: &str, output_dir: &str) -> Result<()> {
    let stats = run_build(Path::new(document_store), Path::new(output_dir))?;
    eprintln!("✅ Build complete");
    eprintln!(
        "   {} documents │ {} terms │ {} postings │ {} ms",
        stats.num_docs, stats.num_terms, stats.num_postings, stats.build_ms
    );
    Ok(())
}

fn cmd_search(index_dir: &str, document_store: Option<&str>, limit: Option<usize>) -> Result<()> {
    let mut searcher = Searcher::open(Path::new(index_dir))?;

    // Optional freshness check: the store must be the one the index came from.
    if let Some(store) = document_store {
        let records = count_records(Path::new(store))?;
        let indexed = searcher.stats().num_docs;
        if records != indexed {
            return Err(Error::corrupt(format!(
                "document store holds {} records but the index was built from {}",
                records, indexed
            )));
        }
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let query = line?;
        for hit in searcher.search(&query, limit)? {
            writeln!(out, "{} {:.4}", hit.doc_id, hit.score)?;
        }
        out.flush()?;
    }
    Ok(())
}
