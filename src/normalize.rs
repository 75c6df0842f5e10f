// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text normalization: raw article bodies in, term sequences out.
//!
//! One function serves both sides of the engine. Bodies pass through it at
//! index time, query strings at query time, so a term can never exist in the
//! index under a form the query path cannot produce. Asymmetry here is the
//! classic way search engines silently lose recall.
//!
//! The term alphabet is deliberately narrow: lowercase ASCII letters and
//! digits. Hyphens join their neighbors (`state-of-the-art` becomes
//! `stateoftheart`), and so does any other stripped character - removal
//! never splits a token, only whitespace does.

/// The five named character references the feed uses.
///
/// `&amp;` is matched like any other entity in a single left-to-right pass;
/// expanded output is never rescanned, so `&amp;lt;` decodes to the literal
/// text `&lt;` rather than `<`.
const ENTITIES: [(&str, char); 5] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&apos;", '\''),
];

/// Expand named character references. Unknown references pass through intact.
fn expand_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match ENTITIES.iter().find(|(name, _)| tail.starts_with(name)) {
            Some(&(name, expansion)) => {
                out.push(expansion);
                rest = &tail[name.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Map a raw text body to its ordered term sequence.
///
/// Pure and deterministic:
///
/// 1. expand the named character references above;
/// 2. fold ASCII letters to lowercase (non-ASCII letters are left alone and
///    then dropped by the alphabet filter);
/// 3. drop every character outside ASCII letters / digits / whitespace /
///    hyphen, with hyphens and dropped characters joining their neighbors;
/// 4. split on runs of ASCII whitespace, discarding empty fragments.
///
/// No stopword list, no stemming.
pub fn normalize(raw: &str) -> Vec<String> {
    let expanded = expand_entities(raw);

    let mut terms = Vec::new();
    let mut term = String::new();
    for c in expanded.chars() {
        if c.is_ascii_alphanumeric() {
            term.push(c.to_ascii_lowercase());
        } else if c.is_ascii_whitespace() {
            if !term.is_empty() {
                terms.push(std::mem::take(&mut term));
            }
        }
        // Everything else - hyphens included - joins without a boundary.
    }
    if !term.is_empty() {
        terms.push(term);
    }
    terms
}
