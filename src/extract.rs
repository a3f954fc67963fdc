//! Literal extractor: decomposes one located option literal into its key,
//! description, info strings and key/value pairs, recording the exact byte
//! span of every extracted string or `NULL` placeholder.
//!
//! The recorded spans (the extraction map) later drive the rewrite engine,
//! so their bookkeeping must match what the rewriter expects: map keys are
//! span starts, ends are exclusive (one past the closing quote or the last
//! byte of `NULL`).

use crate::names::is_boolean_word;
use crate::scan::{find_func, find_string, find_string_or_null, find_token, rfind_string};
use anyhow::{Result, bail};
use std::collections::BTreeMap;

/// One recorded span in the extraction map.
///
/// `Direct` is an ordinary string/`NULL` span: the map key is its start, the
/// payload its exclusive end. `Proxy` is recorded when a pair's value field
/// was `NULL` and the key text stands in for it: the map key is the *key*
/// span's start, while `start..end` bounds the `NULL` span the substitution
/// must actually splice over. The enum makes "one level of nesting only"
/// structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSpan {
    Direct(usize),
    Proxy { start: usize, end: usize },
}

/// Extraction map: span start → recorded span, ordered by start offset.
pub type SpanMap = BTreeMap<usize, FieldSpan>;

/// The decomposed literal. `key` is the bare key text (no quotes or
/// brackets); every other field keeps its enclosing double quotes, or is the
/// exact text `NULL`. A pair's value falls back to its own key text when the
/// value field was `NULL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub key: String,
    pub description: String,
    pub infos: Vec<String>,
    pub pairs: Vec<(String, String)>,
}

/// `a` occurs and precedes `b` (an absent `b` counts as later).
fn wins(a: Option<usize>, b: Option<usize>) -> bool {
    a.is_some_and(|x| b.is_none_or(|y| x < y))
}

/// `a` occurs strictly after `b`, treating an absent `b` as "already passed".
fn past(a: Option<usize>, b: Option<usize>) -> bool {
    a.is_some_and(|x| b.is_none_or(|y| x > y))
}

/// Decompose one literal's text, returning the extracted fields and the
/// extraction map of every recorded span.
///
/// Grammar-impossible states (the locator guarantees each field's presence)
/// are fatal: a partial or silently wrong decomposition would corrupt the
/// rewritten source, so the whole run aborts with a diagnostic instead.
pub fn parse_literal(message: &str) -> Result<(Literal, SpanMap)> {
    let mut map = SpanMap::new();

    // Key: a plain string or the contents of a call/array wrapper. The
    // delimiters themselves are not part of the key text.
    let Some((key_start, key_end)) = find_func(message, 0) else {
        bail!("option literal has no key field");
    };
    let key = message[key_start + 1..key_end].to_string();

    // Description: always a plain string.
    let (desc_start, desc_close) = find_string(message, key_end + 1);
    let (Some(desc_start), Some(desc_close)) = (desc_start, desc_close) else {
        bail!("option literal has no description string");
    };
    let mut cursor = desc_close + 1;
    let description = message[desc_start..cursor].to_string();
    map.insert(desc_start, FieldSpan::Direct(cursor));

    // Info entries: strings or NULL until the options sub-list's `{` token.
    // `brace` is probed once; the info loop runs while the next candidate
    // still precedes it.
    let brace = find_token(message, "{", cursor);
    let (mut str_start, mut str_close, mut null) = find_string_or_null(message, cursor);
    let mut infos = Vec::new();
    while past(brace, str_close) || past(brace, null) {
        if wins(str_start, null) {
            let start = str_start.expect("wins() guarantees presence");
            let Some(close) = str_close else {
                bail!("unterminated info string at offset {start}");
            };
            // A multi-line info may be several adjacent fragments; absorb up
            // to the last fragment before the next comma.
            let Some(comma) = find_token(message, ",", close + 1) else {
                bail!("no comma after info string at offset {start}");
            };
            let Some(true_close) = rfind_string(message, close, comma) else {
                bail!("lost closing quote of info string at offset {start}");
            };
            cursor = true_close + 1;
            infos.push(message[start..cursor].to_string());
            map.insert(start, FieldSpan::Direct(cursor));
        } else if wins(null, str_start) {
            let start = null.expect("wins() guarantees presence");
            cursor = start + 4;
            infos.push(message[start..cursor].to_string());
            map.insert(start, FieldSpan::Direct(cursor));
        } else {
            bail!("found neither a string nor NULL while scanning info text");
        }
        (str_start, str_close, null) = find_string_or_null(message, cursor);
    }

    // Key/value pairs: alternate string-or-NULL tokens until the double-NULL
    // terminator (or nothing further is found).
    let mut pairs = Vec::new();
    loop {
        // Pair key.
        let (key_text, key_idx, key_end);
        if wins(str_start, null) {
            let start = str_start.expect("wins() guarantees presence");
            let Some(close) = str_close else {
                bail!("unterminated option key string at offset {start}");
            };
            key_text = message[start..close + 1].to_string();
            key_idx = start;
            key_end = close + 1;
        } else if wins(null, str_start) {
            let start = null.expect("wins() guarantees presence");
            key_text = "NULL".to_string();
            key_idx = start;
            key_end = start + 4;
        } else {
            break;
        }

        (str_start, str_close, null) = find_string_or_null(message, key_end);

        // Pair value.
        let (value_text, value_idx, value_end);
        if wins(str_start, null) {
            let start = str_start.expect("wins() guarantees presence");
            let Some(close) = str_close else {
                bail!("unterminated option value string at offset {start}");
            };
            value_text = message[start..close + 1].to_string();
            value_idx = start;
            value_end = close + 1;
        } else if wins(null, str_start) {
            let start = null.expect("wins() guarantees presence");
            value_text = "NULL".to_string();
            value_idx = start;
            value_end = start + 4;
        } else {
            break;
        }

        if value_text != "NULL" {
            // Reserved boolean words are translated elsewhere; skip the pair
            // entirely (no key, no recorded span).
            if is_boolean_word(&value_text) {
                (str_start, str_close, null) = find_string_or_null(message, value_end);
                continue;
            }
            pairs.push((key_text, value_text));
            map.insert(value_idx, FieldSpan::Direct(value_end));
        } else if key_text != "NULL" {
            if is_boolean_word(&key_text) {
                (str_start, str_close, null) = find_string_or_null(message, value_end);
                continue;
            }
            // NULL value: the key text stands in for it. Record a proxy span
            // keyed by the key's start, bounding the NULL it substitutes for.
            pairs.push((key_text.clone(), key_text));
            map.insert(
                key_idx,
                FieldSpan::Proxy {
                    start: value_idx,
                    end: value_end,
                },
            );
        } else {
            // {NULL, NULL} terminator pair, not extracted.
            break;
        }

        (str_start, str_close, null) = find_string_or_null(message, value_end);
    }

    Ok((
        Literal {
            key,
            description,
            infos,
            pairs,
        },
        map,
    ))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
