//! Rewrite engine: splice generated-key placeholders over recorded spans,
//! keeping every other span consistent as the buffer grows or shrinks.
//!
//! Substitutes are looked up by exact text match, but a hit only counts when
//! its position is a key of the extraction map; accidental substring
//! collisions elsewhere in the literal are skipped. Every splice shifts all
//! spans strictly after the edit point by the signed length delta; proxy
//! entries shift as a unit (outer key plus both inner bounds) keyed on their
//! inner span.

use crate::convert::MessageEntry;
use crate::extract::{FieldSpan, SpanMap};
use crate::scan::find_at;

/// Apply `pos + delta` to a span offset. Offsets only ever shift by deltas
/// produced from spans within the same buffer, so the result never
/// underflows.
fn shift(pos: usize, delta: isize) -> usize {
    (pos as isize + delta) as usize
}

/// Rewrite one literal: replace every recorded span whose text matches a
/// generated entry with `msg_hash_to_str(<KEY>, language)`.
///
/// Entries are global (accumulated across all literals); entries whose text
/// does not occur at a recorded position in this literal are skipped, which
/// is how deduplicated option values resolve to the same key everywhere.
pub fn rewrite_literal(code: &str, mut map: SpanMap, entries: &[MessageEntry]) -> String {
    let mut code = code.to_string();

    for entry in entries {
        // The occurrence must be one this literal recorded.
        let mut hit = find_at(&code, &entry.text, 0);
        while let Some(pos) = hit {
            if map.contains_key(&pos) {
                break;
            }
            hit = find_at(&code, &entry.text, pos + 1);
        }
        let Some(mut edit_at) = hit else {
            continue;
        };

        let substitute = format!("msg_hash_to_str({}, language)", entry.key);
        let mut delta = substitute.len() as isize;
        let span = *map.get(&edit_at).expect("hit loop verified membership");
        let edit_end = match span {
            FieldSpan::Direct(end) => {
                // The span now covers the substitute text.
                map.insert(edit_at, FieldSpan::Direct(edit_at + substitute.len()));
                delta += edit_at as isize - end as isize;
                end
            }
            FieldSpan::Proxy { start, end } => {
                // The splice lands on the proxied NULL span, not the key
                // text; re-key the inner span to the substitute's length.
                map.insert(
                    edit_at,
                    FieldSpan::Proxy {
                        start,
                        end: start + substitute.len(),
                    },
                );
                edit_at = start;
                delta += start as isize - end as isize;
                end
            }
        };

        code = format!("{}{}{}", &code[..edit_at], substitute, &code[edit_end..]);

        // Shift every span strictly after the edit point.
        let mut shifted = SpanMap::new();
        for (key, value) in std::mem::take(&mut map) {
            match value {
                FieldSpan::Proxy { start, end } if start > edit_at => {
                    shifted.insert(
                        shift(key, delta),
                        FieldSpan::Proxy {
                            start: shift(start, delta),
                            end: shift(end, delta),
                        },
                    );
                }
                FieldSpan::Direct(end) if key > edit_at => {
                    shifted.insert(shift(key, delta), FieldSpan::Direct(shift(end, delta)));
                }
                other => {
                    shifted.insert(key, other);
                }
            }
        }
        map = shifted;
    }

    code
}

// ── Tests ─────────────────────────────────────────────────────────────────────
