//! Position utilities: decide which of two competing "opening token"
//! candidates is relevant and pair it with its closing position.
//!
//! The scanner uses these to resolve comment regions: a `//` opener closes at
//! the next newline, a `/*` opener at the next `*/`. Either candidate may be
//! absent (`None`).

use crate::scan::{find_at, find_between};

/// Pick whichever opening candidate occurs first and pair it with the next
/// occurrence of its closing token (searched from `open + 1`).
///
/// Returns `(None, None)` when both candidates are absent. A tie prefers the
/// first candidate; ties cannot occur for the token pairs the scanner uses
/// (`//` and `/*` differ in their second byte).
pub fn earliest_region(
    buf: &str,
    open1: Option<usize>,
    close1: &str,
    open2: Option<usize>,
    close2: &str,
) -> (Option<usize>, Option<usize>) {
    match (open1, open2) {
        (None, None) => (None, None),
        (Some(o1), None) => (Some(o1), find_at(buf, close1, o1 + 1)),
        (None, Some(o2)) => (Some(o2), find_at(buf, close2, o2 + 1)),
        (Some(o1), Some(o2)) => {
            if o1 <= o2 {
                (Some(o1), find_at(buf, close1, o1 + 1))
            } else {
                (Some(o2), find_at(buf, close2, o2 + 1))
            }
        }
    }
}

/// Pick whichever opening candidate either starts later or encloses the
/// other's opening position, bounded by `to` (closing tokens are searched in
/// `[open, to)`). Used when scanning backward over trailing comments.
///
/// Returns `(None, None)` when both candidates are absent.
///
/// # Panics
///
/// Panics if the two regions are mutually inconsistent (each appears to
/// enclose the other). The grammar preconditions make that state unreachable
/// for comment regions, so this is an assertion, not a recoverable error.
pub fn last_region(
    buf: &str,
    open1: Option<usize>,
    close1: &str,
    open2: Option<usize>,
    close2: &str,
    to: usize,
) -> (Option<usize>, Option<usize>) {
    match (open1, open2) {
        (None, None) => (None, None),
        (Some(o1), None) => (Some(o1), find_between(buf, close1, o1, to)),
        (None, Some(o2)) => (Some(o2), find_between(buf, close2, o2, to)),
        (Some(o1), Some(o2)) => {
            let b1 = find_between(buf, close1, o1, to);
            let b2 = find_between(buf, close2, o2, to);
            // Candidate 1 wins when it encloses candidate 2 (o1 < o2 < b1)
            // or when candidate 2's region never closes before it.
            let first_wins = (o1 < o2 && b1.is_some_and(|b| o2 < b))
                || b2.is_none_or(|b| b < o1);
            let second_wins = (o2 < o1 && b2.is_some_and(|b| o1 < b))
                || b1.is_none_or(|b| b < o2);
            if first_wins {
                (Some(o1), b1)
            } else if second_wins {
                (Some(o2), b2)
            } else {
                panic!(
                    "last_region: inconsistent comment regions at {o1} and {o2} \
                     (close candidates {b1:?} / {b2:?})"
                );
            }
        }
    }
}

/// Minimum of two optional offsets, treating `None` as absent.
pub fn min_offset(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (None, None) => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
