//! Context-aware scanner: token searches that skip comment regions and
//! (where a false positive could hide) string literals.
//!
//! Every primitive takes a buffer and a byte offset and is side-effect-free.
//! All searched tokens are ASCII, so byte offsets always land on character
//! boundaries and the search helpers operate on raw bytes.
//!
//! The recurring algorithm is the re-anchor loop: find a candidate token,
//! check whether a comment opens before it, and if so re-run the search past
//! that comment's close. Each round strictly advances the minimum search
//! offset, so the loop terminates.

use crate::regions::{earliest_region, last_region, min_offset};

// ── byte-substring search helpers ─────────────────────────────────────────────

/// First occurrence of `needle` at or after `from`.
pub(crate) fn find_at(buf: &str, needle: &str, from: usize) -> Option<usize> {
    find_between(buf, needle, from, buf.len())
}

/// First occurrence of `needle` in `[from, to)`.
pub(crate) fn find_between(buf: &str, needle: &str, from: usize, to: usize) -> Option<usize> {
    let hay = buf.as_bytes();
    let needle = needle.as_bytes();
    let to = to.min(hay.len());
    if needle.is_empty() || from >= to || to - from < needle.len() {
        return None;
    }
    hay[from..to]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

/// Last occurrence of `needle` in `[from, to)`.
pub(crate) fn rfind_between(buf: &str, needle: &str, from: usize, to: usize) -> Option<usize> {
    let hay = buf.as_bytes();
    let needle = needle.as_bytes();
    let to = to.min(hay.len());
    if needle.is_empty() || from >= to || to - from < needle.len() {
        return None;
    }
    hay[from..to]
        .windows(needle.len())
        .rposition(|w| w == needle)
        .map(|i| i + from)
}

/// True when `pos` holds an offset strictly before `limit`.
fn before(pos: Option<usize>, limit: usize) -> bool {
    pos.is_some_and(|p| p < limit)
}

// ── string primitives ─────────────────────────────────────────────────────────

/// Offset of the next unescaped double quote after `quote_start`.
///
/// Escape detection looks back exactly one character: a quote preceded by a
/// backslash never terminates the string. A string ending in a literal
/// backslash (`"foo\\"`) is therefore misread as an escaped quote. Kept
/// bug-compatible, since generated keys in already-converted cores depend
/// on it.
pub fn find_second_quote(buf: &str, quote_start: Option<usize>) -> Option<usize> {
    let first = quote_start?;
    let mut quote = find_at(buf, "\"", first + 1)?;
    while buf.as_bytes()[quote - 1] == b'\\' {
        quote = find_at(buf, "\"", quote + 1)?;
    }
    Some(quote)
}

/// Span of the next double-quoted string at or after `from`, as the offsets
/// of its opening and closing quotes.
///
/// Any comment region opening before the candidate quote is resolved first
/// and the search re-anchored past it, so a `"` inside `//` or `/* */` text
/// never starts a string.
pub fn find_string(buf: &str, from: usize) -> (Option<usize>, Option<usize>) {
    let mut quote = find_at(buf, "\"", from);
    let (mut open, mut close) = comment_region(buf, from);

    while let (Some(a), Some(b)) = (open, close) {
        if a > b || before(quote, a) {
            break;
        }
        quote = find_at(buf, "\"", b + 1);
        (open, close) = comment_region(buf, b + 1);
    }

    let second = find_second_quote(buf, quote);
    (quote, second)
}

/// Offset of the last double quote in `[from, to)` outside comments,
/// skipping trailing comment regions backward.
pub fn rfind_string(buf: &str, from: usize, to: usize) -> Option<usize> {
    let mut quote = rfind_between(buf, "\"", from, to);
    let mut single = rfind_between(buf, "//", from, to);
    let mut multi = rfind_between(buf, "/*", from, to);
    let (mut open, mut close) = last_region(buf, single, "\n", multi, "*/", to);

    while let (Some(a), Some(b)) = (open, close) {
        if a > b || quote.is_some_and(|q| b < q) {
            break;
        }
        single = rfind_between(buf, "//", from, a);
        multi = rfind_between(buf, "/*", from, a);
        quote = rfind_between(buf, "\"", from, a);
        (open, close) = last_region(buf, single, "\n", multi, "*/", a);
    }

    quote
}

/// Like [`find_string`], but also searches for the `NULL` keyword as an
/// alternative terminal token. Returns `(string_start, string_end, null_pos)`,
/// each independently absent.
pub fn find_string_or_null(
    buf: &str,
    from: usize,
) -> (Option<usize>, Option<usize>, Option<usize>) {
    let mut quote = find_at(buf, "\"", from);
    let mut null = find_at(buf, "NULL", from);
    let (mut open, mut close) = comment_region(buf, from);
    let mut candidate = min_offset(quote, null);

    while let (Some(a), Some(b)) = (open, close) {
        if a > b || before(candidate, a) {
            break;
        }
        quote = find_at(buf, "\"", b + 1);
        null = find_at(buf, "NULL", b + 1);
        (open, close) = comment_region(buf, b + 1);
        candidate = min_offset(quote, null);
    }

    let second = find_second_quote(buf, quote);
    (quote, second, null)
}

// ── token / bracket primitives ────────────────────────────────────────────────

/// Offset of the next occurrence of `token` that is neither inside a comment
/// nor inside a string literal.
///
/// Comment skipping and string skipping interleave: a comment can hide a
/// false quote and a string can hide a false comment opener, so after
/// escaping one kind of region the other must be re-checked.
pub fn find_token(buf: &str, token: &str, from: usize) -> Option<usize> {
    let (mut q1, mut q2) = find_string(buf, from);
    let mut tok = find_at(buf, token, from);
    let (mut open, mut close) = comment_region(buf, from);

    let in_comment = |open: Option<usize>, close: Option<usize>, tok: Option<usize>| {
        matches!((open, close), (Some(a), Some(b)) if a <= b && !before(tok, a))
    };
    let in_string = |q1: Option<usize>, q2: Option<usize>, tok: Option<usize>| {
        matches!((q1, q2), (Some(a), Some(b)) if a < b && !before(tok, a))
    };

    while in_comment(open, close, tok) || in_string(q1, q2, tok) {
        // Re-anchor past comments until the candidate precedes the next one.
        while in_comment(open, close, tok) {
            let b = close.expect("in_comment guarantees a closed region");
            tok = find_at(buf, token, b + 1);
            (open, close) = comment_region(buf, b + 1);
        }
        // Re-anchor past strings the same way.
        while matches!((q1, q2), (Some(a), Some(b)) if a <= b && !before(tok, a)) {
            let b = q2.expect("guard guarantees a closing quote");
            tok = find_at(buf, token, b + 1);
            (q1, q2) = find_string(buf, b + 1);
        }
    }

    tok
}

/// Offset of the closing bracket matching the opening bracket at `open_pos`.
///
/// Same-type nesting is handled by probing for further openers (via
/// [`find_token`], so commented or quoted brackets never count) before the
/// naive closing candidate.
pub fn find_closing_bracket(buf: &str, open_pos: usize, open_char: char) -> Option<usize> {
    let (open_tok, close_tok) = match open_char {
        '(' => ("(", ")"),
        '[' => ("[", "]"),
        '{' => ("{", "}"),
        other => panic!("find_closing_bracket: unsupported bracket {other:?}"),
    };

    let mut scan_from = open_pos + 1;
    let mut depth = 0usize;
    loop {
        let closing = find_token(buf, close_tok, scan_from)?;
        // Count same-type openers ahead of this closing candidate; each one
        // claims a closer of its own.
        let mut opener = find_token(buf, open_tok, scan_from);
        while let Some(o) = opener {
            if o > closing {
                break;
            }
            depth += 1;
            opener = find_token(buf, open_tok, o + 1);
        }
        if depth == 0 {
            return Some(closing);
        }
        depth -= 1;
        scan_from = closing + 1;
    }
}

/// Span of the next atomic field value: a quoted string, a parenthesized
/// call-like expression, or a bracketed expression, whichever opens first
/// outside comments. Used to extract a literal's key field, which may be a
/// plain string or a macro/function-wrapped token.
///
/// Returns the offsets of the opening and closing delimiters, or `None` when
/// no opener is found or its closer is missing.
pub fn find_func(buf: &str, from: usize) -> Option<(usize, usize)> {
    let mut quote = find_at(buf, "\"", from);
    let mut paren = find_at(buf, "(", from);
    let mut bracket = find_at(buf, "[", from);
    let (mut open, mut close) = comment_region(buf, from);
    let mut start = min_offset(min_offset(quote, paren), bracket);

    while let (Some(a), Some(b)) = (open, close) {
        if a > b || before(start, a) {
            break;
        }
        quote = find_at(buf, "\"", b + 1);
        paren = find_at(buf, "(", b + 1);
        bracket = find_at(buf, "[", b + 1);
        (open, close) = comment_region(buf, b + 1);
        start = min_offset(min_offset(quote, paren), bracket);
    }

    let start = start?;
    let end = match buf.as_bytes()[start] {
        b'"' => find_second_quote(buf, Some(start)),
        b'(' => find_closing_bracket(buf, start, '('),
        b'[' => find_closing_bracket(buf, start, '['),
        _ => unreachable!("start is the offset of one of the three openers"),
    }?;

    Some((start, end))
}

/// Earliest comment region (single-line or block) at or after `from`.
fn comment_region(buf: &str, from: usize) -> (Option<usize>, Option<usize>) {
    let single = find_at(buf, "//", from);
    let multi = find_at(buf, "/*", from);
    earliest_region(buf, single, "\n", multi, "*/")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
