//! Literal locator: finds the byte range of every complete option-definition
//! initializer literal in a source buffer.
//!
//! The shape recognized is
//! `{ key, "description", info, { {opt, opt}, … }, default },`
//! where every field may be preceded by `//`, `/* */` or `#`-line regions,
//! the key may be a plain string or a macro/function-wrapped token, the info
//! field may span multiple lines, and the pair list nests one level of
//! braces. The whole grammar lives in a single pattern; callers only ever see
//! structured spans, never re-parsed substrings.

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// Comment region: block comment, `//` line, or preprocessor-style `#` line.
const COMMENT: &str = r"(?:/\*(?s:.)*?\*/|//.*[\r\n]+|#.*[\r\n]+)";

fn literal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // `cs` = any run of comments with interleaved whitespace.
        let cs = format!(r"(?:{COMMENT}\s*)*");
        let key = r#"(?:".*?"|[a-zA-Z0-9_]+\s*[(\[](?s:.)*?[)\]]|[a-zA-Z0-9_]+\s*".*?")"#;
        let string_or_null = r#"(?:".*?"|NULL)"#;
        let multiline_string_or_null = r#"(?:"(?s:.)*?"|NULL)"#;
        let pair = format!(
            r"\{{\s*{cs}{string_or_null}\s*{cs},\s*{cs}{string_or_null}\s*{cs}\}}\s*{cs},?\s*{cs}"
        );
        let pattern = format!(
            r#"\{{\s*{cs}{key}\s*{cs},\s*{cs}".*?"\s*{cs},\s*{cs}{multiline_string_or_null}\s*{cs},\s*{cs}\{{\s*{cs}(?:{pair})*\}}\s*{cs},?\s*(?:{cs}{string_or_null}\s*{cs},?\s*)*{cs}\}},"#
        );
        Regex::new(&pattern).expect("option literal pattern is valid")
    })
}

/// Byte ranges of every option-definition literal in `src`, in source order,
/// non-overlapping. Each range includes the literal's enclosing braces and
/// its trailing comma.
///
/// The `{ NULL, NULL, NULL, {{0}}, NULL },` array terminator never matches:
/// its key field is neither a string nor a wrapped token.
pub fn locate_literals(src: &str) -> Vec<Range<usize>> {
    literal_pattern().find_iter(src).map(|m| m.range()).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
