//! Key derivation: turn extracted source text into C identifier fragments
//! suitable for `MSG_HASH_*` enum constants, plus the filters that decide
//! which option values get a key at all.

/// ASCII punctuation that never survives into a generated key. Underscore is
/// the one punctuation character kept.
fn is_special(c: char) -> bool {
    matches!(c, '!'..='/' | ':'..='@' | '['..='^' | '`' | '{'..='~') && c != '_'
}

/// Reduce raw source text (quotes, macro wrappers and all) to an enum key
/// fragment: drop punctuation, uppercase, map spaces to underscores, then
/// trim leading and trailing underscores.
///
/// `CORE_OPTION("fast forward")` becomes `CORE_OPTIONFAST_FORWARD`;
/// `"2x (fast)"` becomes `2X_FAST`.
pub fn clean_key(raw: &str) -> String {
    let kept: String = raw.chars().filter(|&c| !is_special(c)).collect();
    kept.to_uppercase()
        .replace(' ', "_")
        .trim_matches('_')
        .to_string()
}

/// Mimic a lossy ASCII re-encode followed by a backslash-escape decode:
/// non-ASCII characters are dropped, common C escapes become the character
/// they name, and unrecognized escapes are kept verbatim.
pub fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().filter(char::is_ascii).peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some('f') => out.push('\x0c'),
            Some('v') => out.push('\x0b'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('x') => push_hex(&mut out, &mut chars, 2, "\\x"),
            Some('u') => push_hex(&mut out, &mut chars, 4, "\\u"),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Consume up to `width` hex digits and push the decoded character, or the
/// original escape text when the digits are malformed.
fn push_hex<I>(out: &mut String, chars: &mut std::iter::Peekable<I>, width: usize, prefix: &str)
where
    I: Iterator<Item = char>,
{
    let mut digits = String::new();
    while digits.len() < width {
        match chars.peek() {
            Some(&c) if c.is_ascii_hexdigit() => {
                digits.push(c);
                chars.next();
            }
            _ => break,
        }
    }
    let decoded = (digits.len() == width)
        .then(|| u32::from_str_radix(&digits, 16).ok())
        .flatten()
        .and_then(char::from_u32);
    match decoded {
        Some(c) => out.push(c),
        None => {
            out.push_str(prefix);
            out.push_str(&digits);
        }
    }
}

/// Words left untranslated because the consuming frontend localizes them
/// itself. Compared against the quoted text, case-insensitively.
const BOOLEAN_WORDS: [&str; 6] = [
    "\"enabled\"",
    "\"disabled\"",
    "\"true\"",
    "\"false\"",
    "\"on\"",
    "\"off\"",
];

/// True when `quoted` (quotes included) is one of the boolean words that
/// never receive a generated key.
pub fn is_boolean_word(quoted: &str) -> bool {
    let lower = quoted.to_lowercase();
    BOOLEAN_WORDS.contains(&lower.as_str())
}

/// True when the content of `quoted` (quotes stripped) is purely numeric
/// once sign characters are removed. Numeric option values keep their
/// literal text and never receive a generated key.
pub fn is_numeric_value(quoted: &str) -> bool {
    if quoted.len() < 2 {
        return false;
    }
    let inner = &quoted[1..quoted.len() - 1];
    let digits: String = inner.chars().filter(|&c| c != '+' && c != '-').collect();
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_key_strips_quotes_and_uppercases() {
        assert_eq!(clean_key("\"video_scale\""), "VIDEO_SCALE");
    }

    #[test]
    fn test_clean_key_spaces_to_underscores() {
        assert_eq!(clean_key("\"fast forward rate\""), "FAST_FORWARD_RATE");
    }

    #[test]
    fn test_clean_key_drops_punctuation_keeps_underscore() {
        assert_eq!(clean_key("\"2x (fast!)\""), "2X_FAST");
        assert_eq!(clean_key("\"a_b.c,d\""), "A_BCD");
    }

    #[test]
    fn test_clean_key_macro_wrapper() {
        assert_eq!(clean_key("CORE_OPTION(\"low\")"), "CORE_OPTIONLOW");
    }

    #[test]
    fn test_clean_key_trims_underscores() {
        assert_eq!(clean_key("\" padded \""), "PADDED");
        assert_eq!(clean_key("\"__x__\""), "X");
    }

    #[test]
    fn test_decode_escapes_common() {
        assert_eq!(decode_escapes(r"line\nbreak"), "line\nbreak");
        assert_eq!(decode_escapes(r"tab\there"), "tab\there");
        assert_eq!(decode_escapes(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(decode_escapes(r"back\\slash"), "back\\slash");
    }

    #[test]
    fn test_decode_escapes_hex() {
        assert_eq!(decode_escapes(r"\x41"), "A");
        // Malformed hex keeps the escape text.
        assert_eq!(decode_escapes(r"\xZ"), "\\xZ");
    }

    #[test]
    fn test_decode_escapes_unknown_kept() {
        assert_eq!(decode_escapes(r"\q"), "\\q");
    }

    #[test]
    fn test_decode_escapes_drops_non_ascii() {
        assert_eq!(decode_escapes("caf\u{e9} 2\u{d7}"), "caf 2");
    }

    #[test]
    fn test_boolean_words_case_insensitive() {
        assert!(is_boolean_word("\"enabled\""));
        assert!(is_boolean_word("\"Disabled\""));
        assert!(is_boolean_word("\"ON\""));
        assert!(!is_boolean_word("\"fast\""));
        assert!(!is_boolean_word("enabled"));
    }

    #[test]
    fn test_numeric_values() {
        assert!(is_numeric_value("\"100\""));
        assert!(is_numeric_value("\"-3\""));
        assert!(is_numeric_value("\"+10\""));
        assert!(!is_numeric_value("\"1.5\""));
        assert!(!is_numeric_value("\"10x\""));
        assert!(!is_numeric_value("\"\""));
        assert!(!is_numeric_value("\"+\""));
    }
}
