//! Whole-buffer conversion: locate every option literal, derive the key and
//! text entries, then rewrite the buffer into assignment form.
//!
//! Entry accumulation is a separate pass from rewriting. Option values are
//! deduplicated globally, so a value shared by two literals gets one key, and
//! both literals must already know about it when their rewrite runs.

use std::collections::HashSet;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::extract::parse_literal;
use crate::locate::locate_literals;
use crate::names::{clean_key, decode_escapes, is_numeric_value};
use crate::rewrite::rewrite_literal;

/// One generated key and the exact source text (quotes included) it stands
/// in for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageEntry {
    pub key: String,
    pub text: String,
}

/// Result of converting one source buffer.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Every generated entry, in emission order.
    pub entries: Vec<MessageEntry>,
    /// The rewritten buffer: preamble in place of the array opener, one
    /// assignment statement per literal, terminator removed.
    pub code: String,
    /// Number of option literals found.
    pub literal_count: usize,
}

const ARRAY_OPENER: &str = "struct retro_core_option_definition option_defs[] = {";

const PREAMBLE: &str = "   size_t   coreOptionSize = 0;\n\
                        \x20  unsigned language = 0;\n\n\
                        #ifndef HAVE_NO_LANGEXTRA\n\
                        \x20  if (!(/* retro_environment_t */(RETRO_ENVIRONMENT_GET_LANGUAGE, &language) &&\n\
                        \x20       (language < RETRO_LANGUAGE_LAST)))\n\
                        \x20      language = 0;\n\
                        #endif\n";

const ARRAY_TERMINATOR: &str = "{ NULL, NULL, NULL, {{0}}, NULL },\n};";

/// Convert `text`: extract entries from every option literal, then rewrite
/// each literal in place.
pub fn convert_source(text: &str) -> Result<Conversion> {
    let spans = locate_literals(text);
    let mut parsed = Vec::with_capacity(spans.len());
    for (i, span) in spans.iter().enumerate() {
        let message = &text[span.clone()];
        let (literal, map) = parse_literal(message)
            .with_context(|| format!("option literal {} (offset {})", i + 1, span.start))?;
        parsed.push((message, literal, map));
    }

    // Pass 1: accumulate entries across all literals so option-value
    // deduplication is global.
    let mut entries = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for (_, literal, _) in &parsed {
        let key = clean_key(&literal.key);
        entries.push(MessageEntry {
            key: format!("MSG_HASH_{key}_DESC"),
            text: literal.description.clone(),
        });

        // An info shorter than three bytes is an empty string literal.
        if literal.infos.len() > 1 {
            for (j, alt) in literal.infos.iter().enumerate() {
                if alt.len() > 2 && alt != "NULL" {
                    entries.push(MessageEntry {
                        key: format!("MSG_HASH_{key}_INFO{j}"),
                        text: alt.clone(),
                    });
                }
            }
        } else if let Some(info) = literal.infos.first() {
            if info.len() > 2 && info != "NULL" {
                entries.push(MessageEntry {
                    key: format!("MSG_HASH_{key}_INFO"),
                    text: info.clone(),
                });
            }
        }

        for (_, value) in &literal.pairs {
            if seen.contains(value) || is_numeric_value(value) {
                continue;
            }
            seen.insert(value.clone());
            entries.push(MessageEntry {
                key: format!("MSG_HASH_OPTION_VAL_{}", clean_key(&decode_escapes(value))),
                text: value.clone(),
            });
        }
    }

    // Pass 2: rewrite each literal and splice it back as an assignment.
    let literal_count = parsed.len();
    let mut code = text.replace(ARRAY_OPENER, PREAMBLE);
    for (message, _, map) in parsed {
        let rewritten = rewrite_literal(message, map, &entries);
        // The literal's trailing comma becomes the statement's semicolon.
        let statement = format!(
            "option_defs[coreOptionSize++] = (struct retro_core_option_definition) {};",
            &rewritten[..rewritten.len() - 1]
        );
        code = code.replace(message, &statement);
    }
    code = code.replace(ARRAY_TERMINATOR, "");

    Ok(Conversion {
        entries,
        code,
        literal_count,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"#include "libretro.h"

struct retro_core_option_definition option_defs[] = {
   {
      "core_speed",
      "Emulation Speed",
      "Controls how fast the core runs.",
      {
         { "normal", "Normal" },
         { "fast", "Fast" },
         { "100", "100" },
         { NULL, NULL },
      },
      "normal"
   },
   {
      "core_region",
      "Console Region",
      "Selects the emulated region.",
      {
         { "auto", NULL },
         { "fast", "Fast" },
         { NULL, NULL },
      },
      "auto"
   },
   { NULL, NULL, NULL, {{0}}, NULL },
};
"#;

    #[test]
    fn test_entries_in_emission_order() {
        let conv = convert_source(SOURCE).unwrap();
        let keys: Vec<&str> = conv.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(
            keys,
            [
                "MSG_HASH_CORE_SPEED_DESC",
                "MSG_HASH_CORE_SPEED_INFO",
                "MSG_HASH_OPTION_VAL_NORMAL",
                "MSG_HASH_OPTION_VAL_FAST",
                "MSG_HASH_CORE_REGION_DESC",
                "MSG_HASH_CORE_REGION_INFO",
                "MSG_HASH_OPTION_VAL_AUTO",
            ]
        );
        assert_eq!(conv.literal_count, 2);
    }

    #[test]
    fn test_numeric_value_kept_literal() {
        let conv = convert_source(SOURCE).unwrap();
        assert!(conv.entries.iter().all(|e| e.text != "\"100\""));
        assert!(conv.code.contains("{ \"100\", \"100\" }"));
    }

    #[test]
    fn test_value_shared_across_literals_dedupes() {
        let conv = convert_source(SOURCE).unwrap();
        let fast: Vec<_> = conv
            .entries
            .iter()
            .filter(|e| e.text == "\"Fast\"")
            .collect();
        assert_eq!(fast.len(), 1);
        // Both literals resolve the shared value to the same key.
        assert_eq!(
            conv.code
                .matches("msg_hash_to_str(MSG_HASH_OPTION_VAL_FAST, language)")
                .count(),
            2
        );
    }

    #[test]
    fn test_array_opener_becomes_preamble() {
        let conv = convert_source(SOURCE).unwrap();
        assert!(!conv.code.contains(ARRAY_OPENER));
        assert!(conv.code.contains("size_t   coreOptionSize = 0;"));
        assert!(conv.code.contains("RETRO_ENVIRONMENT_GET_LANGUAGE"));
    }

    #[test]
    fn test_literals_become_assignments() {
        let conv = convert_source(SOURCE).unwrap();
        assert_eq!(
            conv.code
                .matches("option_defs[coreOptionSize++] = (struct retro_core_option_definition)")
                .count(),
            2
        );
        // The assignment ends in `};` where the literal ended in `},`.
        assert!(conv.code.contains("\"normal\"\n   };"));
    }

    #[test]
    fn test_terminator_removed() {
        let conv = convert_source(SOURCE).unwrap();
        assert!(!conv.code.contains("{{0}}"));
    }

    #[test]
    fn test_descriptions_replaced_defaults_untouched() {
        let conv = convert_source(SOURCE).unwrap();
        assert!(conv
            .code
            .contains("msg_hash_to_str(MSG_HASH_CORE_SPEED_DESC, language)"));
        assert!(!conv.code.contains("\"Emulation Speed\""));
        // Default field values and pair keys stay literal.
        assert!(conv.code.contains("\"normal\"\n   };"));
        assert!(conv.code.contains("{ \"fast\","));
    }

    #[test]
    fn test_null_value_pair_rewrites_null_position() {
        let conv = convert_source(SOURCE).unwrap();
        assert!(conv
            .code
            .contains("{ \"auto\", msg_hash_to_str(MSG_HASH_OPTION_VAL_AUTO, language) }"));
    }

    #[test]
    fn test_multiple_infos_numbered() {
        let src = r#"
   {
      "core_multi",
      "Multi Info",
      "Part one.",
      "Part two.",
      {
         { "a", "Alpha" },
         { NULL, NULL },
      },
      "a"
   },
"#;
        let conv = convert_source(src).unwrap();
        let keys: Vec<&str> = conv.entries.iter().map(|e| e.key.as_str()).collect();
        assert!(keys.contains(&"MSG_HASH_CORE_MULTI_INFO0"));
        assert!(keys.contains(&"MSG_HASH_CORE_MULTI_INFO1"));
    }

    #[test]
    fn test_null_info_emits_no_entry() {
        let src = r#"
   {
      "core_plain",
      "Plain",
      NULL,
      {
         { "x", "Ex" },
         { NULL, NULL },
      },
      "x"
   },
"#;
        let conv = convert_source(src).unwrap();
        assert!(conv.entries.iter().all(|e| !e.key.contains("_INFO")));
    }

    #[test]
    fn test_backsubstitution_reproduces_extraction() {
        // Replacing each placeholder with its entry text and re-extracting
        // must reproduce the originally extracted fields, proxied NULL
        // values included (they come back as the key text standing in for
        // them, which is exactly what extraction records).
        let conv = convert_source(SOURCE).unwrap();
        for span in crate::locate::locate_literals(SOURCE) {
            let message = &SOURCE[span];
            let (before, map) = parse_literal(message).unwrap();
            let mut restored = crate::rewrite::rewrite_literal(message, map, &conv.entries);
            for entry in &conv.entries {
                restored = restored.replace(
                    &format!("msg_hash_to_str({}, language)", entry.key),
                    &entry.text,
                );
            }
            let spans = crate::locate::locate_literals(&restored);
            assert_eq!(spans.len(), 1, "restored literal must still locate");
            let (after, _) = parse_literal(&restored[spans[0].clone()]).unwrap();
            assert_eq!(after, before);
        }
    }

    #[test]
    fn test_empty_source_is_empty_conversion() {
        let conv = convert_source("int x;\n").unwrap();
        assert!(conv.entries.is_empty());
        assert_eq!(conv.literal_count, 0);
        assert_eq!(conv.code, "int x;\n");
    }

    #[test]
    fn test_malformed_literal_is_an_error() {
        // The locator accepts a pair list holding only the terminator pair,
        // but extraction then runs out of fields and must report it.
        let bad = "{ \"k\", \"D\", \"I.\", {{NULL,NULL}}, NULL },";
        let err = convert_source(bad);
        assert!(err.is_err());
        assert!(format!("{:#}", err.unwrap_err()).contains("option literal 1"));
    }
}
