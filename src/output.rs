//! Artifact generation: the `msg_hash.h` declaration header, the per-language
//! string tables under `intl/`, and the converted code text.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::convert::Conversion;

/// Supported translation targets: short code (used in filenames and function
/// names) and the frontend's language constant suffix. English is handled
/// separately as the fallback and carries the generated strings.
const LANGUAGES: [(&str, &str); 23] = [
    ("ar", "ARABIC"),
    ("ast", "ASTURIAN"),
    ("chs", "CHINESE_SIMPLIFIED"),
    ("cht", "CHINESE_TRADITIONAL"),
    ("de", "GERMAN"),
    ("el", "GREEK"),
    ("eo", "ESPERANTO"),
    ("es", "SPANISH"),
    ("fa", "PERSIAN"),
    ("fi", "FINNISH"),
    ("fr", "FRENCH"),
    ("he", "HEBREW"),
    ("it", "ITALIAN"),
    ("jp", "JAPANESE"),
    ("ko", "KOREAN"),
    ("nl", "DUTCH"),
    ("pl", "POLISH"),
    ("pt_br", "PORTUGUESE_BRAZIL"),
    ("pt_pt", "PORTUGUESE_PORTUGAL"),
    ("ru", "RUSSIAN"),
    ("sk", "SLOVAK"),
    ("tr", "TURKISH"),
    ("vn", "VIETNAMESE"),
];

/// Write all artifacts for a conversion of `<stem>.h` under `out_dir`:
///
/// * `msg_hash.h`: key enum, lookup callbacks, language dispatcher
/// * `intl/msg_hash_<stem>.h`: the extracted English strings
/// * `intl/msg_hash_<base><code>.h`: an empty stub per translation target,
///   where `<base>` is the stem minus its trailing language code
/// * `<stem>_code.txt`: the rewritten source
pub fn write_outputs(out_dir: &Path, stem: &str, conversion: &Conversion) -> Result<()> {
    let intl_dir = out_dir.join("intl");
    fs::create_dir_all(&intl_dir)
        .with_context(|| format!("creating {}", intl_dir.display()))?;

    let english_file = format!("msg_hash_{stem}.h");
    // Trim the trailing language code by characters, not bytes, so a stem
    // ending in a multibyte character cannot split a char boundary.
    let base_len = stem.char_indices().rev().nth(1).map_or(0, |(i, _)| i);
    let base = &stem[..base_len];

    let hash_path = out_dir.join("msg_hash.h");
    fs::write(&hash_path, hash_header(stem, base, conversion))
        .with_context(|| format!("writing {}", hash_path.display()))?;

    let english_path = intl_dir.join(&english_file);
    fs::write(&english_path, string_table(conversion))
        .with_context(|| format!("writing {}", english_path.display()))?;

    for (code, _) in LANGUAGES {
        let stub = intl_dir.join(format!("msg_hash_{base}{code}.h"));
        fs::write(&stub, "").with_context(|| format!("writing {}", stub.display()))?;
    }

    let code_path = out_dir.join(format!("{stem}_code.txt"));
    fs::write(&code_path, &conversion.code)
        .with_context(|| format!("writing {}", code_path.display()))?;

    Ok(())
}

fn hash_header(stem: &str, base: &str, conversion: &Conversion) -> String {
    let mut out = String::new();
    out.push_str(
        "#ifndef __MSG_HASH_H\n\
         #define __MSG_HASH_H\n\n\
         #include <stdint.h>\n\
         #include <stddef.h>\n\
         #include <limits.h>\n\n\
         #define MSG_HASH(Id, str) case Id: return str;\n\n\
         enum msg_hash_enums\n\
         {\n\
         \x20  MSG_UNKNOWN = 0,\n\n",
    );
    for entry in &conversion.entries {
        let _ = writeln!(out, "   {},", entry.key);
    }
    out.push_str(
        "   MSG_LAST,\n\n\
         \x20  /* Ensure sizeof(enum) == sizeof(int) */\n\
         \x20  MSG_DUMMY          = INT_MAX\n\
         };\n\n\
         static INLINE bool string_is_equal(const char *a, const char *b)\n\
         {\n\
         \x20  return (a && b) ? !strcmp(a, b) : false;\n\
         }\n\n\
         /* Callback strings */\n\n",
    );

    // Callbacks are emitted in short-code order; "us" sorts between "tr"
    // and "vn".
    for (code, _) in LANGUAGES {
        if code == "vn" {
            push_callback(&mut out, "us", &format!("msg_hash_{stem}.h"));
        }
        push_callback(&mut out, code, &format!("msg_hash_{base}{code}.h"));
    }

    out.push_str(
        "const char *msg_hash_to_str(enum msg_hash_enums msg, unsigned language)\n\
         {\n\
         \x20  const char *ret = NULL;\n\n\
         #ifndef HAVE_NO_LANGEXTRA\n\
         \x20  switch (language)\n\
         \x20  {\n",
    );
    // The dispatcher lists cases by constant name, not by short code.
    let mut by_name = LANGUAGES;
    by_name.sort_by_key(|&(_, name)| name);
    for (code, name) in by_name {
        let _ = write!(
            out,
            "      case RETRO_LANGUAGE_{name}:\n\
             \x20        ret = msg_hash_to_str_{code}(msg);\n\
             \x20        break;\n"
        );
    }
    out.push_str(
        "      default:\n\
         \x20        break;\n\
         \x20  }\n\
         #endif\n\n\
         \x20  if (ret && !string_is_equal(ret, \"null\"))\n\
         \x20     return ret;\n\n\
         \x20  return msg_hash_to_str_us(msg);\n\
         }\n\n\
         #endif",
    );
    out
}

fn push_callback(out: &mut String, code: &str, include_file: &str) {
    let _ = write!(
        out,
        "const char *msg_hash_to_str_{code}(enum msg_hash_enums msg)\n\
         {{\n\
         \x20  switch (msg)\n\
         \x20  {{\n\
         #include \"intl/{include_file}\"\n\
         \x20     default:\n\
         \x20        break;\n\
         \x20  }}\n\n\
         \x20  return \"null\";\n\
         }}\n\n"
    );
}

fn string_table(conversion: &Conversion) -> String {
    let mut out = String::from(
        "#if defined(_MSC_VER) && !defined(_XBOX) && (_MSC_VER >= 1500 && _MSC_VER < 1900)\n\
         #if (_MSC_VER >= 1700)\n\
         /* https://support.microsoft.com/en-us/kb/980263 */\n\
         #pragma execution_character_set(\"utf-8\")\n\
         #endif\n\
         #pragma warning(disable:4566)\n\
         #endif\n\n",
    );
    for entry in &conversion.entries {
        let _ = write!(out, "MSG_HASH(\n   {},\n   {}\n   )\n", entry.key, entry.text);
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::convert_source;
    use tempfile::TempDir;

    const SOURCE: &str = r#"
struct retro_core_option_definition option_defs[] = {
   {
      "core_mode",
      "Run Mode",
      "Selects the run mode.",
      {
         { "interp", "Interpreter" },
         { NULL, NULL },
      },
      "interp"
   },
   { NULL, NULL, NULL, {{0}}, NULL },
};
"#;

    fn converted() -> Conversion {
        convert_source(SOURCE).unwrap()
    }

    #[test]
    fn test_writes_all_artifacts() {
        let dir = TempDir::new().unwrap();
        write_outputs(dir.path(), "testcore_us", &converted()).unwrap();

        assert!(dir.path().join("msg_hash.h").is_file());
        assert!(dir.path().join("intl/msg_hash_testcore_us.h").is_file());
        assert!(dir.path().join("testcore_us_code.txt").is_file());
        for (code, _) in LANGUAGES {
            let stub = dir.path().join(format!("intl/msg_hash_testcore_{code}.h"));
            assert!(stub.is_file(), "missing stub for {code}");
            assert!(fs::read_to_string(stub).unwrap().is_empty());
        }
    }

    #[test]
    fn test_hash_header_declares_keys_and_dispatcher() {
        let dir = TempDir::new().unwrap();
        write_outputs(dir.path(), "testcore_us", &converted()).unwrap();
        let header = fs::read_to_string(dir.path().join("msg_hash.h")).unwrap();

        assert!(header.starts_with("#ifndef __MSG_HASH_H"));
        assert!(header.contains("   MSG_UNKNOWN = 0,"));
        assert!(header.contains("   MSG_HASH_CORE_MODE_DESC,"));
        assert!(header.contains("   MSG_HASH_CORE_MODE_INFO,"));
        assert!(header.contains("   MSG_HASH_OPTION_VAL_INTERPRETER,"));
        assert!(header.contains("   MSG_LAST,"));
        assert!(header.contains("MSG_DUMMY          = INT_MAX"));
        assert!(header.contains("const char *msg_hash_to_str_de(enum msg_hash_enums msg)"));
        assert!(header.contains("#include \"intl/msg_hash_testcore_de.h\""));
        assert!(header.contains("#include \"intl/msg_hash_testcore_us.h\""));
        assert!(header.contains("case RETRO_LANGUAGE_PORTUGUESE_BRAZIL:"));
        assert!(header.contains("ret = msg_hash_to_str_pt_br(msg);"));
        assert!(header.contains("return msg_hash_to_str_us(msg);"));
        assert!(header.ends_with("#endif"));
    }

    #[test]
    fn test_multibyte_stem_trims_whole_characters() {
        let dir = TempDir::new().unwrap();
        write_outputs(dir.path(), "core\u{20ac}", &converted()).unwrap();

        // The base drops the last two characters ("e" and the euro sign),
        // not the last two bytes.
        assert!(dir.path().join("intl/msg_hash_core\u{20ac}.h").is_file());
        assert!(dir.path().join("intl/msg_hash_corar.h").is_file());
        assert!(dir.path().join("core\u{20ac}_code.txt").is_file());
    }

    #[test]
    fn test_short_stem_trims_to_empty_base() {
        let dir = TempDir::new().unwrap();
        write_outputs(dir.path(), "x", &converted()).unwrap();
        assert!(dir.path().join("intl/msg_hash_x.h").is_file());
        assert!(dir.path().join("intl/msg_hash_de.h").is_file());
    }

    #[test]
    fn test_callbacks_ordered_by_short_code() {
        let dir = TempDir::new().unwrap();
        write_outputs(dir.path(), "testcore_us", &converted()).unwrap();
        let header = fs::read_to_string(dir.path().join("msg_hash.h")).unwrap();

        let tr = header
            .find("const char *msg_hash_to_str_tr(enum msg_hash_enums msg)")
            .unwrap();
        let us = header
            .find("const char *msg_hash_to_str_us(enum msg_hash_enums msg)")
            .unwrap();
        let vn = header
            .find("const char *msg_hash_to_str_vn(enum msg_hash_enums msg)")
            .unwrap();
        assert!(tr < us && us < vn);
    }

    #[test]
    fn test_dispatcher_cases_ordered_by_constant_name() {
        let dir = TempDir::new().unwrap();
        write_outputs(dir.path(), "testcore_us", &converted()).unwrap();
        let header = fs::read_to_string(dir.path().join("msg_hash.h")).unwrap();
        let arabic = header.find("case RETRO_LANGUAGE_ARABIC:").unwrap();
        let dutch = header.find("case RETRO_LANGUAGE_DUTCH:").unwrap();
        let vietnamese = header.find("case RETRO_LANGUAGE_VIETNAMESE:").unwrap();
        assert!(arabic < dutch && dutch < vietnamese);
    }

    #[test]
    fn test_string_table_entries() {
        let dir = TempDir::new().unwrap();
        write_outputs(dir.path(), "testcore_us", &converted()).unwrap();
        let table = fs::read_to_string(dir.path().join("intl/msg_hash_testcore_us.h")).unwrap();

        assert!(table.starts_with("#if defined(_MSC_VER)"));
        assert!(table.contains(
            "MSG_HASH(\n   MSG_HASH_CORE_MODE_DESC,\n   \"Run Mode\"\n   )\n"
        ));
        assert!(table.contains(
            "MSG_HASH(\n   MSG_HASH_OPTION_VAL_INTERPRETER,\n   \"Interpreter\"\n   )\n"
        ));
    }

    #[test]
    fn test_code_text_matches_conversion() {
        let dir = TempDir::new().unwrap();
        let conv = converted();
        write_outputs(dir.path(), "testcore_us", &conv).unwrap();
        let code = fs::read_to_string(dir.path().join("testcore_us_code.txt")).unwrap();
        assert_eq!(code, conv.code);
    }
}
