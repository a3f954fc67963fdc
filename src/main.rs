use clap::Parser;
use colored::Colorize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::process;

use optext::convert::convert_source;
use optext::output::write_outputs;

#[derive(Parser)]
#[command(
    name = "optext",
    about = "Extracts translatable strings from libretro core option definitions",
    version,
    long_about = "optext reads a header containing a retro_core_option_definition \
                  array, derives MSG_HASH_* keys for its descriptions, info texts \
                  and option values, and writes a msg_hash.h lookup header, \
                  per-language string tables under ./intl, and the rewritten \
                  option code."
)]
struct Cli {
    /// Header file containing the option definition array
    /// (e.g. mycore_us.h or a copy of the struct in a .txt file).
    input: PathBuf,

    /// Directory to write msg_hash.h, intl/ and the converted code into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Emit the derived key/text entries as JSON instead of writing files.
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    let text = match fs::read_to_string(&cli.input) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{}: {}: {e}", "error".red().bold(), cli.input.display());
            process::exit(2);
        }
    };

    let conversion = match convert_source(&text) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {e:#}", "error".red().bold());
            process::exit(2);
        }
    };

    if conversion.literal_count == 0 {
        eprintln!(
            "{}: no option definitions found in {}",
            "error".red().bold(),
            cli.input.display()
        );
        process::exit(2);
    }

    if cli.json {
        print_json(&conversion);
        return;
    }

    // Output filenames derive from the input stem, mirroring the
    // msg_hash_<stem>.h convention of the consuming frontend.
    let stem = cli
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Err(e) = write_outputs(&cli.out_dir, &stem, &conversion) {
        eprintln!("{}: {e:#}", "error".red().bold());
        process::exit(2);
    }

    println!(
        "{}",
        format!(
            "Extracted {} string(s) from {} option definition(s)",
            conversion.entries.len(),
            conversion.literal_count
        )
        .green()
    );
    println!(
        "Wrote msg_hash.h, intl/ tables and {stem}_code.txt to {}",
        cli.out_dir.display()
    );
}

/// Emit valid, well-formatted JSON using serde_json.
fn print_json(conversion: &optext::convert::Conversion) {
    let output = json!({
        "entries": &conversion.entries,
        "count":   conversion.entries.len(),
        "options": conversion.literal_count,
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&output).expect("serde_json::Value is always serialisable")
    );
}
