use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use hsk_db::{Dictionary, LoadMode};
use hsk_types::LookupKind;

fn main() -> Result<()> {
    let data_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cargo run -p hsk-db --example stats -- <path-to-word-lists>")?;

    let dict = Dictionary::load_dir(&data_dir, LoadMode::Mmap)
        .with_context(|| format!("loading word lists from {}", data_dir.display()))?;

    let with_examples = dict.entries().iter().filter(|e| !e.examples.is_empty()).count();

    println!("Word lists   : {}", data_dir.display());
    println!("Entries      : {}", dict.len());
    println!("Headwords    : {}", dict.headword_count());
    for kind in LookupKind::ALL {
        println!("{:<13}: {} keys", kind.to_string(), dict.key_count(kind));
    }
    println!("With examples: {}", with_examples);
    for (level, count) in dict.level_counts() {
        println!("HSK {level}        : {count}");
    }

    // Spot-check one homophone group.
    let shi: Vec<&str> = dict
        .matches(LookupKind::TonelessPinyin, "shi")
        .map(|e| e.headword.as_str())
        .collect();
    println!("'shi' matches: {}", shi.join(" "));

    Ok(())
}
