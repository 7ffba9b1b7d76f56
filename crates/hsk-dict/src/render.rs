use std::collections::BTreeMap;
use std::io::{self, Write};

use hsk_db::{Dictionary, Hit};
use hsk_types::{Entry, LookupKind};
use serde::Serialize;

/// How lookup results are written to stdout.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON document per line.
    Json,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct EntryView<'a> {
    headword: &'a str,
    pinyin: &'a str,
    level: u8,
    translations: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    examples: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    rank: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<usize>,
}

impl<'a> EntryView<'a> {
    pub fn new(entry: &'a Entry) -> Self {
        Self {
            headword: &entry.headword,
            pinyin: &entry.pronunciation,
            level: entry.level.get(),
            translations: &entry.translations,
            examples: &entry.examples,
            rank: None,
            total: None,
        }
    }

    pub fn from_hit(hit: &Hit<'a>) -> Self {
        Self {
            rank: Some(hit.rank),
            total: Some(hit.total),
            ..Self::new(hit.entry)
        }
    }
}

#[derive(Serialize)]
struct MatchesResponse<'a> {
    kind: String,
    query: &'a str,
    total: usize,
    items: Vec<EntryView<'a>>,
}

#[derive(Serialize)]
struct NoMatchResponse<'a> {
    query: &'a str,
    error: &'static str,
}

#[derive(Serialize)]
struct StatsResponse {
    entries: usize,
    headwords: usize,
    pinyin_keys: usize,
    toneless_keys: usize,
    translation_terms: usize,
    levels: BTreeMap<u8, usize>,
}

pub fn write_entry<W: Write>(
    out: &mut W,
    format: OutputFormat,
    view: &EntryView<'_>,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(out, view),
        OutputFormat::Text => {
            if let (Some(rank), Some(total)) = (view.rank, view.total) {
                write!(out, "({rank}/{total}) ")?;
            }
            writeln!(out, "{} [{}] HSK {}", view.headword, view.pinyin, view.level)?;
            writeln!(out, "  {}", view.translations)?;
            if !view.examples.is_empty() {
                writeln!(out, "  {}", view.examples)?;
            }
            Ok(())
        }
    }
}

pub fn write_no_match<W: Write>(out: &mut W, format: OutputFormat, query: &str) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(
            out,
            &NoMatchResponse {
                query,
                error: "no match",
            },
        ),
        OutputFormat::Text => writeln!(out, "no match for {query:?}"),
    }
}

/// Every match for a one-shot query, in corpus order.
pub fn write_matches<W: Write>(
    out: &mut W,
    format: OutputFormat,
    kind: LookupKind,
    query: &str,
    entries: &[&Entry],
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(
            out,
            &MatchesResponse {
                kind: kind.to_string(),
                query,
                total: entries.len(),
                items: entries.iter().map(|e| EntryView::new(e)).collect(),
            },
        ),
        OutputFormat::Text => {
            if entries.is_empty() {
                return write_no_match(out, format, query);
            }
            for entry in entries {
                write_entry(out, format, &EntryView::new(entry))?;
            }
            Ok(())
        }
    }
}

pub fn write_stats<W: Write>(
    out: &mut W,
    format: OutputFormat,
    dict: &Dictionary,
) -> io::Result<()> {
    let stats = StatsResponse {
        entries: dict.len(),
        headwords: dict.headword_count(),
        pinyin_keys: dict.key_count(LookupKind::Pinyin),
        toneless_keys: dict.key_count(LookupKind::TonelessPinyin),
        translation_terms: dict.key_count(LookupKind::Translation),
        levels: dict
            .level_counts()
            .into_iter()
            .map(|(level, count)| (level.get(), count))
            .collect(),
    };
    match format {
        OutputFormat::Json => write_json(out, &stats),
        OutputFormat::Text => {
            writeln!(out, "Entries          : {}", stats.entries)?;
            writeln!(out, "Headwords        : {}", stats.headwords)?;
            writeln!(out, "Pinyin keys      : {}", stats.pinyin_keys)?;
            writeln!(out, "Toneless keys    : {}", stats.toneless_keys)?;
            writeln!(out, "Translation terms: {}", stats.translation_terms)?;
            for (level, count) in &stats.levels {
                writeln!(out, "HSK {level}            : {count}")?;
            }
            Ok(())
        }
    }
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)
}
