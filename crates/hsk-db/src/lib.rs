//! Load HSK Chinese–Russian word lists and look words up in them.
//!
//! A dictionary is built from one master list (every word, unleveled) and up
//! to five level lists that tag a subset of those words with HSK levels 1–5.
//! Each list is plain text, one record per line:
//!
//! ```text
//! 1 你好 nǐ hǎo Привет; здравствуйте 你好吗？
//! ```
//!
//! After the master list is loaded the entries never move, and four tables
//! map headwords, pinyin, toneless pinyin and translation terms to entry
//! positions. Level lists only lower the level of words that already exist.
//!
//! # Features
//! - Strict loading: sequence numbers must run `1, 2, 3, …`, every record
//!   needs a translation, and level lists may only name known headwords. The
//!   first bad line aborts the load with a typed [`LoadError`].
//! - Runtime backing choice for files: [`LoadMode::Mmap`] or
//!   [`LoadMode::Owned`].
//! - Round-robin paging through multiple matches with a caller-owned
//!   [`LookupSession`].
//!
//! # Example
//! ```no_run
//! use hsk_db::{Dictionary, LoadMode, LookupSession};
//! use hsk_types::LookupKind;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dict = Dictionary::load_dir("/path/to/hsk", LoadMode::Mmap)?;
//! for entry in dict.matches(LookupKind::TonelessPinyin, "shi") {
//!     println!("{} [{}] HSK {}", entry.headword, entry.pronunciation, entry.level);
//! }
//!
//! // Repeating a query through a session steps to the next match.
//! let mut session = LookupSession::new();
//! let first = session.lookup_by_toneless_pinyin(&dict, "shi");
//! let second = session.lookup_by_toneless_pinyin(&dict, "shi");
//! assert_ne!(first, second);
//! # Ok(()) }
//! ```

mod index;
pub mod parser;
pub mod session;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hsk_types::{Entry, Level, LookupKind};
use memmap2::Mmap;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::index::Indexes;
pub use crate::index::query_key;
use crate::parser::{ParseError, ParseState, display_sequence, parse_record};
pub use crate::session::{Hit, LookupSession};

/// Master list holding every word of the dictionary.
pub const PRIMARY_FILE: &str = "hskwords6.txt";

/// File name of the word list for one HSK level, e.g. `hskwords3.txt`.
pub fn level_file_name(level: Level) -> String {
    format!("hskwords{level}.txt")
}

/// Strategy for reading word-list files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map each file.
    Mmap,
    /// Read each file into an owned buffer (portable fallback).
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// Where the master list and the level lists live on disk.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceFiles {
    pub primary: PathBuf,
    /// Level lists in load order.
    pub supplements: Vec<(Level, PathBuf)>,
}

impl SourceFiles {
    /// The standard layout: `hskwords6.txt` plus `hskwords1.txt` … `hskwords5.txt`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            primary: dir.join(PRIMARY_FILE),
            supplements: Level::all()
                .filter(|level| !level.is_unleveled())
                .map(|level| (level, dir.join(level_file_name(level))))
                .collect(),
        }
    }
}

/// Fatal problems found while loading one word list.
///
/// `line` is the 1-based line number within the source text, blank lines
/// included.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum LoadError {
    #[error("line {line}: record has {tokens} tokens, at least {min} required", min = parser::MIN_TOKENS)]
    MalformedRecord { line: usize, tokens: usize },
    #[error(
        "line {line}: record {} ({headword:?}) has no translations, parser stopped in state {state}",
        display_sequence(.sequence)
    )]
    IncompleteRecord {
        line: usize,
        sequence: Option<u32>,
        state: ParseState,
        headword: String,
    },
    #[error(
        "line {line}: expected record number {expected}, found {} ({headword:?})",
        display_sequence(.found)
    )]
    SequenceError {
        line: usize,
        expected: u32,
        found: Option<u32>,
        headword: String,
    },
    #[error(
        "line {line}: record {sequence} of the level {level} list names {headword:?}, which is not in the master list"
    )]
    UnknownHeadword {
        line: usize,
        sequence: u32,
        headword: String,
        level: Level,
    },
}

impl LoadError {
    fn from_parse(line: usize, err: ParseError) -> Self {
        match err {
            ParseError::MalformedRecord { tokens } => LoadError::MalformedRecord { line, tokens },
            ParseError::IncompleteRecord {
                sequence,
                state,
                headword,
            } => LoadError::IncompleteRecord {
                line,
                sequence,
                state,
                headword,
            },
        }
    }

    /// Line of the source text that caused the error.
    pub fn line(&self) -> usize {
        match self {
            LoadError::MalformedRecord { line, .. }
            | LoadError::IncompleteRecord { line, .. }
            | LoadError::SequenceError { line, .. }
            | LoadError::UnknownHeadword { line, .. } => *line,
        }
    }
}

/// A validated record together with where it came from.
struct SourceRecord {
    line: usize,
    sequence: u32,
    entry: Entry,
}

/// Parse non-blank lines one at a time, checking that sequence numbers run
/// 1, 2, 3, …. Callers stop at the first error.
fn source_records(text: &str) -> impl Iterator<Item = Result<SourceRecord, LoadError>> + '_ {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut expected = 1u32;

    text.lines()
        .enumerate()
        .filter(|(_, raw)| !raw.trim().is_empty())
        .map(move |(lineno, raw)| {
            let line = lineno + 1;
            let record = parse_record(raw).map_err(|err| LoadError::from_parse(line, err))?;
            if record.sequence != Some(expected) {
                return Err(LoadError::SequenceError {
                    line,
                    expected,
                    found: record.sequence,
                    headword: record.entry.headword,
                });
            }
            let sequence = expected;
            expected += 1;
            Ok(SourceRecord {
                line,
                sequence,
                entry: record.entry,
            })
        })
}

/// In-memory dictionary: the entries plus lookup tables over them.
#[derive(Debug, Clone)]
pub struct Dictionary {
    entries: Vec<Entry>,
    indexes: Indexes,
}

impl Dictionary {
    /// Build a dictionary from the text of the master list.
    ///
    /// Every entry starts at [`Level::UNLEVELED`].
    pub fn load_primary(text: &str) -> Result<Self, LoadError> {
        let entries = source_records(text)
            .map(|record| {
                record.map(|record| Entry {
                    level: Level::UNLEVELED,
                    ..record.entry
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        info!("loaded {} entries from the master list", entries.len());

        let indexes = Indexes::build(&entries);
        Ok(Self { entries, indexes })
    }

    /// Merge a level list into the dictionary.
    ///
    /// Each named headword ends up at `min(current level, level)`. Lines are
    /// checked in order and the first bad one is reported; levels change only
    /// once the whole text is valid, so on error the dictionary is unchanged.
    pub fn load_supplement(&mut self, text: &str, level: Level) -> Result<(), LoadError> {
        let mut positions = Vec::new();
        for record in source_records(text) {
            let record = record?;
            let Some(pos) = self.indexes.headword(&record.entry.headword) else {
                return Err(LoadError::UnknownHeadword {
                    line: record.line,
                    sequence: record.sequence,
                    headword: record.entry.headword,
                    level,
                });
            };
            positions.push(pos);
        }

        let mut lowered = 0usize;
        for pos in &positions {
            let entry = &mut self.entries[*pos];
            if level < entry.level {
                debug!(
                    "{} moves from level {} to level {level}",
                    entry.headword, entry.level
                );
                entry.level = level;
                lowered += 1;
            }
        }
        info!(
            "level {level} list: {} words, {lowered} levels lowered",
            positions.len()
        );
        Ok(())
    }

    /// Load `hskwords6.txt` and any of `hskwords1.txt` … `hskwords5.txt`
    /// found in `dir`.
    pub fn load_dir(dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        Self::load_files(&SourceFiles::in_dir(dir), mode)
    }

    /// Load the master list (required) and then each level list that exists.
    ///
    /// Errors carry the file name as context; the underlying [`LoadError`] is
    /// available through `anyhow::Error::downcast_ref`.
    pub fn load_files(files: &SourceFiles, mode: LoadMode) -> Result<Self> {
        let primary = &files.primary;
        if !primary.exists() {
            anyhow::bail!("missing master word list: {}", primary.display());
        }
        let buffer = load_file(primary, mode)?;
        let mut dict = Self::load_primary(source_text(&buffer, primary)?)
            .with_context(|| format!("load {}", primary.display()))?;

        for (level, path) in &files.supplements {
            let Some(buffer) = load_optional_file(path, mode)? else {
                warn!("level {level} list {} not found, skipping", path.display());
                continue;
            };
            dict.load_supplement(source_text(&buffer, path)?, *level)
                .with_context(|| format!("load {}", path.display()))?;
        }

        Ok(dict)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in corpus order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entry at a corpus position.
    pub fn entry(&self, position: usize) -> Option<&Entry> {
        self.entries.get(position)
    }

    /// Exact headword lookup.
    pub fn lookup_by_headword(&self, word: &str) -> Option<&Entry> {
        self.indexes
            .headword(word)
            .and_then(|pos| self.entries.get(pos))
    }

    /// Corpus positions matching `query` for the given table, or an empty slice.
    ///
    /// The query is normalized the way the table keys are (see [`query_key`]).
    pub fn positions(&self, kind: LookupKind, query: &str) -> &[usize] {
        self.indexes.positions(kind, &query_key(kind, query))
    }

    /// Every entry matching `query`, in corpus order.
    pub fn matches(&self, kind: LookupKind, query: &str) -> impl Iterator<Item = &Entry> + '_ {
        self.positions(kind, query)
            .iter()
            .filter_map(|pos| self.entries.get(*pos))
    }

    /// Number of distinct headwords.
    pub fn headword_count(&self) -> usize {
        self.indexes.headword_count()
    }

    /// Number of distinct keys in the table for `kind`.
    pub fn key_count(&self, kind: LookupKind) -> usize {
        self.indexes.key_count(kind)
    }

    /// How many entries sit at each level, ascending.
    pub fn level_counts(&self) -> Vec<(Level, usize)> {
        Level::all()
            .map(|level| {
                let count = self.entries.iter().filter(|e| e.level == level).count();
                (level, count)
            })
            .collect()
    }
}

fn load_file(path: &Path, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}

fn load_optional_file(path: &Path, mode: LoadMode) -> Result<Option<Buffer>> {
    if !path.exists() {
        return Ok(None);
    }
    load_file(path, mode).map(Some)
}

fn source_text<'a>(buffer: &'a Buffer, path: &Path) -> Result<&'a str> {
    std::str::from_utf8(buffer.as_slice())
        .with_context(|| format!("{} is not valid UTF-8", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = "\
1 你好 nǐ hǎo Привет; здравствуйте 你好吗？

2 谢谢 xièxie Спасибо
3 再见 zàijiàn До свидания
";

    fn level(n: u8) -> Level {
        Level::new(n).unwrap()
    }

    #[test]
    fn primary_entries_start_unleveled() {
        let dict = Dictionary::load_primary(MASTER).unwrap();
        assert_eq!(dict.len(), 3);
        assert!(dict.entries().iter().all(|e| e.level == Level::UNLEVELED));
        assert_eq!(dict.entry(1).unwrap().headword, "谢谢");
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let dict = Dictionary::load_primary("\u{feff}1 好 hǎo хорошо\n").unwrap();
        assert_eq!(dict.lookup_by_headword("好").unwrap().translations, "хорошо");
    }

    #[test]
    fn sequence_numbers_must_not_skip() {
        let err = Dictionary::load_primary("1 好 hǎo хорошо\n3 人 rén человек\n").unwrap_err();
        assert_eq!(
            err,
            LoadError::SequenceError {
                line: 2,
                expected: 2,
                found: Some(3),
                headword: "人".into(),
            }
        );
    }

    #[test]
    fn sequence_numbers_must_be_numbers() {
        let err = Dictionary::load_primary("один 好 hǎo хорошо\n").unwrap_err();
        assert!(matches!(err, LoadError::SequenceError { found: None, .. }));
        assert!(err.to_string().contains("<not a number>"));
    }

    #[test]
    fn parse_errors_report_their_line() {
        let err = Dictionary::load_primary("1 好 hǎo хорошо\n\n2 人 rén\n").unwrap_err();
        assert_eq!(err, LoadError::MalformedRecord { line: 3, tokens: 3 });
        assert_eq!(err.line(), 3);

        let err = Dictionary::load_primary("1 人 rén 12 34\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::IncompleteRecord {
                line: 1,
                sequence: Some(1),
                state: ParseState::Pronunciation,
                ..
            }
        ));
    }

    #[test]
    fn supplements_lower_levels_only() {
        let mut dict = Dictionary::load_primary(MASTER).unwrap();
        dict.load_supplement("1 谢谢 xièxie Спасибо\n", level(3)).unwrap();
        dict.load_supplement("1 谢谢 xièxie Спасибо\n", level(5)).unwrap();
        dict.load_supplement("1 你好 nǐ hǎo Привет\n2 谢谢 xièxie Спасибо\n", level(1))
            .unwrap();
        assert_eq!(dict.lookup_by_headword("你好").unwrap().level, level(1));
        assert_eq!(dict.lookup_by_headword("谢谢").unwrap().level, level(1));
        assert_eq!(dict.lookup_by_headword("再见").unwrap().level, Level::UNLEVELED);
    }

    #[test]
    fn failed_supplement_changes_nothing() {
        let mut dict = Dictionary::load_primary(MASTER).unwrap();
        let err = dict
            .load_supplement("1 你好 nǐ hǎo Привет\n2 猫 māo кошка\n", level(2))
            .unwrap_err();
        assert_eq!(
            err,
            LoadError::UnknownHeadword {
                line: 2,
                sequence: 2,
                headword: "猫".into(),
                level: level(2),
            }
        );
        assert!(dict.entries().iter().all(|e| e.level == Level::UNLEVELED));
    }

    #[test]
    fn unknown_headword_is_reported_before_later_bad_lines() {
        let mut dict = Dictionary::load_primary(MASTER).unwrap();
        let unknown = |line| LoadError::UnknownHeadword {
            line,
            sequence: 1,
            headword: "猫".into(),
            level: level(1),
        };

        let err = dict
            .load_supplement("1 猫 māo кошка
2 人 rén
", level(1))
            .unwrap_err();
        assert_eq!(err, unknown(1));

        let err = dict
            .load_supplement("1 猫 māo кошка
5 你好 nǐ hǎo Привет
", level(1))
            .unwrap_err();
        assert_eq!(err, unknown(1));
        assert!(dict.entries().iter().all(|e| e.level == Level::UNLEVELED));
    }

    #[test]
    fn later_bad_line_after_known_headwords_changes_nothing() {
        let mut dict = Dictionary::load_primary(MASTER).unwrap();
        let err = dict
            .load_supplement("1 你好 nǐ hǎo Привет
2 人 rén
", level(1))
            .unwrap_err();
        assert_eq!(err, LoadError::MalformedRecord { line: 2, tokens: 3 });
        assert_eq!(dict.lookup_by_headword("你好").unwrap().level, Level::UNLEVELED);
    }

    #[test]
    fn matches_are_listed_in_corpus_order() {
        let dict = Dictionary::load_primary(
            "1 是 shì быть\n2 事 shì дело\n3 十 shí десять\n4 时 shí время\n",
        )
        .unwrap();
        let toneless: Vec<_> = dict
            .matches(LookupKind::TonelessPinyin, "shi")
            .map(|e| e.headword.as_str())
            .collect();
        assert_eq!(toneless, ["是", "事", "十", "时"]);
        let toned: Vec<_> = dict
            .matches(LookupKind::Pinyin, "shí")
            .map(|e| e.headword.as_str())
            .collect();
        assert_eq!(toned, ["十", "时"]);
        assert_eq!(dict.matches(LookupKind::Translation, "нет").count(), 0);
    }

    #[test]
    fn level_counts_cover_all_levels() {
        let mut dict = Dictionary::load_primary(MASTER).unwrap();
        dict.load_supplement("1 再见 zàijiàn До свидания\n", level(2)).unwrap();
        let counts = dict.level_counts();
        assert_eq!(counts.len(), 6);
        assert_eq!(counts[1], (level(2), 1));
        assert_eq!(counts[5], (Level::UNLEVELED, 2));
    }

    #[test]
    fn standard_layout_names_six_files() {
        let files = SourceFiles::in_dir("/data");
        assert_eq!(files.primary, Path::new("/data/hskwords6.txt"));
        assert_eq!(files.supplements.len(), 5);
        assert_eq!(files.supplements[0], (level(1), PathBuf::from("/data/hskwords1.txt")));
        assert_eq!(files.supplements[4].1, Path::new("/data/hskwords5.txt"));
    }
}
