//! Shared types that mirror the HSK word-list record format.
//!
//! Each line of a word list becomes one [`Entry`]: the Chinese headword, its
//! pinyin, the Russian translations and optional usage examples, tagged with
//! the most basic HSK [`Level`] it appears in. [`LookupKind`] names the three
//! many-to-one lookup tables built over a corpus of entries.
//!
//! ```rust
//! use hsk_types::{Entry, Level};
//!
//! let entry = Entry {
//!     level: Level::UNLEVELED,
//!     headword: "你好".into(),
//!     pronunciation: "nǐ hǎo".into(),
//!     translations: "Привет; здравствуйте".into(),
//!     examples: String::new(),
//! };
//! let terms: Vec<_> = entry.translation_terms().collect();
//! assert_eq!(terms, ["Привет", "здравствуйте"]);
//! assert_eq!(Level::new(3).map(Level::get), Some(3));
//! ```

use std::fmt;

/// HSK proficiency level, 1 (most basic) through 6 (unleveled master list).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(1);
    /// Level given to every word of the master list before level lists are merged.
    pub const UNLEVELED: Level = Level(6);

    /// Wrap a raw level number, rejecting anything outside `1..=6`.
    pub fn new(raw: u8) -> Option<Self> {
        (Self::MIN.0..=Self::UNLEVELED.0)
            .contains(&raw)
            .then_some(Level(raw))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_unleveled(self) -> bool {
        self == Self::UNLEVELED
    }

    /// All levels in ascending order.
    pub fn all() -> impl Iterator<Item = Level> {
        (Self::MIN.0..=Self::UNLEVELED.0).map(Level)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::UNLEVELED
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One parsed dictionary record.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Entry {
    pub level: Level,
    pub headword: String,
    /// Space-separated pinyin syllables, tone marks kept.
    pub pronunciation: String,
    /// Translation fragments separated by `,` or `;`.
    pub translations: String,
    pub examples: String,
}

impl Entry {
    /// Individual translation terms as used for reverse lookup.
    ///
    /// Commas and semicolons both separate terms; fragments are trimmed and
    /// empty ones skipped.
    pub fn translation_terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.translations
            .split([',', ';'])
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// The lookup tables that map one key to many entries.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LookupKind {
    /// Pinyin with tone marks, spaces removed.
    Pinyin,
    /// Pinyin with tone marks stripped and spaces removed.
    TonelessPinyin,
    /// A single translation term.
    Translation,
}

impl LookupKind {
    pub const ALL: [LookupKind; 3] = [
        LookupKind::Pinyin,
        LookupKind::TonelessPinyin,
        LookupKind::Translation,
    ];
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LookupKind::Pinyin => "pinyin",
            LookupKind::TonelessPinyin => "toneless pinyin",
            LookupKind::Translation => "translation",
        })
    }
}
