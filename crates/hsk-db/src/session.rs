//! Caller-owned lookup state for paging through multiple matches.
//!
//! Asking the same question twice in a row means "show me the next one": a
//! [`LookupSession`] remembers the last query per [`LookupKind`] and walks
//! the match list round-robin, wrapping to the first match after the last.
//! A different query starts over at the first match. Each kind keeps its own
//! cursor, so interleaving a pinyin query with a translation query does not
//! disturb either cycle.
//!
//! ```rust
//! use hsk_db::{Dictionary, LookupSession};
//!
//! let dict = Dictionary::load_primary("1 妈 mā мама\n2 马 mǎ лошадь\n").unwrap();
//! let mut session = LookupSession::new();
//! let first = session.lookup_by_toneless_pinyin(&dict, "ma").unwrap();
//! let second = session.lookup_by_toneless_pinyin(&dict, "ma").unwrap();
//! let third = session.lookup_by_toneless_pinyin(&dict, "ma").unwrap();
//! assert_eq!((first.headword.as_str(), second.headword.as_str()), ("妈", "马"));
//! assert_eq!(third, first);
//! ```

use hsk_types::{Entry, LookupKind};

use crate::Dictionary;

#[derive(Debug, Clone, Default)]
struct Cycle {
    last_query: Option<String>,
    index: usize,
}

impl Cycle {
    /// Move the cursor for `query` over a match list of `len` items.
    fn advance(&mut self, query: &str, len: usize) -> Option<usize> {
        if self.last_query.as_deref() == Some(query) {
            self.index += 1;
            if len == 0 {
                self.index = 0;
                return None;
            }
            self.index %= len;
        } else {
            self.last_query = Some(query.to_string());
            self.index = 0;
            if len == 0 {
                return None;
            }
        }
        Some(self.index)
    }
}

/// One step of a cycling lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit<'a> {
    pub entry: &'a Entry,
    /// Position of the entry in the corpus.
    pub position: usize,
    /// 1-based rank of this match among all matches for the query.
    pub rank: usize,
    pub total: usize,
}

/// Per-caller cycling state for the pinyin, toneless pinyin and translation lookups.
#[derive(Debug, Clone, Default)]
pub struct LookupSession {
    pinyin: Cycle,
    toneless: Cycle,
    translation: Cycle,
}

impl LookupSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact headword lookup. Stateless; provided here so front ends can
    /// route every query through the session.
    pub fn lookup_by_headword<'d>(&self, dict: &'d Dictionary, word: &str) -> Option<&'d Entry> {
        dict.lookup_by_headword(word)
    }

    pub fn lookup_by_pinyin<'d>(&mut self, dict: &'d Dictionary, query: &str) -> Option<&'d Entry> {
        self.lookup(dict, LookupKind::Pinyin, query)
            .map(|hit| hit.entry)
    }

    pub fn lookup_by_toneless_pinyin<'d>(
        &mut self,
        dict: &'d Dictionary,
        query: &str,
    ) -> Option<&'d Entry> {
        self.lookup(dict, LookupKind::TonelessPinyin, query)
            .map(|hit| hit.entry)
    }

    pub fn lookup_by_translation<'d>(
        &mut self,
        dict: &'d Dictionary,
        query: &str,
    ) -> Option<&'d Entry> {
        self.lookup(dict, LookupKind::Translation, query)
            .map(|hit| hit.entry)
    }

    /// Cycling lookup with rank information.
    ///
    /// Query strings are compared verbatim when deciding whether this is a
    /// repeat; normalization only applies to the table lookup.
    pub fn lookup<'d>(
        &mut self,
        dict: &'d Dictionary,
        kind: LookupKind,
        query: &str,
    ) -> Option<Hit<'d>> {
        let positions = dict.positions(kind, query);
        let index = self.cycle_mut(kind).advance(query, positions.len())?;
        let position = positions[index];
        let entry = dict.entry(position)?;
        Some(Hit {
            entry,
            position,
            rank: index + 1,
            total: positions.len(),
        })
    }

    /// Last query seen for `kind`, if any.
    pub fn last_query(&self, kind: LookupKind) -> Option<&str> {
        self.cycle(kind).last_query.as_deref()
    }

    /// Forget every remembered query.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn cycle(&self, kind: LookupKind) -> &Cycle {
        match kind {
            LookupKind::Pinyin => &self.pinyin,
            LookupKind::TonelessPinyin => &self.toneless,
            LookupKind::Translation => &self.translation,
        }
    }

    fn cycle_mut(&mut self, kind: LookupKind) -> &mut Cycle {
        match kind {
            LookupKind::Pinyin => &mut self.pinyin,
            LookupKind::TonelessPinyin => &mut self.toneless,
            LookupKind::Translation => &mut self.translation,
        }
    }
}
