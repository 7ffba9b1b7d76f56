use std::collections::HashMap;

use hsk_pinyin::{pinyin_key, toneless_key};
use hsk_types::{Entry, LookupKind};
use tracing::{info, warn};

/// Lookup tables over a loaded corpus. Values are positions into the corpus.
#[derive(Debug, Clone, Default)]
pub(crate) struct Indexes {
    headwords: HashMap<String, usize>,
    pinyin: HashMap<String, Vec<usize>>,
    toneless: HashMap<String, Vec<usize>>,
    translations: HashMap<String, Vec<usize>>,
}

impl Indexes {
    pub(crate) fn build(entries: &[Entry]) -> Self {
        let mut headwords = HashMap::with_capacity(entries.len());
        for (pos, entry) in entries.iter().enumerate() {
            if entry.headword.is_empty() {
                continue;
            }
            if let Some(previous) = headwords.insert(entry.headword.clone(), pos) {
                warn!(
                    "duplicate headword {} at positions {previous} and {pos}, keeping the later one",
                    entry.headword
                );
            }
        }

        let mut toneless: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, entry) in entries.iter().enumerate() {
            if !entry.pronunciation.is_empty() {
                toneless
                    .entry(toneless_key(&entry.pronunciation))
                    .or_default()
                    .push(pos);
            }
        }

        let mut pinyin: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, entry) in entries.iter().enumerate() {
            if !entry.pronunciation.is_empty() {
                pinyin
                    .entry(pinyin_key(&entry.pronunciation))
                    .or_default()
                    .push(pos);
            }
        }

        let mut translations: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, entry) in entries.iter().enumerate() {
            for term in entry.translation_terms() {
                let positions = translations.entry(term.to_string()).or_default();
                // a term repeated within one entry still points at it once
                if positions.last() != Some(&pos) {
                    positions.push(pos);
                }
            }
        }

        info!(
            "indexed {} headwords, {} pinyin keys, {} toneless keys, {} translation terms",
            headwords.len(),
            pinyin.len(),
            toneless.len(),
            translations.len()
        );

        Self {
            headwords,
            pinyin,
            toneless,
            translations,
        }
    }

    pub(crate) fn headword(&self, word: &str) -> Option<usize> {
        self.headwords.get(word).copied()
    }

    pub(crate) fn headword_count(&self) -> usize {
        self.headwords.len()
    }

    /// Positions stored under an already-normalized key.
    pub(crate) fn positions(&self, kind: LookupKind, key: &str) -> &[usize] {
        self.table(kind)
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn key_count(&self, kind: LookupKind) -> usize {
        self.table(kind).len()
    }

    fn table(&self, kind: LookupKind) -> &HashMap<String, Vec<usize>> {
        match kind {
            LookupKind::Pinyin => &self.pinyin,
            LookupKind::TonelessPinyin => &self.toneless,
            LookupKind::Translation => &self.translations,
        }
    }
}

/// Turn a caller's query into the key format of the table for `kind`.
pub fn query_key(kind: LookupKind, query: &str) -> String {
    match kind {
        LookupKind::Pinyin => pinyin_key(query),
        LookupKind::TonelessPinyin => toneless_key(query),
        LookupKind::Translation => query.to_string(),
    }
}
