//! Script classification and tone handling for HSK word-list tokens.
//!
//! A word-list line mixes three scripts: Hanzi headwords, pinyin syllables
//! (lowercase Latin plus tone-marked vowels) and Russian translations
//! (Cyrillic, sometimes Latin abbreviations or bracketed notes). The record
//! parser only needs to know which script a token *starts* with, so every
//! predicate here works on a single `char` and has a `starts_*` twin for
//! whole tokens.
//!
//! Tone handling is a fixed table: each of the 24 toned vowels maps to its
//! base vowel, with the four toned `ü` forms collapsing to plain `ü`.
//!
//! # Example
//! ```rust
//! use hsk_pinyin::{normalize_tone, starts_pinyin, starts_translation, toneless_key};
//!
//! assert!(starts_pinyin("nǐ"));
//! assert!(starts_translation("Привет"));
//! assert_eq!(normalize_tone("lǜsè"), "lüse");
//! assert_eq!(toneless_key("nǐ hǎo"), "nihao");
//! ```

/// Tone-marked vowels accepted as pinyin letters, plus the bare `ü`.
pub const TONE_MARKED: [char; 25] = [
    'ā', 'á', 'ǎ', 'à', 'ē', 'é', 'ě', 'è', 'ī', 'í', 'ǐ', 'ì', 'ō', 'ó', 'ǒ', 'ò', 'ū', 'ú',
    'ǔ', 'ù', 'ǖ', 'ǘ', 'ǚ', 'ǜ', 'ü',
];

/// Lowercase ASCII letter or a tone-marked pinyin vowel.
pub fn is_pinyin_letter(c: char) -> bool {
    c.is_ascii_lowercase() || TONE_MARKED.contains(&c)
}

pub fn is_uppercase_latin(c: char) -> bool {
    c.is_ascii_uppercase()
}

/// Basic Russian alphabet in either case, `Ё`/`ё` included.
pub fn is_cyrillic(c: char) -> bool {
    matches!(c, 'А'..='Я' | 'а'..='я' | 'Ё' | 'ё')
}

pub fn is_left_bracket(c: char) -> bool {
    matches!(c, '(' | '[')
}

/// A character that may open a translation fragment.
pub fn is_translation_start(c: char) -> bool {
    is_cyrillic(c) || is_uppercase_latin(c) || is_left_bracket(c)
}

pub fn starts_pinyin(token: &str) -> bool {
    token.chars().next().is_some_and(is_pinyin_letter)
}

pub fn starts_translation(token: &str) -> bool {
    token.chars().next().is_some_and(is_translation_start)
}

/// Map a toned vowel to its base vowel; `None` for every other character.
pub fn base_vowel(c: char) -> Option<char> {
    let base = match c {
        'ā' | 'á' | 'ǎ' | 'à' => 'a',
        'ē' | 'é' | 'ě' | 'è' => 'e',
        'ī' | 'í' | 'ǐ' | 'ì' => 'i',
        'ō' | 'ó' | 'ǒ' | 'ò' => 'o',
        'ū' | 'ú' | 'ǔ' | 'ù' => 'u',
        'ǖ' | 'ǘ' | 'ǚ' | 'ǜ' => 'ü',
        _ => return None,
    };
    Some(base)
}

/// Strip tone marks, leaving every other character untouched.
pub fn normalize_tone(pinyin: &str) -> String {
    pinyin.chars().map(|c| base_vowel(c).unwrap_or(c)).collect()
}

pub fn remove_spaces(text: &str) -> String {
    text.chars().filter(|c| *c != ' ').collect()
}

/// Key used by the toned pinyin table: `"nǐ hǎo"` becomes `"nǐhǎo"`.
pub fn pinyin_key(pinyin: &str) -> String {
    remove_spaces(pinyin)
}

/// Key used by the toneless pinyin table: `"nǐ hǎo"` becomes `"nihao"`.
pub fn toneless_key(pinyin: &str) -> String {
    normalize_tone(&remove_spaces(pinyin))
}
