//! Line-level parsing of word-list records.
//!
//! A record looks like
//! `<seq> <headword> <pinyin…> <translations…> [<examples…>]` and is split
//! into fields by a small state machine that only inspects the first
//! character of each token. [`ParseState::advance`] is the whole transition
//! table; [`parse_record`] just drives it over the tokens of one line.

use std::fmt;

use hsk_pinyin::{starts_pinyin, starts_translation};
use hsk_types::{Entry, Level};
use thiserror::Error;

/// Sequence number, headword, at least one syllable and one translation.
pub const MIN_TOKENS: usize = 4;

/// Position of the parser within a record.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ParseState {
    Headword,
    PronunciationStart,
    Pronunciation,
    Translations,
    Examples,
}

/// Entry field a token gets appended to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Field {
    Headword,
    Pronunciation,
    Translations,
    Examples,
}

impl ParseState {
    /// 1-based state number, as reported in incomplete-record errors.
    pub fn number(self) -> u8 {
        match self {
            ParseState::Headword => 1,
            ParseState::PronunciationStart => 2,
            ParseState::Pronunciation => 3,
            ParseState::Translations => 4,
            ParseState::Examples => 5,
        }
    }

    /// Feed one token, returning the next state and the field that receives it.
    ///
    /// `None` means the token is dropped. That only happens for tokens that
    /// fit neither pinyin nor a translation while the pronunciation is
    /// expected or being read.
    pub fn advance(self, token: &str) -> (ParseState, Option<Field>) {
        use ParseState::*;

        match self {
            Headword => (PronunciationStart, Some(Field::Headword)),
            PronunciationStart if starts_pinyin(token) => {
                (Pronunciation, Some(Field::Pronunciation))
            }
            PronunciationStart => (PronunciationStart, None),
            Pronunciation if starts_pinyin(token) => (Pronunciation, Some(Field::Pronunciation)),
            Pronunciation if starts_translation(token) => {
                (Translations, Some(Field::Translations))
            }
            Pronunciation => (Pronunciation, None),
            Translations if starts_translation(token) => {
                (Translations, Some(Field::Translations))
            }
            Translations | Examples => (Examples, Some(Field::Examples)),
        }
    }

    /// Whether a record ending in this state carries translations.
    pub fn is_complete(self) -> bool {
        self >= ParseState::Translations
    }
}

impl fmt::Display for ParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParseState::Headword => "headword",
            ParseState::PronunciationStart => "pronunciation start",
            ParseState::Pronunciation => "pronunciation",
            ParseState::Translations => "translations",
            ParseState::Examples => "examples",
        };
        write!(f, "{} ({name})", self.number())
    }
}

/// A parsed line: the entry plus the sequence number it claimed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// `None` when the first token is not a number.
    pub sequence: Option<u32>,
    pub entry: Entry,
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParseError {
    #[error("record has {tokens} tokens, at least {min} required", min = MIN_TOKENS)]
    MalformedRecord { tokens: usize },
    #[error(
        "record {} ({headword:?}) has no translations, parser stopped in state {state}",
        display_sequence(.sequence)
    )]
    IncompleteRecord {
        sequence: Option<u32>,
        state: ParseState,
        headword: String,
    },
}

pub(crate) fn display_sequence(sequence: &Option<u32>) -> String {
    match sequence {
        Some(n) => n.to_string(),
        None => "<not a number>".to_string(),
    }
}

/// Split a line on spaces and tabs, dropping empty tokens.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split([' ', '\t'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

#[derive(Default)]
struct Fields<'a> {
    headword: Vec<&'a str>,
    pronunciation: Vec<&'a str>,
    translations: Vec<&'a str>,
    examples: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    fn push(&mut self, field: Field, token: &'a str) {
        match field {
            Field::Headword => self.headword.push(token),
            Field::Pronunciation => self.pronunciation.push(token),
            Field::Translations => self.translations.push(token),
            Field::Examples => self.examples.push(token),
        }
    }
}

/// Parse one non-blank line into a [`Record`].
///
/// The entry comes back at [`Level::UNLEVELED`]; the loader decides the
/// final level. Sequence-number checking is also left to the loader.
pub fn parse_record(line: &str) -> Result<Record, ParseError> {
    let tokens = tokenize(line);
    if tokens.len() < MIN_TOKENS {
        return Err(ParseError::MalformedRecord {
            tokens: tokens.len(),
        });
    }

    let sequence = tokens[0].parse::<u32>().ok();
    let mut fields = Fields::default();
    let mut state = ParseState::Headword;
    for token in &tokens[1..] {
        let (next, field) = state.advance(token);
        if let Some(field) = field {
            fields.push(field, token);
        }
        state = next;
    }

    if !state.is_complete() {
        return Err(ParseError::IncompleteRecord {
            sequence,
            state,
            headword: fields.headword.join(" "),
        });
    }

    Ok(Record {
        sequence,
        entry: Entry {
            level: Level::UNLEVELED,
            headword: fields.headword.join(" "),
            pronunciation: fields.pronunciation.join(" "),
            translations: fields.translations.join(" "),
            examples: fields.examples.join(" "),
        },
    })
}
