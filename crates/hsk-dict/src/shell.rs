//! Interactive lookup loop.
//!
//! Each input line is one command. Repeating a pinyin, toneless or
//! translation query verbatim shows the next match; the loop keeps one
//! [`LookupSession`] for its whole lifetime.

use std::io::{BufRead, Write};

use anyhow::Result;
use hsk_db::{Dictionary, LookupSession};
use hsk_types::LookupKind;
use thiserror::Error;
use tracing::debug;

use crate::render::{EntryView, OutputFormat, write_entry, write_no_match};

pub const HELP: &str = "\
commands:
  w <headword>       exact Chinese word
  p <pinyin>         pinyin with tone marks (nǐ hǎo)
  t <pinyin>         pinyin without tone marks (ni hao)
  r <translation>    Russian translation term
  reset              forget previous queries
  help               show this text
  quit               leave the shell
repeat a p/t/r query to see the next match; a bare line is looked up as a headword";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// `kind == None` is an exact headword lookup.
    Lookup {
        kind: Option<LookupKind>,
        query: String,
    },
    Reset,
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs a query")]
    MissingQuery(String),
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }
    let (head, rest) = match line.split_once([' ', '\t']) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let kind = match head {
        "w" | "word" => None,
        "p" | "pinyin" => Some(LookupKind::Pinyin),
        "t" | "toneless" => Some(LookupKind::TonelessPinyin),
        "r" | "translation" => Some(LookupKind::Translation),
        "reset" => return Ok(Command::Reset),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        other if other.chars().all(|c| c.is_ascii_alphabetic()) => {
            return Err(CommandError::Unknown(other.to_string()));
        }
        _ => {
            return Ok(Command::Lookup {
                kind: None,
                query: line.to_string(),
            });
        }
    };

    if rest.is_empty() {
        return Err(CommandError::MissingQuery(head.to_string()));
    }
    Ok(Command::Lookup {
        kind,
        query: rest.to_string(),
    })
}

/// Run commands from `input` until it ends or a quit command arrives.
///
/// With `prompt` set, a `> ` prompt is written before each line is read.
pub fn run_shell<R: BufRead, W: Write>(
    dict: &Dictionary,
    input: R,
    mut output: W,
    format: OutputFormat,
    prompt: bool,
) -> Result<()> {
    let mut session = LookupSession::new();
    let mut lines = input.lines();

    loop {
        if prompt {
            write!(output, "> ")?;
            output.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match parse_command(&line) {
            Ok(Command::Empty) => {}
            Ok(Command::Quit) => break,
            Ok(Command::Help) => writeln!(output, "{HELP}")?,
            Ok(Command::Reset) => {
                session.reset();
                debug!("lookup session reset");
            }
            Ok(Command::Lookup { kind: None, query }) => {
                match session.lookup_by_headword(dict, &query) {
                    Some(entry) => write_entry(&mut output, format, &EntryView::new(entry))?,
                    None => write_no_match(&mut output, format, &query)?,
                }
            }
            Ok(Command::Lookup {
                kind: Some(kind),
                query,
            }) => match session.lookup(dict, kind, &query) {
                Some(hit) => write_entry(&mut output, format, &EntryView::from_hit(&hit))?,
                None => write_no_match(&mut output, format, &query)?,
            },
            Err(err) => writeln!(output, "{err}")?,
        }
    }

    output.flush()?;
    Ok(())
}
