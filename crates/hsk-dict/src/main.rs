use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use hsk_db::{Dictionary, LoadMode};
use hsk_types::{Entry, LookupKind};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use hsk_dict::render::{
    EntryView, OutputFormat, write_entry, write_matches, write_no_match, write_stats,
};
use hsk_dict::run_shell;

const DEFAULT_DATA_DIR: &str = ".";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser)]
#[command(name = "hskdict")]
#[command(about = "Chinese-Russian dictionary of HSK vocabulary")]
struct Cli {
    /// Directory holding hskwords6.txt and the hskwords1-5.txt level lists
    #[arg(long, env = "HSK_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// How word-list files are read
    #[arg(long, env = "HSK_LOAD_MODE", value_enum)]
    load_mode: Option<ModeArg>,
    /// Print results as JSON, one document per line
    #[arg(long, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Debug)]
enum Commands {
    /// Look up an exact Chinese headword
    Word { headword: String },
    /// List words by pinyin with tone marks
    Pinyin {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// List words by pinyin without tone marks
    Toneless {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// List words by Russian translation term
    Translation {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show corpus and index sizes
    Stats,
    /// Interactive lookup shell (default)
    Shell,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Mmap,
    Owned,
}

#[derive(Debug, Clone)]
struct Config {
    data_dir: PathBuf,
    load_mode: LoadMode,
    format: OutputFormat,
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config(Cli::parse());
    info!("using word lists in {}", config.data_dir.display());
    info!("load mode: {:?}", config.load_mode);

    let start = Instant::now();
    let dict = Dictionary::load_dir(&config.data_dir, config.load_mode)
        .with_context(|| format!("loading word lists from {}", config.data_dir.display()))?;
    info!(
        "dictionary with {} entries loaded in {} ms",
        dict.len(),
        start.elapsed().as_millis()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match config.command {
        Commands::Word { headword } => match dict.lookup_by_headword(&headword) {
            Some(entry) => write_entry(&mut out, config.format, &EntryView::new(entry))?,
            None => write_no_match(&mut out, config.format, &headword)?,
        },
        Commands::Pinyin { query } => {
            print_matches(&mut out, &dict, config.format, LookupKind::Pinyin, &query)?
        }
        Commands::Toneless { query } => print_matches(
            &mut out,
            &dict,
            config.format,
            LookupKind::TonelessPinyin,
            &query,
        )?,
        Commands::Translation { query } => print_matches(
            &mut out,
            &dict,
            config.format,
            LookupKind::Translation,
            &query,
        )?,
        Commands::Stats => write_stats(&mut out, config.format, &dict)?,
        Commands::Shell => {
            let stdin = io::stdin();
            let prompt = stdin.is_terminal();
            run_shell(&dict, stdin.lock(), &mut out, config.format, prompt)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn print_matches<W: Write>(
    out: &mut W,
    dict: &Dictionary,
    format: OutputFormat,
    kind: LookupKind,
    words: &[String],
) -> io::Result<()> {
    let query = words.join(" ");
    let entries: Vec<&Entry> = dict.matches(kind, &query).collect();
    write_matches(out, format, kind, &query, &entries)
}

fn load_config(cli: Cli) -> Config {
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    let load_mode = match cli.load_mode {
        Some(ModeArg::Owned) => LoadMode::Owned,
        Some(ModeArg::Mmap) | None => LoadMode::Mmap,
    };
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    Config {
        data_dir,
        load_mode,
        format,
        command: cli.command.unwrap_or(Commands::Shell),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::WARN);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
