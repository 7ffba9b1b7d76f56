pub mod render;
pub mod shell;

pub use render::{EntryView, OutputFormat};
pub use shell::{Command, CommandError, HELP, parse_command, run_shell};
