//! Command-line interface definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Convert uploaded documents into wiki pages.
///
/// Exit code 1 when the upload as a whole failed; per-file problems are
/// reported in the summary.
#[derive(Parser, Debug)]
#[command(name = "wiki-ingest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// RON settings file; `./ingest.ron` is used when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Where log output goes
    #[arg(long, value_enum, global = true)]
    pub log: Option<LogTarget>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a single file into one page
    File {
        path: PathBuf,

        /// Root directory of the page store
        #[arg(long)]
        target: PathBuf,

        /// Page name, optionally with directories (`guides/Setup`)
        #[arg(long)]
        page_name: Option<String>,

        #[arg(long)]
        author: Option<String>,
    },

    /// Convert every supported file under a folder
    Folder {
        dir: PathBuf,

        #[arg(long)]
        target: PathBuf,

        /// Batch label; defaults to the folder name
        #[arg(long)]
        label: Option<String>,

        #[arg(long)]
        author: Option<String>,

        /// Also accept source and config files
        #[arg(long)]
        include_source: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}
