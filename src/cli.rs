//! CLI definitions for OutlineGenie.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// OutlineGenie CLI.
#[derive(Parser)]
#[command(name = "outline-genie")]
#[command(about = "Heading outlines for HTML pages, with a simulated side panel")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (defaults to the user config directory)
    #[arg(short, long, global = true, env = "OUTLINE_GENIE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Print the outline of an HTML file
    Outline {
        /// HTML file to analyze
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// URL the page is loaded under (default: the file's file:// URL)
        #[arg(long)]
        url: Option<String>,
    },

    /// Open the files as tabs and drive a side panel across them
    Panel {
        /// HTML files, opened as tabs one after another
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Outline entry to select on every page (0-based)
        #[arg(long)]
        select: Option<usize>,

        /// Time spent on each page before opening the next one
        #[arg(long)]
        dwell_ms: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}
