//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::OutputFormat;
use crate::domain::ContentKind;

/// wcb-privacy - Export (and erase) personal data held in WordCamp content.
///
/// Runs the speaker, sponsor and organizer exporters for an email address
/// the way a privacy request would, page by page.
#[derive(Parser, Debug)]
#[command(name = "wcb-privacy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format: markdown, json, or table.
    #[arg(short, long, default_value = "markdown")]
    pub format: String,

    /// Configuration file (defaults to ~/.wcb-privacy/config.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Content database, overriding the configured one.
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered exporters and erasers.
    Exporters,

    /// Export personal data for an email address.
    Export {
        /// Email address of the data subject.
        email: String,

        /// Only run this exporter (wcb_speaker, wcb_sponsor, wcb_organizer).
        #[arg(short, long)]
        kind: Option<ContentKind>,

        /// Fetch a single page from the selected exporter instead of all pages.
        #[arg(short, long, requires = "kind")]
        page: Option<u32>,

        /// Output file path (stdout if not specified).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the erasers for an email address.
    Erase {
        /// Email address of the data subject.
        email: String,

        /// Only run this eraser.
        #[arg(short, long)]
        kind: Option<ContentKind>,
    },

    /// Create the content database and load a JSON fixture into it.
    Import {
        /// Fixture file with `users` and `records`.
        file: PathBuf,
    },

    /// Manage the configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write the default configuration file if none exists.
    Init,
    /// Print the effective configuration.
    Show,
}

impl Cli {
    /// Parse the output format argument.
    pub fn output_format(&self) -> Result<OutputFormat, String> {
        self.format.parse()
    }
}
