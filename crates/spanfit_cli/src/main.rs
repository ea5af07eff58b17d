//! Spanfit CLI
//!
//! Inspect how markup turns into styled runs, measure heights, run the
//! measure-then-constrain layout and resolve taps from the command line.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::InputArgs;
use crate::config::{Backend, SpanfitConfig};

/// Styled text measurement toolkit
#[derive(Parser, Debug)]
#[command(name = "spanfit")]
#[command(about = "Measure and lay out variable-height styled text")]
#[command(version)]
struct Cli {
    /// Configuration file or directory containing spanfit.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured measurement backend
    #[arg(long, global = true, value_enum)]
    backend: Option<Backend>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// More logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the styled runs produced from the input
    Runs {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Measure the height of the input at a width
    Measure {
        #[command(flatten)]
        input: InputArgs,

        /// Available width in points
        #[arg(short, long)]
        width: f32,

        /// Maximum lines (0 = unlimited, default from config)
        #[arg(short = 'n', long)]
        max_lines: Option<usize>,
    },

    /// Run the two-pass layout in a column of the given width
    Layout {
        #[command(flatten)]
        input: InputArgs,

        /// Lay the text out in a row instead of a column
        #[arg(long)]
        row: bool,

        /// Container width in points
        #[arg(short, long)]
        width: f32,

        /// Maximum lines (0 = unlimited, default from config)
        #[arg(short = 'n', long)]
        max_lines: Option<usize>,
    },

    /// Resolve a tap at a byte offset
    Tap {
        #[command(flatten)]
        input: InputArgs,

        /// Byte offset into the produced text
        #[arg(short, long)]
        at: usize,

        /// Actually open the URL with the system handler
        #[arg(long)]
        open: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = SpanfitConfig::discover(cli.config.as_deref())?;
    if let Some(backend) = cli.backend {
        config.measure.backend = backend;
    }
    tracing::debug!(backend = ?config.measure.backend, "configuration loaded");

    match &cli.command {
        Command::Runs { input } => commands::runs(&config, input, cli.json),
        Command::Measure {
            input,
            width,
            max_lines,
        } => {
            let max_lines = max_lines.unwrap_or(config.measure.max_lines);
            commands::measure(&config, input, *width, max_lines, cli.json)
        }
        Command::Layout {
            input,
            row,
            width,
            max_lines,
        } => {
            let max_lines = max_lines.unwrap_or(config.measure.max_lines);
            commands::layout(&config, input, *width, max_lines, *row, cli.json)
        }
        Command::Tap { input, at, open } => commands::tap(&config, input, *at, *open),
    }
}
