//! Trimview CLI: offline tooling for the trim-range controller.
//!
//! Usage:
//!   trimview replay <SCRIPT>   Replay a recorded pointer stream
//!   trimview config            Show or initialize the configuration file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use trimview_common::config::TrimmerConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "trimview",
    about = "Replay and inspect trim-range interactions",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSONL pointer stream through a virtual timeline
    Replay {
        /// Path to the event script
        script: PathBuf,

        /// Track width (pixels)
        #[arg(long, default_value = "1000")]
        width: f64,

        /// Track height (pixels)
        #[arg(long, default_value = "60")]
        height: f64,

        /// Media duration (ms)
        #[arg(long, default_value = "60000")]
        duration_ms: f64,

        /// Initial selection as LEFT,RIGHT (pixels)
        #[arg(long, value_parser = commands::replay::parse_selection)]
        selection: Option<(f64, f64)>,

        /// Print notifications as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config {
        /// Write the defaults to the configuration file
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file with --init
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = TrimmerConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    trimview_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Replay {
            script,
            width,
            height,
            duration_ms,
            selection,
            json,
        } => commands::replay::run(
            &config,
            script,
            commands::replay::Layout {
                width,
                height,
                duration_ms,
            },
            selection,
            json,
        ),
        Commands::Config { init, force } => commands::config::run(&config, init, force),
    }
}
