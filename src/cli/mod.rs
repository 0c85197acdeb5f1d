use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod analyze;
mod config;
mod demo;
mod info;

pub use config::AnalysisConfig;

/// stacurve - STA Curve Analysis and Feature Extraction
#[derive(Parser)]
#[command(name = "stacurve")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the tasks of a TOML analysis config against its files
    Analyze {
        /// Analysis config file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Write the result table as JSON to this path ('-' for stdout)
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,

        /// Render the curves and tangent overlays to this PNG
        #[cfg(feature = "plot")]
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,
    },

    /// Display information about one measurement CSV
    Info {
        /// Input CSV file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Generate a synthetic STA run and a matching analysis config
    Demo {
        /// Directory the demo files are written to
        #[arg(value_name = "DIR", default_value = "stacurve-demo")]
        dir: PathBuf,
    },
}

impl Cli {
    /// The `-v` count given on the command line
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        #[cfg(feature = "plot")]
        Commands::Analyze { config, json, png } => analyze::run(config, json, png),
        #[cfg(not(feature = "plot"))]
        Commands::Analyze { config, json } => analyze::run(config, json),
        Commands::Info { file } => info::run(file),
        Commands::Demo { dir } => demo::run(dir),
    }
}
