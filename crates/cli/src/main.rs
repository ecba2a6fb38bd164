// Scholar CLI - reconcile PubMed and Semantic Scholar search results

mod config_cmd;
mod reconcile;

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

use scholar_cli::exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
use scholar_cli::translate_pubmed_to_semantic;

use config_cmd::ConfigCommands;
use reconcile::ReconcileArgs;

#[derive(Parser)]
#[command(name = "scholar")]
#[command(about = "Merge and deduplicate bibliographic search results from two sources")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a PubMed payload with a Semantic Scholar payload
    #[command(after_help = "\
Examples:
  scholar reconcile --pubmed efetch.xml --semantic bulk.json
  scholar reconcile --pubmed efetch.xml --semantic bulk.json --json
  scholar reconcile --pubmed efetch.xml --semantic bulk.json --export results.xlsx
  scholar reconcile --pubmed a.json --semantic b.json --output merged.json")]
    Reconcile(ReconcileArgs),

    /// Rewrite a PubMed query in Semantic Scholar syntax
    #[command(after_help = "\
Examples:
  scholar translate-query 'cancer[Title/Abstract] AND therapy'
  scholar translate-query '(radiotherapy OR \"radiation therapy\")'")]
    TranslateQuery {
        /// PubMed query string
        query: String,
    },

    /// Inspect or validate configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(env!("CARGO_PKG_VERSION"), "\nbuild:   debug")
    } else {
        concat!(env!("CARGO_PKG_VERSION"), "\nbuild:   release")
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    // A second init (tests, embedding) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: scholar <command> [options]");
            eprintln!("       scholar --help for more information");
            Err(CliError::args(""))
        }
        Some(Commands::Reconcile(args)) => reconcile::cmd_reconcile(args),
        Some(Commands::TranslateQuery { query }) => {
            println!("{}", translate_pubmed_to_semantic(&query));
            Ok(())
        }
        Some(Commands::Config(cmd)) => config_cmd::cmd_config(cmd),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    /// Failure with no user-facing cause (a bug, not bad input).
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
