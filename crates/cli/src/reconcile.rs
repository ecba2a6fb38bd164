//! `scholar reconcile`: load both payloads, reconcile, report, export.

use std::path::{Path, PathBuf};

use clap::Args;

use scholar_cli::exit_codes::{io_exit_code, service_exit_code, EXIT_CONFIG, EXIT_EXPORT};
use scholar_cli::{SearchResponse, SearchService};
use scholar_config::{ExportFormat, ScholarConfig};
use scholar_io::{load_records, IoError, SourceFormat};

use crate::CliError;

#[derive(Args)]
pub struct ReconcileArgs {
    /// PubMed payload (efetch XML or records JSON)
    #[arg(long, value_name = "FILE")]
    pubmed: PathBuf,

    /// Semantic Scholar payload (bulk-search JSON or records JSON)
    #[arg(long, value_name = "FILE")]
    semantic: PathBuf,

    /// Override format detection for --pubmed
    #[arg(long, value_name = "FORMAT")]
    pubmed_format: Option<SourceFormat>,

    /// Override format detection for --semantic
    #[arg(long, value_name = "FORMAT")]
    semantic_format: Option<SourceFormat>,

    /// Config file (default: ~/.config/scholar/config.toml)
    #[arg(long, env = "SCHOLAR_CONFIG")]
    config: Option<PathBuf>,

    /// Output JSON to stdout
    #[arg(long)]
    json: bool,

    /// Write JSON output to file
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Export the deduplicated records (.xlsx or .csv)
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,
}

fn io_err(e: IoError) -> CliError {
    CliError::new(io_exit_code(&e), e.to_string())
}

pub fn cmd_reconcile(args: ReconcileArgs) -> Result<(), CliError> {
    let config = ScholarConfig::load(args.config.as_deref()).map_err(|e| {
        CliError::new(EXIT_CONFIG, e.to_string()).with_hint("check with `scholar config validate`")
    })?;

    let export_format = match &args.export {
        Some(path) => Some(export_format_for(path, config.export.format)?),
        None => None,
    };

    let pubmed = load_records(&args.pubmed, args.pubmed_format).map_err(io_err)?;
    let semantic = load_records(&args.semantic, args.semantic_format).map_err(io_err)?;

    let service = SearchService::new(&config);
    let response = service.search(pubmed, semantic);

    let json_str = serde_json::to_string_pretty(&response)
        .map_err(|e| CliError::internal(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::new(EXIT_EXPORT, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        println!("{json_str}");
    }

    if let (Some(path), Some(format)) = (&args.export, export_format) {
        let bytes = service
            .export(&response.search_id, Some(format))
            .map_err(|e| CliError::new(service_exit_code(&e), e.to_string()))?;
        std::fs::write(path, &bytes).map_err(|e| {
            io_err(IoError::Write {
                path: path.clone(),
                message: e.to_string(),
            })
        })?;
        eprintln!("exported {} rows to {}", response.papers.len(), path.display());
    }

    // Human summary to stderr
    eprintln!("{}", summary_line(&response, &config));
    Ok(())
}

/// Export format from the file extension, else the configured default.
/// An extension naming neither format is a usage error.
fn export_format_for(path: &Path, fallback: ExportFormat) -> Result<ExportFormat, CliError> {
    match path.extension() {
        None => Ok(fallback),
        Some(_) => ExportFormat::from_path(path).ok_or_else(|| {
            CliError::args(format!("cannot export to '{}'", path.display()))
                .with_hint("use a .xlsx or .csv file name")
        }),
    }
}

fn summary_line(response: &SearchResponse, config: &ScholarConfig) -> String {
    format!(
        "{} {} + {} {} -> {} papers: {} unique to {}, {} unique to {}, {} duplicates",
        response.pubmed_results,
        config.sources.left_label,
        response.semantic_scholar_results,
        config.sources.right_label,
        response.papers.len(),
        response.unique_to_pubmed,
        config.sources.left_label,
        response.unique_to_semantic,
        config.sources.right_label,
        response.duplicate_count,
    )
}
