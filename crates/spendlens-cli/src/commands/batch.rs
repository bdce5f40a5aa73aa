//! Batch processing command for multiple statement files.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use spendlens_core::statement::{AnchoredStatementParser, ExtractionResult};

use super::load_config;
use super::process::{extract_file, format_parsed, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome of processing a single file.
enum FileOutcome {
    Extracted(ExtractionResult),
    /// Readable, but nothing looked like a transaction.
    NoTransactions,
    Failed(String),
}

struct ProcessResult {
    path: PathBuf,
    outcome: FileOutcome,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt" | "text")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = AnchoredStatementParser::from_config(&config.extraction)?;
    let file_pb = ProgressBar::hidden();
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let outcome = match extract_file(&path, &parser, &config, &file_pb) {
            Ok(result) if result.is_empty() => {
                warn!("No transactions found in {}", path.display());
                FileOutcome::NoTransactions
            }
            Ok(result) => FileOutcome::Extracted(result),
            Err(e) => {
                let error_msg = e.to_string();
                if !args.continue_on_error {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
                warn!("Failed to process {}: {}", path.display(), error_msg);
                FileOutcome::Failed(error_msg)
            }
        };

        results.push(ProcessResult {
            path,
            outcome,
            processing_time_ms: file_start.elapsed().as_millis() as u64,
        });
        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let FileOutcome::Extracted(extraction) = &result.outcome {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("statement");
                let output_path = output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_parsed(extraction, &config, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let extracted = results
        .iter()
        .filter(|r| matches!(r.outcome, FileOutcome::Extracted(_)))
        .count();
    let empty = results
        .iter()
        .filter(|r| matches!(r.outcome, FileOutcome::NoTransactions))
        .count();
    let failed: Vec<_> = results
        .iter()
        .filter_map(|r| match &r.outcome {
            FileOutcome::Failed(e) => Some((r, e)),
            _ => None,
        })
        .collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!("  Extracted: {}", style(extracted).green());
    if empty > 0 {
        println!("  No transactions found: {}", style(empty).yellow());
    }
    if !failed.is_empty() {
        println!("  Failed: {}", style(failed.len()).red());
        for (result, e) in &failed {
            println!("    - {}: {}", result.path.display(), e);
        }
    }

    Ok(())
}

fn write_summary(path: &PathBuf, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "file",
        "status",
        "transactions",
        "discarded",
        "total_amount",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let file = result.path.display().to_string();
        let time = result.processing_time_ms.to_string();

        match &result.outcome {
            FileOutcome::Extracted(extraction) => {
                let total: Decimal = extraction.transactions.iter().map(|t| t.amount).sum();
                wtr.write_record([
                    file,
                    "ok".to_string(),
                    extraction.stats.accepted.to_string(),
                    extraction.stats.discarded.to_string(),
                    total.to_string(),
                    time,
                    String::new(),
                ])?;
            }
            FileOutcome::NoTransactions => {
                wtr.write_record([
                    file,
                    "empty".to_string(),
                    "0".to_string(),
                    String::new(),
                    String::new(),
                    time,
                    String::new(),
                ])?;
            }
            FileOutcome::Failed(e) => {
                wtr.write_record([
                    file,
                    "failed".to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    time,
                    e.clone(),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
