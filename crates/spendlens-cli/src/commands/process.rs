//! Process command - extract transactions from a single statement file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use spendlens_core::classify::{self, ReplyClassifier};
use spendlens_core::models::config::SpendlensConfig;
use spendlens_core::models::transaction::{ClassifiedTransaction, ParsedTransaction};
use spendlens_core::statement::rules::format_amount;
use spendlens_core::statement::{AnchoredStatementParser, ExtractionResult, ExtractionStats};
use spendlens_core::{extract_statement, FlowSummary, StatementFormat, Summary};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input statement (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Classifier reply (JSON array) to merge with the extracted transactions
    #[arg(long)]
    classification: Option<PathBuf>,

    /// Suggested descriptions (JSON array) to apply when merging
    #[arg(long, requires = "classification")]
    descriptions: Option<PathBuf>,

    /// Batch identifier stored on merged transactions
    #[arg(long, requires = "classification")]
    batch_id: Option<String>,

    /// Print the classifier prompt list instead of transactions
    #[arg(long, conflicts_with = "classification")]
    prompt: bool,

    /// Show extraction statistics
    #[arg(long)]
    show_stats: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text listing
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

#[derive(Serialize)]
struct ParsedReport<'a> {
    transactions: &'a [ParsedTransaction],
    stats: ExtractionStats,
    flow: FlowSummary,
}

#[derive(Serialize)]
struct ClassifiedReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    batch_id: Option<&'a str>,
    transactions: &'a [ClassifiedTransaction],
    summary: Summary,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    let parser = AnchoredStatementParser::from_config(&config.extraction)?;
    let result = extract_file(&args.input, &parser, &config, &pb)?;

    pb.finish_and_clear();

    if result.is_empty() {
        anyhow::bail!(
            "No transactions found in {}. Please check the statement format.",
            args.input.display()
        );
    }

    let output = if args.prompt {
        classify::build_batch_prompt(&result.transactions)
    } else if let Some(reply_path) = &args.classification {
        let classified = classify_result(&args, reply_path, &result, &config)?;
        format_classified(&classified, args.batch_id.as_deref(), args.format)?
    } else {
        format_parsed(&result, &config, args.format)?
    };

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_stats {
        eprintln!();
        eprintln!(
            "{} {} segments, {} transactions, {} discarded",
            style("ℹ").blue(),
            result.stats.segments,
            result.stats.accepted,
            result.stats.discarded
        );
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Read a statement file and run the parser over its text.
pub fn extract_file(
    path: &Path,
    parser: &AnchoredStatementParser,
    config: &SpendlensConfig,
    pb: &ProgressBar,
) -> anyhow::Result<ExtractionResult> {
    let format = StatementFormat::from_path(path)?;

    pb.set_message("Loading statement...");
    pb.set_position(10);
    let data = fs::read(path)?;

    pb.set_message("Extracting transactions...");
    pb.set_position(50);
    let result = extract_statement(&data, format, parser, config)?;

    pb.set_position(100);
    Ok(result)
}

fn classify_result(
    args: &ProcessArgs,
    reply_path: &Path,
    result: &ExtractionResult,
    config: &SpendlensConfig,
) -> anyhow::Result<Vec<ClassifiedTransaction>> {
    let reply = fs::read_to_string(reply_path)?;
    let classifier = ReplyClassifier::new(reply);

    let hints = match &args.descriptions {
        Some(path) => classify::parse_description_hints(&fs::read_to_string(path)?, &result.transactions),
        None => Vec::new(),
    };

    let classified = classify::classify_statement(
        &classifier,
        &result.transactions,
        &hints,
        args.batch_id.as_deref(),
        &config.classification,
    )?;

    if classified.len() < result.transactions.len() {
        eprintln!(
            "{} {} transactions had no classification and were skipped",
            style("⚠").yellow(),
            result.transactions.len() - classified.len()
        );
    }

    Ok(classified)
}

/// Money-out and money-in labels from the first two description rules.
pub fn flow_labels(config: &SpendlensConfig) -> (&str, &str) {
    let rules = &config.extraction.description_rules;
    (
        rules.first().map(|r| r.label.as_str()).unwrap_or("Paid to"),
        rules.get(1).map(|r| r.label.as_str()).unwrap_or("Received from"),
    )
}

pub fn format_parsed(
    result: &ExtractionResult,
    config: &SpendlensConfig,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let (outgoing, incoming) = flow_labels(config);
    let flow = FlowSummary::from_parsed(&result.transactions, outgoing, incoming);

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&ParsedReport {
            transactions: &result.transactions,
            stats: result.stats,
            flow,
        })?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["date", "description", "amount"])?;
            for t in &result.transactions {
                wtr.write_record([
                    t.date.format("%Y-%m-%d %H:%M").to_string(),
                    t.description.clone(),
                    t.amount.to_string(),
                ])?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => {
            let mut output = String::new();
            for t in &result.transactions {
                output.push_str(&format!(
                    "{}  {:<40} {:>14}\n",
                    t.date.format("%Y-%m-%d %H:%M"),
                    t.description,
                    format_amount(t.amount)
                ));
            }
            output.push('\n');
            output.push_str(&format!("Paid:     {:>14}\n", format_amount(flow.paid)));
            output.push_str(&format!("Received: {:>14}\n", format_amount(flow.received)));
            output.push_str(&format!("Other:    {:>14}\n", format_amount(flow.other)));
            Ok(output)
        }
    }
}

fn format_classified(
    transactions: &[ClassifiedTransaction],
    batch_id: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let summary = Summary::from_transactions(transactions);

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&ClassifiedReport {
            batch_id,
            transactions,
            summary,
        })?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record([
                "date",
                "description",
                "amount",
                "category",
                "type",
                "merchant",
                "confidence",
            ])?;
            for t in transactions {
                wtr.write_record([
                    t.date.format("%Y-%m-%d %H:%M").to_string(),
                    t.description.clone(),
                    t.amount.to_string(),
                    t.category.to_string(),
                    t.kind.to_string(),
                    t.merchant.clone(),
                    t.confidence.to_string(),
                ])?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => {
            let mut output = String::new();
            for t in transactions {
                output.push_str(&format!(
                    "{}  {:<32} {:<14} {:<10} {:>14}\n",
                    t.date.format("%Y-%m-%d %H:%M"),
                    t.description,
                    t.category,
                    t.kind,
                    format_amount(t.amount)
                ));
            }
            output.push('\n');
            output.push_str(&format!("Total: {}\n", format_amount(summary.total)));
            for (category, amount) in &summary.by_category {
                output.push_str(&format!("  {:<14} {:>14}\n", category, format_amount(*amount)));
            }
            Ok(output)
        }
    }
}
