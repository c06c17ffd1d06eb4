//! phishnet: classify URLs as phishing or benign.

use anyhow::{Context, Result};
use clap::Parser;
use futures::future::join_all;
use phishnet::{ops::telemetry, Classification, Label, PhishingDetector, Settings};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "phishnet")]
#[command(about = "Phishing URL detector")]
#[command(version)]
struct Cli {
    /// Settings file (JSON); environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Classifier artifact, overrides the configured model path
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Print one JSON object per URL
    #[arg(long)]
    json: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Human-readable logs instead of JSON
    #[arg(long)]
    pretty_logs: bool,

    /// Print Prometheus metrics after classifying
    #[arg(long)]
    metrics: bool,

    /// URLs to classify
    #[arg(required = true)]
    urls: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.pretty_logs {
        telemetry::init_tracing_pretty(&cli.log_level);
    } else {
        telemetry::init_tracing_with_level(&cli.log_level);
    }

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(model) = cli.model {
        settings.model_path = model;
    }

    let detector = PhishingDetector::from_settings(&settings).context("Failed to start detector")?;

    // * Requests share nothing mutable, so every URL runs concurrently
    let results = join_all(cli.urls.iter().map(|url| detector.classify(url))).await;

    for (url, result) in cli.urls.iter().zip(results) {
        match result {
            Ok(classification) => print_classification(&classification, cli.json)?,
            Err(e) => {
                tracing::error!(url = %url, error = %e, "Could not classify URL");
                if cli.json {
                    println!("{}", serde_json::json!({ "url": url, "error": e.to_string() }));
                } else {
                    println!("ERROR     {}  {}", url, e);
                }
            }
        }
    }

    if cli.metrics {
        print!("{}", telemetry::get_metrics_string());
    }

    Ok(())
}

fn print_classification(classification: &Classification, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(classification)?);
        return Ok(());
    }

    let verdict = match classification.label {
        Label::Phishing => "PHISHING",
        Label::Benign => "BENIGN",
    };
    println!("{:<9} {}  {}", verdict, classification.url, classification.vector);
    for diagnostic in &classification.diagnostics {
        println!("          {}", diagnostic);
    }
    Ok(())
}
