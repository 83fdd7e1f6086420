//! Reconcile Rust Service
//!
//! Reads an OCR'd scoresheet and the reference rosters, pairs the OCR
//! columns with the reference teams and writes the reconciliation report
//! as JSON.

mod config;
mod confirm;

use crate::config::{Config, ConfirmMode};
use crate::confirm::TerminalConfirmation;
use anyhow::{Context, Result};
use dotenv::dotenv;
use scoresheet_core::{
    AcceptResolverChoice, ConfirmationChannel, JsonReferenceSource, ReconcileConfig, Reconciler,
};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Logs go to stderr, the report to stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Reconcile Rust Service...");

    let args: Vec<String> = env::args().skip(1).collect();
    let config = Config::from_env(&args)?;

    let text = tokio::fs::read_to_string(&config.ocr_text_path)
        .await
        .with_context(|| format!("Failed to read OCR text {}", config.ocr_text_path.display()))?;
    let source = JsonReferenceSource::load(&config.reference_path).with_context(|| {
        format!(
            "Failed to load reference rosters {}",
            config.reference_path.display()
        )
    })?;

    let channel: Box<dyn ConfirmationChannel> = match config.confirm_mode {
        ConfirmMode::Prompt => Box::new(TerminalConfirmation),
        ConfirmMode::Auto => Box::new(AcceptResolverChoice),
    };

    let reconciler = Reconciler::new(ReconcileConfig::from_env());
    let report = reconciler
        .reconcile(&text, config.sheet_type, &source, channel.as_ref())
        .await
        .context("Reconciliation failed")?;

    let json = report.to_json_pretty()?;
    match &config.report_path {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write report {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
