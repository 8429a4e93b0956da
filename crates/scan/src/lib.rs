use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use analysis::{BatchSummary, ContentAnalyzer};
use anyhow::{Context, Result};
use clap::Parser;
use common::AppConfig;
use tracing::{debug, info};
use prometheus::Encoder;

#[derive(Parser, Debug)]
#[command(name = "scan")]
#[command(about = "Scores content items for drug-trafficking signals", long_about = None)]
pub struct Cli {
    /// Input files, one item per non-empty line. Reads stdin when omitted.
    pub files: Vec<PathBuf>,

    /// Directory holding `config/default.*` and `config/local.*`
    #[arg(short, long, default_value = ".")]
    pub config_dir: PathBuf,

    /// Rule dataset file, overriding `analyzer.dataset_path`
    #[arg(short, long, env = "SCAN_DATASET")]
    pub dataset: Option<PathBuf>,

    /// Flag threshold, overriding `analyzer.flag_threshold`
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub threshold: Option<u8>,

    /// Prometheus text output, overriding `observability.metrics_path`
    #[arg(short, long)]
    pub metrics_path: Option<PathBuf>,
}

impl Cli {
    /// Loads the layered config and applies the command-line overrides.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load_from_path(&self.config_dir)?;
        self.apply(&mut config);
        Ok(config)
    }

    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(dataset) = &self.dataset {
            config.analyzer.dataset_path = Some(dataset.clone());
        }
        if let Some(threshold) = self.threshold {
            config.analyzer.flag_threshold = threshold;
        }
        if let Some(path) = &self.metrics_path {
            config.observability.metrics_path = Some(path.clone());
        }
    }
}

/// One content item per non-empty line. Lines are trimmed.
pub fn read_items<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut items = Vec::new();
    for line in reader.lines() {
        let line = line.context("failed to read input line")?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            items.push(trimmed.to_string());
        }
    }
    Ok(items)
}

pub fn read_files(paths: &[PathBuf]) -> Result<Vec<String>> {
    let mut items = Vec::new();
    for path in paths {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let before = items.len();
        items.extend(read_items(raw.as_bytes())?);
        debug!(path = %path.display(), items = items.len() - before, "input file read");
    }
    Ok(items)
}

/// Analyzes every item and writes one JSON result per line to `out`.
pub fn scan<W: Write>(
    analyzer: &dyn ContentAnalyzer,
    items: &[String],
    out: &mut W,
) -> Result<BatchSummary> {
    let mut results = Vec::with_capacity(items.len());
    for item in items {
        let result = analyzer.analyze(item);
        serde_json::to_writer(&mut *out, &result).context("failed to encode result")?;
        out.write_all(b"\n").context("failed to write result")?;
        results.push(result);
    }
    out.flush().context("failed to flush results")?;

    let summary = BatchSummary::from_results(&results);
    info!(
        total = summary.total,
        flagged = summary.flagged,
        average_score = summary.average_score,
        max_score = summary.max_score,
        "scan finished"
    );
    Ok(summary)
}

/// Writes the prometheus text exposition of the process registry.
pub fn write_metrics(path: &Path) -> Result<()> {
    let encoder = prometheus::TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .context("failed to encode metrics")?;
    fs::write(path, buffer).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
