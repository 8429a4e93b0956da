use std::io::{self, BufWriter};

use analysis::{AnalyzerHandle, ContentAnalyzer};
use anyhow::Result;
use clap::Parser;
use common::logging;
use scan::Cli;
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    logging::init_logging(&config.logging);

    let handle = AnalyzerHandle::new(config.analyzer.clone());
    let analyzer = handle.current();
    info!(
        backend = %analyzer.backend(),
        threshold = analyzer.flag_threshold(),
        dataset_version = analyzer.dataset().version(),
        "scan started"
    );

    let items = if cli.files.is_empty() {
        scan::read_items(io::stdin().lock())?
    } else {
        scan::read_files(&cli.files)?
    };

    let mut out = BufWriter::new(io::stdout().lock());
    let summary = scan::scan(analyzer.as_ref(), &items, &mut out)?;
    drop(out);

    eprintln!("{}", serde_json::to_string(&summary)?);

    if let Some(path) = &config.observability.metrics_path {
        scan::write_metrics(path)?;
        info!(path = %path.display(), "metrics written");
    }
    Ok(())
}
