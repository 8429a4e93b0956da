use std::sync::{Arc, PoisonError, RwLock};

use common::{AnalyzerBackend, AnalyzerConfig, AppError};
use tracing::{info, warn};

use crate::analyzer::{BasicAnalyzer, ContentAnalyzer};
use crate::dataset::{load_dataset, try_load_dataset, RuleDataset};
use crate::enhanced::EnhancedAnalyzer;
use crate::result::AnalysisResult;

/// Loads the configured dataset once and builds the configured backend.
pub fn build_analyzer(config: &AnalyzerConfig) -> Arc<dyn ContentAnalyzer> {
    let dataset = match &config.dataset_path {
        Some(path) => Arc::new(load_dataset(path)),
        None => RuleDataset::bundled(),
    };
    build_analyzer_with(config, dataset)
}

pub fn build_analyzer_with(
    config: &AnalyzerConfig,
    dataset: Arc<RuleDataset>,
) -> Arc<dyn ContentAnalyzer> {
    let threshold = config.flag_threshold();
    info!(
        backend = %config.backend,
        threshold,
        dataset_version = dataset.version(),
        fingerprint = %short_fingerprint(&dataset),
        "building content analyzer"
    );
    match config.backend {
        AnalyzerBackend::Basic => Arc::new(BasicAnalyzer::with_threshold(dataset, threshold)),
        AnalyzerBackend::Enhanced => Arc::new(EnhancedAnalyzer::with_threshold(dataset, threshold)),
    }
}

/// Shared entry point for callers that may update the rules at runtime.
///
/// Readers take a snapshot (`Arc` clone) and analyze without holding the lock,
/// so an update never disturbs an analysis already in flight.
pub struct AnalyzerHandle {
    config: AnalyzerConfig,
    current: RwLock<Arc<dyn ContentAnalyzer>>,
}

impl AnalyzerHandle {
    pub fn new(config: AnalyzerConfig) -> Self {
        let analyzer = build_analyzer(&config);
        Self {
            config,
            current: RwLock::new(analyzer),
        }
    }

    pub fn with_dataset(config: AnalyzerConfig, dataset: RuleDataset) -> Self {
        let analyzer = build_analyzer_with(&config, Arc::new(dataset));
        Self {
            config,
            current: RwLock::new(analyzer),
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn current(&self) -> Arc<dyn ContentAnalyzer> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn dataset(&self) -> Arc<RuleDataset> {
        self.current().dataset().clone()
    }

    pub fn analyze(&self, text: &str) -> AnalysisResult {
        self.current().analyze(text)
    }

    /// Re-reads the configured rule file. Unlike startup loading this is
    /// strict: on failure the current analyzer stays in place.
    pub fn reload(&self) -> common::Result<Arc<dyn ContentAnalyzer>> {
        let Some(path) = &self.config.dataset_path else {
            return Ok(self.replace_dataset((*RuleDataset::bundled()).clone()));
        };
        let dataset = try_load_dataset(path).map_err(|err| {
            warn!(error = %err, "rule dataset reload failed, keeping current version");
            AppError::dataset(err)
        })?;
        Ok(self.replace_dataset(dataset))
    }

    pub fn replace_dataset(&self, dataset: RuleDataset) -> Arc<dyn ContentAnalyzer> {
        self.update_dataset(|_| dataset)
    }

    /// Derives the next dataset version from the current one and swaps in a
    /// freshly compiled analyzer. Updates are serialized by the write lock.
    pub fn update_dataset<F>(&self, update: F) -> Arc<dyn ContentAnalyzer>
    where
        F: FnOnce(&RuleDataset) -> RuleDataset,
    {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let next = update(guard.dataset());
        let analyzer = build_analyzer_with(&self.config, Arc::new(next));
        *guard = analyzer.clone();
        analyzer
    }
}

fn short_fingerprint(dataset: &RuleDataset) -> String {
    dataset.fingerprint().chars().take(12).collect()
}
