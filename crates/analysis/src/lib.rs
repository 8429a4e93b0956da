pub mod analyzer;
pub mod batch;
pub mod confidence;
pub mod dataset;
pub mod enhanced;
pub mod handle;
pub mod intent;
pub mod matcher;
pub mod metrics;
pub mod result;
pub mod rules;
pub mod sentiment;

pub use analyzer::{BasicAnalyzer, ContentAnalyzer, FLAG_THRESHOLD};
pub use batch::{analyze_batch, BatchReport, BatchSummary};
pub use dataset::{load_dataset, try_load_dataset, CategoryRules, DatasetError, RuleDataset, TermList};
pub use enhanced::{EnhancedAnalyzer, EnhancedSignals};
pub use handle::{build_analyzer, build_analyzer_with, AnalyzerHandle};
pub use intent::Intent;
pub use matcher::{CategorizedHits, DrugMatch, Matcher};
pub use result::{AnalysisData, AnalysisResult, RiskLevel};
pub use rules::{RuleEngine, RuleOutcome};
pub use sentiment::Sentiment;
