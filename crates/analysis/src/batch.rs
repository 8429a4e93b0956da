use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analyzer::ContentAnalyzer;
use crate::intent::Intent;
use crate::result::AnalysisResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub flagged: usize,
    pub average_score: f64,
    pub max_score: u8,
    pub intents: BTreeMap<Intent, usize>,
}

impl BatchSummary {
    pub fn from_results(results: &[AnalysisResult]) -> Self {
        let mut summary = Self::default();
        let mut score_sum = 0u64;
        for result in results {
            summary.total += 1;
            if result.is_flagged {
                summary.flagged += 1;
            }
            score_sum += u64::from(result.suspicion_score);
            summary.max_score = summary.max_score.max(result.suspicion_score);
            *summary.intents.entry(result.intent).or_insert(0) += 1;
        }
        if summary.total > 0 {
            summary.average_score = score_sum as f64 / summary.total as f64;
        }
        summary
    }

    pub fn flagged_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.flagged as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub results: Vec<AnalysisResult>,
    pub summary: BatchSummary,
}

pub fn analyze_batch<I, S>(analyzer: &dyn ContentAnalyzer, texts: I) -> BatchReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let results: Vec<AnalysisResult> = texts
        .into_iter()
        .map(|text| analyzer.analyze(text.as_ref()))
        .collect();
    let summary = BatchSummary::from_results(&results);
    BatchReport { results, summary }
}
