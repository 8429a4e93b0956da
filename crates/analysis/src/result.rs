use serde::{Deserialize, Serialize};

use common::AnalyzerBackend;

use crate::enhanced::EnhancedSignals;
use crate::intent::Intent;
use crate::matcher::DrugMatch;
use crate::sentiment::Sentiment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=24 => Self::Low,
            25..=49 => Self::Medium,
            50..=74 => Self::High,
            _ => Self::Critical,
        }
    }
}

/// Diagnostic breakdown. Nothing in here feeds back into scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisData {
    pub drug_matches: Vec<DrugMatch>,
    pub selling_indicators: Vec<String>,
    pub buying_indicators: Vec<String>,
    pub payment_indicators: Vec<String>,
    pub location_indicators: Vec<String>,
    pub urgency_indicators: Vec<String>,
    pub urgency_count: usize,
    pub word_count: usize,
    pub sentence_count: usize,
    pub sentiment: Sentiment,
    pub risk_level: RiskLevel,
    pub score_reasons: Vec<String>,
    pub backend: AnalyzerBackend,
    pub rules_version: String,
    pub dataset_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced: Option<EnhancedSignals>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub matched_keywords: Vec<String>,
    pub suspicion_score: u8,
    pub intent: Intent,
    pub is_flagged: bool,
    pub confidence: f64,
    pub analysis_data: AnalysisData,
    /// Seconds spent in the analysis call.
    pub processing_time: f64,
}

impl AnalysisResult {
    pub fn risk_level(&self) -> RiskLevel {
        self.analysis_data.risk_level
    }
}
