use std::sync::Arc;
use std::time::Instant;

use common::text::{normalize, sentence_count, word_count};
use common::AnalyzerBackend;
use tracing::debug;

use crate::confidence::estimate_confidence;
use crate::dataset::RuleDataset;
use crate::enhanced::EnhancedSignals;
use crate::intent::classify_intent;
use crate::matcher::{CategorizedHits, Matcher};
use crate::metrics;
use crate::result::{AnalysisData, AnalysisResult, RiskLevel};
use crate::rules::RuleEngine;
use crate::sentiment::lexicon_sentiment;

/// Score at or above which content is flagged for analyst review.
pub const FLAG_THRESHOLD: u8 = common::config::DEFAULT_FLAG_THRESHOLD;

/// Text in, structured result out. Implementations hold no per-call state and
/// may be shared across threads.
pub trait ContentAnalyzer: Send + Sync {
    /// Total over all inputs: never panics, always returns a well-formed result.
    fn analyze(&self, text: &str) -> AnalysisResult;

    fn backend(&self) -> AnalyzerBackend;

    fn dataset(&self) -> &Arc<RuleDataset>;

    fn flag_threshold(&self) -> u8;
}

/// Pattern-matching backend. Always available.
pub struct BasicAnalyzer {
    dataset: Arc<RuleDataset>,
    matcher: Matcher,
    engine: RuleEngine,
    flag_threshold: u8,
}

impl BasicAnalyzer {
    pub fn new(dataset: Arc<RuleDataset>) -> Self {
        Self::with_threshold(dataset, FLAG_THRESHOLD)
    }

    pub fn with_threshold(dataset: Arc<RuleDataset>, flag_threshold: u8) -> Self {
        let matcher = Matcher::compile(&dataset);
        metrics::DATASET_TERMS.set(i64::try_from(matcher.term_count()).unwrap_or(i64::MAX));
        Self {
            dataset,
            matcher,
            engine: RuleEngine::default(),
            flag_threshold: flag_threshold.min(crate::rules::MAX_SCORE),
        }
    }

    pub fn bundled() -> Self {
        Self::new(RuleDataset::bundled())
    }

    pub(crate) fn run<F>(&self, text: &str, backend: AnalyzerBackend, enrich: F) -> AnalysisResult
    where
        F: FnOnce(&str, &str) -> Option<EnhancedSignals>,
    {
        let start = Instant::now();

        let normalized = normalize(text);
        let hits = self.matcher.scan(&normalized);
        let outcome = self.engine.evaluate(&hits);
        let intent = classify_intent(&hits);
        let confidence = estimate_confidence(&hits);
        let sentiment = lexicon_sentiment(&normalized);
        let enhanced = enrich(text, &normalized);

        let score = outcome.score;
        let is_flagged = score >= self.flag_threshold;
        let matched_keywords = hits.matched_keywords();
        let urgency_count = hits.urgency_count();
        let CategorizedHits {
            drug_matches,
            selling_indicators,
            buying_indicators,
            payment_indicators,
            location_indicators,
            urgency_indicators,
        } = hits;

        let analysis_data = AnalysisData {
            drug_matches,
            selling_indicators,
            buying_indicators,
            payment_indicators,
            location_indicators,
            urgency_indicators,
            urgency_count,
            word_count: word_count(text),
            sentence_count: sentence_count(text),
            sentiment: sentiment.label,
            risk_level: RiskLevel::from_score(score),
            score_reasons: outcome.reasons,
            backend,
            rules_version: self.engine.version().to_string(),
            dataset_version: self.dataset.version().to_string(),
            enhanced,
        };

        let elapsed = start.elapsed();
        let label = backend.as_str();
        metrics::ANALYSES_TOTAL.with_label_values(&[label]).inc();
        if is_flagged {
            metrics::FLAGGED_TOTAL.with_label_values(&[label]).inc();
        }
        metrics::ANALYSIS_DURATION.observe(elapsed.as_secs_f64());
        debug!(
            backend = label,
            score,
            intent = %intent,
            flagged = is_flagged,
            keywords = matched_keywords.len(),
            "content analyzed"
        );

        AnalysisResult {
            matched_keywords,
            suspicion_score: score,
            intent,
            is_flagged,
            confidence,
            analysis_data,
            processing_time: elapsed.as_secs_f64(),
        }
    }
}

impl ContentAnalyzer for BasicAnalyzer {
    fn analyze(&self, text: &str) -> AnalysisResult {
        self.run(text, AnalyzerBackend::Basic, |_, _| None)
    }

    fn backend(&self) -> AnalyzerBackend {
        AnalyzerBackend::Basic
    }

    fn dataset(&self) -> &Arc<RuleDataset> {
        &self.dataset
    }

    fn flag_threshold(&self) -> u8 {
        self.flag_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::Intent;
    use crate::sentiment::Sentiment;

    #[test]
    fn breakdown_counts_come_from_original_text() {
        let analyzer = BasicAnalyzer::bundled();
        let result = analyzer.analyze("Great stuff.  Call +15551234567 now. Weed\n\navailable");
        let data = &result.analysis_data;
        assert_eq!(data.word_count, 7);
        assert_eq!(data.sentence_count, 3);
        assert_eq!(data.sentiment, Sentiment::Positive);
        assert_eq!(data.backend, AnalyzerBackend::Basic);
        assert_eq!(data.dataset_version, "drug_rules_v1");
        assert!(data.enhanced.is_none());
    }

    #[test]
    fn phone_digits_never_match_terms() {
        let dataset = RuleDataset::empty().with_slang("cannabis", "4204204");
        let analyzer = BasicAnalyzer::new(Arc::new(dataset));
        let result = analyzer.analyze("text 4204204 for details");
        assert!(result.matched_keywords.is_empty());
        assert_eq!(result.suspicion_score, 0);
    }

    #[test]
    fn custom_threshold_moves_the_flag() {
        let strict = BasicAnalyzer::with_threshold(RuleDataset::bundled(), 10);
        let result = strict.analyze("Looking for some good weed in the area.");
        assert_eq!(result.suspicion_score, 9);
        assert!(!result.is_flagged);

        let result = strict.analyze("need weed asap");
        assert_eq!(result.suspicion_score, 14);
        assert!(result.is_flagged);
        assert_eq!(result.intent, Intent::Buying);
    }

    #[test]
    fn emoji_only_message_is_scored() {
        let result = BasicAnalyzer::bundled().analyze("\u{1F48A}\u{1F50C}\u{1F4B5}");
        assert_eq!(result.matched_keywords, vec!["cash", "pills", "plug"]);
        assert_eq!(result.intent, Intent::Selling);
        // pills 12, plug 8, cash 4, selling with payment 15
        assert_eq!(result.suspicion_score, 39);
    }
}
