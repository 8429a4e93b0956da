use crate::matcher::CategorizedHits;

const PER_INDICATOR: f64 = 0.2;
const MULTI_DRUG_BONUS: f64 = 0.2;
const INTENT_BONUS: f64 = 0.3;

/// Confidence in `[0.0, 1.0]` from how many and how varied the signals are.
pub fn estimate_confidence(hits: &CategorizedHits) -> f64 {
    let total = hits.drug_matches.len()
        + hits.selling_indicators.len()
        + hits.buying_indicators.len();
    if total == 0 {
        return 0.0;
    }

    let mut confidence = (total as f64 * PER_INDICATOR).min(1.0);
    if hits.distinct_drug_keywords() > 1 {
        confidence += MULTI_DRUG_BONUS;
    }
    if !hits.selling_indicators.is_empty() || !hits.buying_indicators.is_empty() {
        confidence += INTENT_BONUS;
    }
    confidence.clamp(0.0, 1.0)
}
