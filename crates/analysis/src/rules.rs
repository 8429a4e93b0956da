use crate::matcher::CategorizedHits;

pub const MAX_SCORE: u8 = 100;

pub const SEVERITY_WEIGHT: u32 = 3;
pub const SELLING_WEIGHT: u32 = 8;
pub const BUYING_WEIGHT: u32 = 3;
pub const PAYMENT_WEIGHT: u32 = 4;
pub const LOCATION_WEIGHT: u32 = 3;
pub const URGENCY_WEIGHT: u32 = 5;

pub const MULTI_CATEGORY_BONUS: u32 = 10;
pub const SELLING_PAYMENT_BONUS: u32 = 15;
pub const LOCATION_INTENT_BONUS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub score: u8,
    /// Raw total before clamping to `0..=MAX_SCORE`.
    pub raw_total: u32,
    pub reasons: Vec<String>,
}

impl Default for RuleOutcome {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleOutcome {
    pub fn new() -> Self {
        Self {
            score: 0,
            raw_total: 0,
            reasons: Vec::new(),
        }
    }

    fn push(&mut self, delta: u32, reason: impl Into<String>) {
        if delta == 0 {
            return;
        }
        self.raw_total = self.raw_total.saturating_add(delta);
        self.reasons.push(reason.into());
    }

    fn finish(mut self) -> Self {
        self.score = self.raw_total.min(u32::from(MAX_SCORE)) as u8;
        self
    }
}

/// Weighted rules turning categorized hits into a 0..=100 suspicion score.
pub struct RuleEngine {
    version: &'static str,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self {
            version: "suspicion_rules_v1",
        }
    }
}

impl RuleEngine {
    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn evaluate(&self, hits: &CategorizedHits) -> RuleOutcome {
        let mut outcome = RuleOutcome::new();

        for hit in &hits.drug_matches {
            outcome.push(
                u32::from(hit.severity).saturating_mul(SEVERITY_WEIGHT),
                format!("drug:{}:{}", hit.category, hit.keyword),
            );
        }

        let selling = count(&hits.selling_indicators);
        let buying = count(&hits.buying_indicators);
        let payment = count(&hits.payment_indicators);
        let location = count(&hits.location_indicators);
        let urgency = count(&hits.urgency_indicators);

        outcome.push(selling.saturating_mul(SELLING_WEIGHT), "selling_intent");
        outcome.push(buying.saturating_mul(BUYING_WEIGHT), "buying_intent");
        outcome.push(payment.saturating_mul(PAYMENT_WEIGHT), "payment_terms");
        outcome.push(location.saturating_mul(LOCATION_WEIGHT), "location_terms");
        outcome.push(urgency.saturating_mul(URGENCY_WEIGHT), "urgency");

        if hits.distinct_categories() > 1 {
            outcome.push(MULTI_CATEGORY_BONUS, "multiple_drug_categories");
        }
        if selling > 0 && payment > 0 {
            outcome.push(SELLING_PAYMENT_BONUS, "selling_with_payment");
        }
        if location > 0 && (selling > 0 || buying > 0) {
            outcome.push(LOCATION_INTENT_BONUS, "location_with_intent");
        }

        outcome.finish()
    }
}

fn count(items: &[String]) -> u32 {
    u32::try_from(items.len()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::DrugMatch;

    fn drug(category: &str, keyword: &str, severity: u8) -> DrugMatch {
        DrugMatch {
            category: category.into(),
            keyword: keyword.into(),
            severity,
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_hits_scores_zero() {
        let outcome = RuleEngine::default().evaluate(&CategorizedHits::default());
        assert_eq!(outcome.score, 0);
        assert!(outcome.reasons.is_empty());
    }

    #[test]
    fn each_drug_occurrence_adds_severity() {
        let hits = CategorizedHits {
            drug_matches: vec![drug("cocaine", "coke", 5), drug("cocaine", "coke", 5)],
            ..Default::default()
        };
        assert_eq!(RuleEngine::default().evaluate(&hits).score, 30);
    }

    #[test]
    fn weights_and_bonuses_combine() {
        let hits = CategorizedHits {
            drug_matches: vec![drug("cocaine", "cocaine", 5), drug("cannabis", "weed", 2)],
            selling_indicators: strings(&["selling"]),
            payment_indicators: strings(&["cash"]),
            location_indicators: strings(&["downtown"]),
            ..Default::default()
        };
        // 15 + 6 drugs, 8 selling, 4 payment, 3 location, 10 + 15 + 10 bonuses
        let outcome = RuleEngine::default().evaluate(&hits);
        assert_eq!(outcome.score, 71);
        assert!(outcome.reasons.contains(&"multiple_drug_categories".to_string()));
        assert!(outcome.reasons.contains(&"selling_with_payment".to_string()));
        assert!(outcome.reasons.contains(&"location_with_intent".to_string()));
    }

    #[test]
    fn location_bonus_needs_intent() {
        let hits = CategorizedHits {
            location_indicators: strings(&["downtown"]),
            urgency_indicators: strings(&["asap", "tonight"]),
            ..Default::default()
        };
        assert_eq!(RuleEngine::default().evaluate(&hits).score, 13);
    }

    #[test]
    fn huge_counts_saturate_instead_of_overflowing() {
        let mut outcome = RuleOutcome::new();
        outcome.push(u32::MAX.saturating_mul(SELLING_WEIGHT), "selling_intent");
        outcome.push(u32::MAX.saturating_mul(PAYMENT_WEIGHT), "payment_terms");
        let outcome = outcome.finish();
        assert_eq!(outcome.raw_total, u32::MAX);
        assert_eq!(outcome.score, MAX_SCORE);
    }

    #[test]
    fn score_is_capped() {
        let hits = CategorizedHits {
            selling_indicators: strings(&["sell"; 20]),
            ..Default::default()
        };
        let outcome = RuleEngine::default().evaluate(&hits);
        assert_eq!(outcome.raw_total, 160);
        assert_eq!(outcome.score, MAX_SCORE);
    }
}
