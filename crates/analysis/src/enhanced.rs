//! Richer diagnostics on top of the pattern-matching backend.
//!
//! The wire-visible fields (score, intent, flag, confidence, keywords) are
//! produced by exactly the same rules as [`BasicAnalyzer`]; this backend only
//! fills `analysis_data.enhanced`.

use std::sync::Arc;

use common::text::words;
use common::AnalyzerBackend;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analyzer::{BasicAnalyzer, ContentAnalyzer};
use crate::dataset::RuleDataset;
use crate::intent::Intent;
use crate::result::AnalysisResult;
use crate::sentiment::negation_aware_sentiment;

static MONEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)[$€£]\s?\d+(?:[.,]\d+)?k?|\b\d+(?:[.,]\d+)?\s?(?:usd|eur|gbp|dollars|bucks|quid)\b",
    )
    .expect("invalid money regex")
});

static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b\d+(?:\.\d+)?\s?(?:mg|g|grams?|kg|kilos?|oz|ounces?|lbs?|pounds?|ml|tabs?|pills?|bars?|qp|hp|zips?)\b",
    )
    .expect("invalid quantity regex")
});

static HANDLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\w.@])(@[A-Za-z0-9_]{2,32})\b").expect("invalid handle regex")
});

static CHANNEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:telegram|whatsapp|wickr|snapchat|threema|kik)\b|\b(?:t\.me|wa\.me)/[A-Za-z0-9_+]+",
    )
    .expect("invalid channel regex")
});

/// Verb lemmas that express a transaction direction.
const INTENT_VERBS: &[(&str, Intent)] = &[
    ("sell", Intent::Selling),
    ("ship", Intent::Selling),
    ("deliver", Intent::Selling),
    ("supply", Intent::Selling),
    ("stock", Intent::Selling),
    ("drop", Intent::Selling),
    ("buy", Intent::Buying),
    ("cop", Intent::Buying),
    ("purchase", Intent::Buying),
    ("order", Intent::Buying),
    ("score", Intent::Buying),
    ("need", Intent::Buying),
    ("want", Intent::Buying),
];

const IRREGULAR: &[(&str, &str)] = &[
    ("sold", "sell"),
    ("bought", "buy"),
    ("supplies", "supply"),
    ("supplied", "supply"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Money,
    Quantity,
    Handle,
    ContactChannel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentVerb {
    pub word: String,
    pub lemma: String,
    pub direction: Intent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedSignals {
    pub entities: Vec<Entity>,
    pub intent_verbs: Vec<IntentVerb>,
    /// Negation-aware polarity in `[-1.0, 1.0]`.
    pub sentiment_score: f64,
}

pub struct EnhancedAnalyzer {
    basic: BasicAnalyzer,
}

impl EnhancedAnalyzer {
    pub fn new(dataset: Arc<RuleDataset>) -> Self {
        Self {
            basic: BasicAnalyzer::new(dataset),
        }
    }

    pub fn with_threshold(dataset: Arc<RuleDataset>, flag_threshold: u8) -> Self {
        Self {
            basic: BasicAnalyzer::with_threshold(dataset, flag_threshold),
        }
    }
}

impl ContentAnalyzer for EnhancedAnalyzer {
    fn analyze(&self, text: &str) -> AnalysisResult {
        self.basic
            .run(text, AnalyzerBackend::Enhanced, |raw, normalized| {
                Some(extract_signals(raw, normalized))
            })
    }

    fn backend(&self) -> AnalyzerBackend {
        AnalyzerBackend::Enhanced
    }

    fn dataset(&self) -> &Arc<RuleDataset> {
        self.basic.dataset()
    }

    fn flag_threshold(&self) -> u8 {
        self.basic.flag_threshold()
    }
}

/// Entities come from the raw text (contact details are stripped during
/// normalization); verbs and sentiment from the normalized text.
pub fn extract_signals(raw: &str, normalized: &str) -> EnhancedSignals {
    EnhancedSignals {
        entities: extract_entities(raw),
        intent_verbs: extract_intent_verbs(normalized),
        sentiment_score: negation_aware_sentiment(normalized).score,
    }
}

pub fn extract_entities(raw: &str) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut push = |kind, text: &str| {
        entities.push(Entity {
            kind,
            text: text.trim().to_string(),
        })
    };

    for found in MONEY_RE.find_iter(raw) {
        push(EntityKind::Money, found.as_str());
    }
    for found in QUANTITY_RE.find_iter(raw) {
        push(EntityKind::Quantity, found.as_str());
    }
    for caps in HANDLE_RE.captures_iter(raw) {
        if let Some(handle) = caps.get(1) {
            push(EntityKind::Handle, handle.as_str());
        }
    }
    for found in CHANNEL_RE.find_iter(raw) {
        push(EntityKind::ContactChannel, &found.as_str().to_lowercase());
    }
    entities
}

pub fn extract_intent_verbs(text: &str) -> Vec<IntentVerb> {
    words(text)
        .filter_map(|word| {
            let lemma = lemmatize(&word)?;
            let direction = INTENT_VERBS
                .iter()
                .find(|(verb, _)| *verb == lemma)
                .map(|(_, direction)| *direction)?;
            Some(IntentVerb {
                word,
                lemma: lemma.to_string(),
                direction,
            })
        })
        .collect()
}

/// Maps an inflected form onto a known verb lemma by suffix stripping.
fn lemmatize(word: &str) -> Option<&'static str> {
    if let Some((_, lemma)) = IRREGULAR.iter().find(|(form, _)| *form == word) {
        return Some(*lemma);
    }
    let known = |candidate: &str| {
        INTENT_VERBS
            .iter()
            .map(|(verb, _)| *verb)
            .find(|verb| *verb == candidate)
    };
    if let Some(lemma) = known(word) {
        return Some(lemma);
    }

    for suffix in ["ing", "ed", "es", "s"] {
        let Some(stem) = word.strip_suffix(suffix) else {
            continue;
        };
        if let Some(lemma) = known(stem) {
            return Some(lemma);
        }
        // copping -> copp -> cop
        let mut chars = stem.chars().rev();
        if let (Some(last), Some(prev)) = (chars.next(), chars.next()) {
            if last == prev {
                if let Some(lemma) = known(&stem[..stem.len() - last.len_utf8()]) {
                    return Some(lemma);
                }
            }
        }
        // purchasing -> purchas -> purchase
        if let Some(lemma) = known(&format!("{stem}e")) {
            return Some(lemma);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lemmatizer_handles_common_inflections() {
        assert_eq!(lemmatize("selling"), Some("sell"));
        assert_eq!(lemmatize("sold"), Some("sell"));
        assert_eq!(lemmatize("shipping"), Some("ship"));
        assert_eq!(lemmatize("copped"), Some("cop"));
        assert_eq!(lemmatize("purchasing"), Some("purchase"));
        assert_eq!(lemmatize("delivers"), Some("deliver"));
        assert_eq!(lemmatize("supplies"), Some("supply"));
        assert_eq!(lemmatize("shopping"), None);
    }

    #[test]
    fn entities_are_extracted_from_raw_text() {
        let entities =
            extract_entities("3.5g for $40, 1 oz 250 bucks. msg @greenplug on Telegram or t.me/greenplug");
        let of = |kind| {
            entities
                .iter()
                .filter(|e| e.kind == kind)
                .map(|e| e.text.as_str())
                .collect::<Vec<_>>()
        };
        assert_eq!(of(EntityKind::Money), vec!["$40", "250 bucks"]);
        assert_eq!(of(EntityKind::Quantity), vec!["3.5g", "1 oz"]);
        assert_eq!(of(EntityKind::Handle), vec!["@greenplug"]);
        assert_eq!(of(EntityKind::ContactChannel), vec!["telegram", "t.me/greenplug"]);
    }

    #[test]
    fn email_addresses_are_not_handles() {
        let entities = extract_entities("write to plug@example.com");
        assert!(entities.iter().all(|e| e.kind != EntityKind::Handle));
    }

    #[test]
    fn intent_verbs_carry_direction() {
        let verbs = extract_intent_verbs("I sold out but we are shipping again. Who copped?");
        let lemmas: Vec<_> = verbs.iter().map(|v| (v.lemma.as_str(), v.direction)).collect();
        assert_eq!(
            lemmas,
            vec![
                ("sell", Intent::Selling),
                ("ship", Intent::Selling),
                ("cop", Intent::Buying),
            ]
        );
    }

    #[test]
    fn wire_fields_match_basic_backend() {
        let dataset = RuleDataset::bundled();
        let basic = BasicAnalyzer::new(dataset.clone());
        let enhanced = EnhancedAnalyzer::new(dataset);
        let text = "Selling 3.5g kush for $40, hmu on telegram. Cash or btc, pickup downtown tonight";

        let a = basic.analyze(text);
        let b = enhanced.analyze(text);
        assert_eq!(a.matched_keywords, b.matched_keywords);
        assert_eq!(a.suspicion_score, b.suspicion_score);
        assert_eq!(a.intent, b.intent);
        assert_eq!(a.is_flagged, b.is_flagged);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(b.analysis_data.backend, AnalyzerBackend::Enhanced);

        let signals = b.analysis_data.enhanced.expect("enhanced signals");
        assert!(signals.entities.iter().any(|e| e.kind == EntityKind::Money));
        assert!(signals.intent_verbs.iter().any(|v| v.lemma == "sell"));
    }
}
