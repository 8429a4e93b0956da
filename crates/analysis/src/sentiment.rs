use serde::{Deserialize, Serialize};

use common::text::words;

const POSITIVE: &[&str] = &[
    "good", "great", "excellent", "love", "amazing", "wonderful", "happy", "fantastic",
    "awesome", "best", "nice", "fire", "legit", "quality", "premium", "clean",
];

const NEGATIVE: &[&str] = &[
    "bad", "terrible", "awful", "hate", "horrible", "worst", "sad", "angry", "disappointed",
    "poor", "scam", "fake", "ripped", "trash", "weak", "sick",
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "dont", "don't", "isnt", "isn't", "wasnt", "wasn't", "aint", "ain't",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentReading {
    pub label: Sentiment,
    /// `(positive - negative) / (positive + negative)`, 0.0 when nothing matched.
    pub score: f64,
    pub positive: usize,
    pub negative: usize,
}

impl SentimentReading {
    fn from_counts(positive: usize, negative: usize) -> Self {
        let total = positive + negative;
        let score = if total == 0 {
            0.0
        } else {
            (positive as f64 - negative as f64) / total as f64
        };
        let label = match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        };
        Self {
            label,
            score,
            positive,
            negative,
        }
    }
}

pub fn lexicon_sentiment(text: &str) -> SentimentReading {
    let (mut positive, mut negative) = (0, 0);
    for word in words(text) {
        if POSITIVE.contains(&word.as_str()) {
            positive += 1;
        } else if NEGATIVE.contains(&word.as_str()) {
            negative += 1;
        }
    }
    SentimentReading::from_counts(positive, negative)
}

/// Like [`lexicon_sentiment`] but a negator directly before a word flips it.
pub fn negation_aware_sentiment(text: &str) -> SentimentReading {
    let (mut positive, mut negative) = (0, 0);
    let mut negated = false;
    for word in words(text) {
        let word = word.as_str();
        let polarity = if POSITIVE.contains(&word) {
            Some(true)
        } else if NEGATIVE.contains(&word) {
            Some(false)
        } else {
            None
        };
        match polarity {
            Some(is_positive) if is_positive != negated => positive += 1,
            Some(_) => negative += 1,
            None => {}
        }
        negated = NEGATORS.contains(&word);
    }
    SentimentReading::from_counts(positive, negative)
}
