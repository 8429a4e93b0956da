use std::collections::BTreeMap;

use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dataset::{RuleDataset, TermList};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugMatch {
    pub category: String,
    pub keyword: String,
    pub severity: u8,
}

/// Raw hits for one text. Repeated occurrences are kept, one entry each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedHits {
    pub drug_matches: Vec<DrugMatch>,
    pub selling_indicators: Vec<String>,
    pub buying_indicators: Vec<String>,
    pub payment_indicators: Vec<String>,
    pub location_indicators: Vec<String>,
    pub urgency_indicators: Vec<String>,
}

impl CategorizedHits {
    pub fn urgency_count(&self) -> usize {
        self.urgency_indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drug_matches.is_empty()
            && self.selling_indicators.is_empty()
            && self.buying_indicators.is_empty()
            && self.payment_indicators.is_empty()
            && self.location_indicators.is_empty()
            && self.urgency_indicators.is_empty()
    }

    pub fn distinct_categories(&self) -> usize {
        let mut names: Vec<&str> = self.drug_matches.iter().map(|m| m.category.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }

    pub fn distinct_drug_keywords(&self) -> usize {
        let mut names: Vec<&str> = self.drug_matches.iter().map(|m| m.keyword.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }

    /// Every matched term once, sorted.
    pub fn matched_keywords(&self) -> Vec<String> {
        let mut all: Vec<String> = self
            .drug_matches
            .iter()
            .map(|m| m.keyword.clone())
            .chain(self.selling_indicators.iter().cloned())
            .chain(self.buying_indicators.iter().cloned())
            .chain(self.payment_indicators.iter().cloned())
            .chain(self.location_indicators.iter().cloned())
            .chain(self.urgency_indicators.iter().cloned())
            .collect();
        all.sort();
        all.dedup();
        all
    }

    fn list_mut(&mut self, list: TermList) -> &mut Vec<String> {
        match list {
            TermList::Selling => &mut self.selling_indicators,
            TermList::Buying => &mut self.buying_indicators,
            TermList::Payment => &mut self.payment_indicators,
            TermList::Location => &mut self.location_indicators,
            TermList::Urgency => &mut self.urgency_indicators,
        }
    }
}

#[derive(Debug, Clone)]
enum Target {
    Drug { category: String, severity: u8 },
    List(TermList),
}

/// All dataset terms compiled into one automaton. A term listed in several
/// places reports a hit for each of them.
pub struct Matcher {
    automaton: Option<AhoCorasick>,
    terms: Vec<String>,
    targets: Vec<Vec<Target>>,
}

impl Matcher {
    pub fn compile(dataset: &RuleDataset) -> Self {
        let mut by_term: BTreeMap<String, Vec<Target>> = BTreeMap::new();
        for (name, rules) in dataset.categories() {
            for term in rules.terms() {
                by_term.entry(term.clone()).or_default().push(Target::Drug {
                    category: name.clone(),
                    severity: rules.severity(),
                });
            }
        }
        for list in TermList::ALL {
            for term in dataset.list(list) {
                by_term
                    .entry(term.clone())
                    .or_default()
                    .push(Target::List(list));
            }
        }

        let (terms, targets): (Vec<_>, Vec<_>) = by_term.into_iter().unzip();
        if terms.is_empty() {
            return Self::empty();
        }

        match AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&terms)
        {
            Ok(automaton) => Self {
                automaton: Some(automaton),
                terms,
                targets,
            },
            Err(err) => {
                warn!(error = %err, terms = terms.len(), "failed to compile rule terms, matching nothing");
                Self::empty()
            }
        }
    }

    pub fn empty() -> Self {
        Self {
            automaton: None,
            terms: Vec::new(),
            targets: Vec::new(),
        }
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Whole-word, case-insensitive scan in a single pass over `text`.
    pub fn scan(&self, text: &str) -> CategorizedHits {
        let mut hits = CategorizedHits::default();
        let Some(automaton) = &self.automaton else {
            return hits;
        };

        let lowered = text.to_lowercase();
        for found in automaton.find_overlapping_iter(&lowered) {
            if !is_whole_word(&lowered, found.start(), found.end()) {
                continue;
            }
            let index = found.pattern().as_usize();
            let term = &self.terms[index];
            for target in &self.targets[index] {
                match target {
                    Target::Drug { category, severity } => hits.drug_matches.push(DrugMatch {
                        category: category.clone(),
                        keyword: term.clone(),
                        severity: *severity,
                    }),
                    Target::List(list) => hits.list_mut(*list).push(term.clone()),
                }
            }
        }
        hits
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text
        .get(..start)
        .and_then(|head| head.chars().next_back())
        .map_or(true, |ch| !is_word_char(ch));
    let after = text
        .get(end..)
        .and_then(|tail| tail.chars().next())
        .map_or(true, |ch| !is_word_char(ch));
    before && after
}
