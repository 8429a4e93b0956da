use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::metrics;

pub const MIN_SEVERITY: u8 = 1;
pub const MAX_SEVERITY: u8 = 5;

const BUNDLED_RULES: &str = include_str!("../data/rules.json");

static BUNDLED: Lazy<Arc<RuleDataset>> = Lazy::new(|| {
    let dataset = RuleDataset::from_json_str(BUNDLED_RULES).unwrap_or_else(|err| {
        warn!(error = %err, "bundled rule dataset is malformed, continuing with an empty dataset");
        metrics::DATASET_LOAD_FAILURES.inc();
        RuleDataset::empty()
    });
    Arc::new(dataset)
});

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read rule dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse rule dataset {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One drug category. Terms are trimmed, lower-cased and whitespace-collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRules {
    keywords: BTreeSet<String>,
    slang: BTreeSet<String>,
    severity: u8,
}

impl CategoryRules {
    pub fn new<K, S>(keywords: K, slang: S, severity: i64) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        Self {
            keywords: clean_terms(keywords),
            slang: clean_terms(slang),
            severity: clamp_severity(severity),
        }
    }

    pub fn keywords(&self) -> &BTreeSet<String> {
        &self.keywords
    }

    pub fn slang(&self) -> &BTreeSet<String> {
        &self.slang
    }

    pub fn severity(&self) -> u8 {
        self.severity
    }

    /// `keywords ∪ slang`, each term once.
    pub fn terms(&self) -> impl Iterator<Item = &String> {
        self.keywords.union(&self.slang)
    }
}

/// The flat keyword lists that sit next to the drug categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermList {
    Selling,
    Buying,
    Payment,
    Location,
    Urgency,
}

impl TermList {
    pub const ALL: [TermList; 5] = [
        TermList::Selling,
        TermList::Buying,
        TermList::Payment,
        TermList::Location,
        TermList::Urgency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Selling => "selling",
            Self::Buying => "buying",
            Self::Payment => "payment",
            Self::Location => "location",
            Self::Urgency => "urgency",
        }
    }
}

/// Immutable keyword dataset. Every mutator returns a new version and leaves
/// the receiver untouched, so analyzers holding the old one are unaffected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleDataset {
    version: Option<String>,
    categories: BTreeMap<String, CategoryRules>,
    lists: BTreeMap<TermList, BTreeSet<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub categories: usize,
    pub category_terms: usize,
    pub selling_terms: usize,
    pub buying_terms: usize,
    pub payment_terms: usize,
    pub location_terms: usize,
    pub urgency_terms: usize,
}

impl DatasetStats {
    pub fn total_terms(&self) -> usize {
        self.category_terms
            + self.selling_terms
            + self.buying_terms
            + self.payment_terms
            + self.location_terms
            + self.urgency_terms
    }
}

impl RuleDataset {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The dataset compiled into this crate, parsed once per process.
    pub fn bundled() -> Arc<RuleDataset> {
        BUNDLED.clone()
    }

    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        let file: DatasetFile = serde_json::from_str(input)?;
        Ok(Self::from(file))
    }

    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or("unversioned")
    }

    pub fn is_empty(&self) -> bool {
        self.categories.values().all(|c| c.terms().next().is_none())
            && self.lists.values().all(BTreeSet::is_empty)
    }

    pub fn categories(&self) -> &BTreeMap<String, CategoryRules> {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&CategoryRules> {
        self.categories.get(&clean_term(name)?)
    }

    pub fn list(&self, list: TermList) -> impl Iterator<Item = &String> {
        self.lists.get(&list).into_iter().flatten()
    }

    pub fn severity_of(&self, category: &str) -> u8 {
        self.categories
            .get(category)
            .map(CategoryRules::severity)
            .unwrap_or(MIN_SEVERITY)
    }

    pub fn stats(&self) -> DatasetStats {
        let list_len = |list: TermList| self.lists.get(&list).map_or(0, BTreeSet::len);
        DatasetStats {
            categories: self.categories.len(),
            category_terms: self
                .categories
                .values()
                .map(|c| c.terms().count())
                .sum(),
            selling_terms: list_len(TermList::Selling),
            buying_terms: list_len(TermList::Buying),
            payment_terms: list_len(TermList::Payment),
            location_terms: list_len(TermList::Location),
            urgency_terms: list_len(TermList::Urgency),
        }
    }

    /// SHA-256 over the canonical (sorted) content; equal content, equal print.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for (name, rules) in &self.categories {
            hasher.update(b"category\x1f");
            hasher.update(name.as_bytes());
            hasher.update([0x1f, rules.severity]);
            for term in &rules.keywords {
                hasher.update(b"\x1ek\x1f");
                hasher.update(term.as_bytes());
            }
            for term in &rules.slang {
                hasher.update(b"\x1es\x1f");
                hasher.update(term.as_bytes());
            }
            hasher.update(b"\n");
        }
        for (list, terms) in &self.lists {
            hasher.update(list.as_str().as_bytes());
            for term in terms {
                hasher.update(b"\x1f");
                hasher.update(term.as_bytes());
            }
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }

    /// Adds a keyword to `category`, creating the category at minimum severity
    /// when it does not exist yet.
    pub fn with_keyword(&self, category: &str, keyword: &str) -> Self {
        let mut next = self.clone();
        if let (Some(name), Some(term)) = (clean_term(category), clean_term(keyword)) {
            next.categories
                .entry(name)
                .or_insert_with(|| CategoryRules::new(None::<&str>, None::<&str>, 1))
                .keywords
                .insert(term);
        }
        next
    }

    pub fn with_slang(&self, category: &str, slang: &str) -> Self {
        let mut next = self.clone();
        if let (Some(name), Some(term)) = (clean_term(category), clean_term(slang)) {
            next.categories
                .entry(name)
                .or_insert_with(|| CategoryRules::new(None::<&str>, None::<&str>, 1))
                .slang
                .insert(term);
        }
        next
    }

    /// Removes the term from both the keywords and the slang of `category`.
    pub fn without_keyword(&self, category: &str, keyword: &str) -> Self {
        let mut next = self.clone();
        if let (Some(name), Some(term)) = (clean_term(category), clean_term(keyword)) {
            if let Some(rules) = next.categories.get_mut(&name) {
                rules.keywords.remove(&term);
                rules.slang.remove(&term);
            }
        }
        next
    }

    pub fn with_category(&self, name: &str, rules: CategoryRules) -> Self {
        let mut next = self.clone();
        if let Some(name) = clean_term(name) {
            next.categories.insert(name, rules);
        }
        next
    }

    pub fn without_category(&self, name: &str) -> Self {
        let mut next = self.clone();
        if let Some(name) = clean_term(name) {
            next.categories.remove(&name);
        }
        next
    }

    pub fn with_term(&self, list: TermList, term: &str) -> Self {
        let mut next = self.clone();
        if let Some(term) = clean_term(term) {
            next.lists.entry(list).or_default().insert(term);
        }
        next
    }

    pub fn without_term(&self, list: TermList, term: &str) -> Self {
        let mut next = self.clone();
        if let (Some(term), Some(terms)) = (clean_term(term), next.lists.get_mut(&list)) {
            terms.remove(&term);
            if terms.is_empty() {
                next.lists.remove(&list);
            }
        }
        next
    }
}

/// Reads and parses a rule file.
pub fn try_load_dataset(path: &Path) -> Result<RuleDataset, DatasetError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    RuleDataset::from_json_str(&raw).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Fail-open loader: a missing or corrupt file yields an empty dataset that
/// matches nothing.
pub fn load_dataset(path: &Path) -> RuleDataset {
    match try_load_dataset(path) {
        Ok(dataset) => {
            let stats = dataset.stats();
            info!(
                path = %path.display(),
                version = dataset.version(),
                categories = stats.categories,
                terms = stats.total_terms(),
                "rule dataset loaded"
            );
            dataset
        }
        Err(err) => {
            warn!(error = %err, "continuing with an empty rule dataset");
            metrics::DATASET_LOAD_FAILURES.inc();
            RuleDataset::empty()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct DatasetFile {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    drugs: BTreeMap<String, CategoryFile>,
    #[serde(default)]
    intent_keywords: IntentFile,
    #[serde(default)]
    payment_keywords: Vec<String>,
    #[serde(default)]
    location_keywords: Vec<String>,
    #[serde(default)]
    urgency_keywords: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct IntentFile {
    #[serde(default)]
    selling: Vec<String>,
    #[serde(default)]
    buying: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryFile {
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    slang: Vec<String>,
    /// Any JSON number; fractional values are rounded.
    #[serde(default = "CategoryFile::default_severity")]
    severity: f64,
}

impl CategoryFile {
    fn default_severity() -> f64 {
        f64::from(MIN_SEVERITY)
    }
}

impl From<DatasetFile> for RuleDataset {
    fn from(file: DatasetFile) -> Self {
        let mut categories = BTreeMap::new();
        for (name, category) in file.drugs {
            let Some(name) = clean_term(&name) else {
                continue;
            };
            let severity = category.severity.round();
            if !(f64::from(MIN_SEVERITY)..=f64::from(MAX_SEVERITY)).contains(&severity) {
                warn!(
                    category = %name,
                    severity = category.severity,
                    "severity outside 1..=5, clamping"
                );
            }
            // NaN casts to 0 and infinities saturate; both are clamped below.
            let rules = CategoryRules::new(category.keywords, category.slang, severity as i64);
            categories.insert(name, rules);
        }

        let lists = [
            (TermList::Selling, file.intent_keywords.selling),
            (TermList::Buying, file.intent_keywords.buying),
            (TermList::Payment, file.payment_keywords),
            (TermList::Location, file.location_keywords),
            (TermList::Urgency, file.urgency_keywords),
        ]
        .into_iter()
        .map(|(list, terms)| (list, clean_terms(terms)))
        .filter(|(_, terms)| !terms.is_empty())
        .collect();

        Self {
            version: file.version.filter(|v| !v.trim().is_empty()),
            categories,
            lists,
        }
    }
}

fn clean_term(raw: &str) -> Option<String> {
    let term = raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    (!term.is_empty()).then_some(term)
}

fn clean_terms<I>(raw: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|term| clean_term(term.as_ref()))
        .collect()
}

fn clamp_severity(severity: i64) -> u8 {
    severity.clamp(i64::from(MIN_SEVERITY), i64::from(MAX_SEVERITY)) as u8
}
