use std::fmt;

use serde::{Deserialize, Serialize};

use crate::matcher::CategorizedHits;

/// Payment terms lean towards selling but count half as much as explicit offers.
pub const PAYMENT_SELLING_WEIGHT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Intent {
    Selling,
    Buying,
    Informational,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Selling => "Selling",
            Self::Buying => "Buying",
            Self::Informational => "Informational",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equal non-zero signal resolves to `Informational`; no signal to `Unknown`.
pub fn classify_intent(hits: &CategorizedHits) -> Intent {
    let selling = hits.selling_indicators.len() as f64
        + PAYMENT_SELLING_WEIGHT * hits.payment_indicators.len() as f64;
    let buying = hits.buying_indicators.len() as f64;

    if selling > buying && selling > 0.0 {
        Intent::Selling
    } else if buying > selling && buying > 0.0 {
        Intent::Buying
    } else if selling > 0.0 || buying > 0.0 {
        Intent::Informational
    } else {
        Intent::Unknown
    }
}
