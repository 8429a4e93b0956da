use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};

pub static ANALYSES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "content_analyses_total",
        "Content items analyzed grouped by analyzer backend",
        &["backend"]
    )
    .expect("content analyses total")
});

pub static FLAGGED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "content_flagged_total",
        "Content items whose suspicion score reached the flagging threshold",
        &["backend"]
    )
    .expect("content flagged total")
});

pub static ANALYSIS_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "content_analysis_duration_seconds",
        "Wall-clock duration of a single content analysis",
        vec![0.00005, 0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.05]
    )
    .expect("content analysis duration histogram")
});

pub static DATASET_LOAD_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "rule_dataset_load_failures_total",
        "Rule dataset loads that fell back to the empty dataset"
    )
    .expect("rule dataset load failures")
});

pub static DATASET_TERMS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "rule_dataset_terms",
        "Number of terms in the rule dataset currently used for analysis"
    )
    .expect("rule dataset terms gauge")
});
