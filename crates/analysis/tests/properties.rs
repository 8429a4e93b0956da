use analysis::{AnalysisResult, BasicAnalyzer, ContentAnalyzer, EnhancedAnalyzer, RuleDataset};
use proptest::prelude::*;

fn content() -> impl Strategy<Value = String> {
    let pieces = prop::sample::select(vec![
        "cocaine", "coke", "weed", "molly", "mdma", "mdmable", "for sale", "dm", "hmu",
        "buy", "looking for", "cash", "btc", "pickup", "downtown", "asap", "tonight",
        "great", "not", "bad", "the", "gym", ".", "!", "\n", "  ", "\u{1F48A}", "\u{1F50C}",
        "\u{2744}\u{FE0F}", "https://t.me/x", "a@b.com", "+15551234567", "420",
    ]);
    prop_oneof![
        any::<String>(),
        prop::collection::vec(pieces, 0..24).prop_map(|parts| parts.join(" ")),
    ]
}

fn without_timing(mut result: AnalysisResult) -> AnalysisResult {
    result.processing_time = 0.0;
    result
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn analysis_is_total_and_bounded(text in content()) {
        let result = BasicAnalyzer::bundled().analyze(&text);
        prop_assert!(result.suspicion_score <= 100);
        prop_assert!((0.0..=1.0).contains(&result.confidence));
        prop_assert!(result.processing_time >= 0.0);
    }

    #[test]
    fn flag_matches_threshold(text in content()) {
        let result = BasicAnalyzer::bundled().analyze(&text);
        prop_assert_eq!(result.is_flagged, result.suspicion_score >= 50);
    }

    #[test]
    fn extra_selling_term_never_lowers_score(text in content()) {
        let analyzer = BasicAnalyzer::bundled();
        let before = analyzer.analyze(&text).suspicion_score;
        let after = analyzer.analyze(&format!("{text} sell")).suspicion_score;
        prop_assert!(after >= before, "{} -> {}", before, after);
    }

    #[test]
    fn analysis_is_deterministic(text in content()) {
        let analyzer = BasicAnalyzer::bundled();
        let first = serde_json::to_string(&without_timing(analyzer.analyze(&text))).unwrap();
        let second = serde_json::to_string(&without_timing(analyzer.analyze(&text))).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn backends_agree_on_wire_fields(text in content()) {
        let dataset = RuleDataset::bundled();
        let basic = BasicAnalyzer::new(dataset.clone()).analyze(&text);
        let enhanced = EnhancedAnalyzer::new(dataset).analyze(&text);
        prop_assert_eq!(basic.matched_keywords, enhanced.matched_keywords);
        prop_assert_eq!(basic.suspicion_score, enhanced.suspicion_score);
        prop_assert_eq!(basic.intent, enhanced.intent);
        prop_assert_eq!(basic.is_flagged, enhanced.is_flagged);
        prop_assert_eq!(basic.confidence, enhanced.confidence);
    }

    #[test]
    fn empty_dataset_never_scores(text in content()) {
        let analyzer = BasicAnalyzer::new(std::sync::Arc::new(RuleDataset::empty()));
        let result = analyzer.analyze(&text);
        prop_assert_eq!(result.suspicion_score, 0);
        prop_assert!(result.matched_keywords.is_empty());
    }
}

#[test]
fn very_long_input_is_handled() {
    let text = "selling coke cash downtown asap ".repeat(50_000);
    let result = BasicAnalyzer::bundled().analyze(&text);
    assert_eq!(result.suspicion_score, 100);
    assert!(result.is_flagged);
    assert_eq!(result.analysis_data.drug_matches.len(), 50_000);
}

#[test]
fn whitespace_and_emoji_only_inputs() {
    let analyzer = BasicAnalyzer::bundled();
    let blank = analyzer.analyze(" \n\t  ");
    assert_eq!(blank.suspicion_score, 0);
    assert_eq!(blank.confidence, 0.0);

    let party = analyzer.analyze("\u{1F389}\u{1F389}\u{1F60A}");
    assert_eq!(party.suspicion_score, 0);
    assert!(party.matched_keywords.is_empty());
}
