use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use analysis::{AnalyzerHandle, ContentAnalyzer, RuleDataset};
use common::AnalyzerConfig;

#[test]
fn analyses_see_whole_dataset_versions_during_updates() {
    let bundled = RuleDataset::bundled();
    let with_cocaine = (*bundled).clone();
    let without_cocaine = bundled.without_category("cocaine");
    let handle = AnalyzerHandle::with_dataset(AnalyzerConfig::default(), with_cocaine.clone());
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                while !done.load(Ordering::Relaxed) {
                    let score = handle.analyze("cocaine").suspicion_score;
                    assert!(score == 15 || score == 0, "torn dataset: {score}");
                }
            });
        }
        scope.spawn(|| {
            for round in 0..50 {
                let next = if round % 2 == 0 {
                    without_cocaine.clone()
                } else {
                    with_cocaine.clone()
                };
                handle.replace_dataset(next);
            }
            done.store(true, Ordering::Relaxed);
        });
    });

    assert_eq!(handle.analyze("cocaine").suspicion_score, 15);
}

#[test]
fn in_flight_snapshot_is_unaffected_by_replacement() {
    let handle = AnalyzerHandle::with_dataset(AnalyzerConfig::default(), (*RuleDataset::bundled()).clone());
    let snapshot = handle.current();
    let before = snapshot.analyze("ketamine for sale").suspicion_score;

    handle.update_dataset(|dataset| dataset.without_category("ketamine"));

    assert_eq!(snapshot.analyze("ketamine for sale").suspicion_score, before);
    assert!(handle.analyze("ketamine for sale").suspicion_score < before);
    assert!(snapshot.dataset().category("ketamine").is_some());
}

#[test]
fn shared_analyzer_is_usable_from_many_threads() {
    let handle = AnalyzerHandle::new(AnalyzerConfig::default());
    let analyzer = handle.current();
    let expected = analyzer.analyze("molly for sale, cash").suspicion_score;

    thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| analyzer.analyze("molly for sale, cash").suspicion_score))
            .collect();
        for worker in workers {
            assert_eq!(worker.join().unwrap(), expected);
        }
    });
}
