use common::text::{normalize, word_count};
use proptest::prelude::*;

fn messy_text() -> impl Strategy<Value = String> {
    let pieces = prop::sample::select(vec![
        "word", "WORD", "  ", "\n\n", "\t", "http://x.io/a?b=c", "ftp://h", "me@mail.com",
        "+441234567890", "12345", "\u{1F48A}", "\u{2744}\u{FE0F}", "\u{1F50C}", "\u{FE0F}",
        ".", "@", "://", "_", "é",
    ]);
    prop_oneof![
        any::<String>(),
        prop::collection::vec(pieces, 0..32).prop_map(|parts| parts.concat()),
    ]
}

proptest! {
    #[test]
    fn normalize_is_idempotent(text in messy_text()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalized_text_has_single_spaces(text in messy_text()) {
        let once = normalize(&text);
        prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
        prop_assert!(!once.contains("  "));
        prop_assert_eq!(word_count(&once), once.split(' ').filter(|w| !w.is_empty()).count());
    }
}
