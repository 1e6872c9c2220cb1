use crate::{Search, Segmenter};

#[test]
fn toy_corpus() {
    run(&segmenter());
}

/// Train a segmenter on the built-in toy corpus
pub fn segmenter() -> Segmenter {
    Segmenter::train(TRAINING_QUERIES, 2, 0.0).unwrap()
}

/// Run a segmenter against the built-in test cases
pub fn run(segmenter: &Segmenter) {
    let mut search = Search::default();
    {
        let (words, score) = segmenter.segment("", &mut search);
        assert_eq!(words.len(), 0);
        assert_eq!(score, 0.0);
    }

    let mut success = true;
    for (query, expected) in TEST_CASES.iter().copied() {
        success &= assert_segments(query, expected, &mut search, segmenter);
    }
    assert!(success);
}

pub fn assert_segments(
    query: &str,
    expected: &[&str],
    search: &mut Search,
    segmenter: &Segmenter,
) -> bool {
    let (words, _score) = segmenter.segment(query, search);
    let cmp = words.collect::<Vec<_>>();
    let success = cmp == expected;
    if !success {
        println!("query:    {:?}", query);
        println!("expected: {:?}", expected);
        println!("actual:   {:?}\n", cmp);
    }
    success
}

/// Toy corpus of shopping-style query-log lines
pub const TRAINING_QUERIES: &[&str] = &[
    "iphone 6",
    "iphone 6",
    "iphone 6 red",
    "iphone 7",
    "new iphone 7",
    "iphone 7 black",
    "new york",
    "new york hotels",
    "pizza new york",
    "new york city",
];

/// Queries with their expected segmentations under the toy corpus
///
/// These are exposed so that you can exercise a segmenter built through a
/// different path (e.g. a deserialized score table) against the same cases.
pub const TEST_CASES: &[(&str, &[&str])] = &[
    ("iphone 6 charger", &["iphone 6", "charger"]),
    ("new iphone 6", &["new", "iphone 6"]),
    ("new york pizza", &["new york", "pizza"]),
    ("cheap flights new york", &["cheap", "flights", "new york"]),
    ("iphone 6 iphone 7", &["iphone 6", "iphone 7"]),
    ("new york city hotels", &["new york", "city", "hotels"]),
    ("iphone", &["iphone"]),
];
