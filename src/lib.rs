use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smartstring::alias::String;

#[cfg(feature = "test-cases")]
pub mod test_cases;
mod train;

pub use train::{collect_stats, compute_scores, significant_ngrams, NgramStats};

/// Central data structure holding the learned phrase scores
///
/// A `Segmenter` is an immutable, fully trained model: build one with
/// [`Segmenter::train`] (or from a prebuilt score table) before segmenting.
/// With an empty table every query falls apart into single words.
#[cfg_attr(feature = "with-serde", derive(Deserialize, Serialize))]
pub struct Segmenter {
    scores: HashMap<String, f64>,
}

impl Segmenter {
    /// Learn phrase scores from a corpus of historical queries
    ///
    /// `alpha` is the minimum number of training queries in which an n-gram's
    /// words must co-occur for the n-gram to be considered at all; it must be
    /// at least 1. `beta` scales the significance threshold: n-grams scoring
    /// below `beta` times their co-occurrence count are dropped from the
    /// table. An empty corpus yields an empty table.
    pub fn train<Q>(queries: &[Q], alpha: usize, beta: f64) -> Result<Self, InvalidAlpha>
    where
        Q: AsRef<str>,
    {
        if alpha < 1 {
            return Err(InvalidAlpha);
        }

        let ngrams = significant_ngrams(queries, alpha);
        let stats = collect_stats(&ngrams, queries);
        Ok(Self::from_map(compute_scores(stats, beta)))
    }

    /// Create `Segmenter` from the given iterator
    ///
    /// Note: the `String` type used in this API is defined in the `smartstring`
    /// crate. Any `&str` or `String` can be converted into the `String` used
    /// here by calling `into()` on it.
    pub fn from_iters<S>(scores: S) -> Self
    where
        S: Iterator<Item = (String, f64)>,
    {
        Self::from_map(scores.collect())
    }

    /// Create `Segmenter` from the given hashmap (using ahash)
    ///
    /// Note: the `String` type used in this API is defined in the `smartstring`
    /// crate. Any `&str` or `String` can be converted into the `String` used
    /// here by calling `into()` on it. The `HashMap` type here refers to
    /// `std::collections::HashMap` parametrized with the `ahash::RandomState`.
    pub fn from_map(scores: HashMap<String, f64>) -> Self {
        Self { scores }
    }

    /// Segment the query in `input`
    ///
    /// Splits on whitespace and returns the highest-scoring partition of the
    /// words into contiguous phrases, along with its cumulative score. Joining
    /// the phrases with single spaces reconstructs the whitespace-normalized
    /// input. The `search` parameter contains buffers that are used during
    /// segmentation; passing it in allows the caller to reuse the allocations.
    pub fn segment<'a>(
        &self,
        input: &str,
        search: &'a mut Search,
    ) -> (impl Iterator<Item = &'a str> + ExactSizeIterator, f64) {
        let score = SegmentState::new(&self, input, search).run();
        (search.result.iter().map(|v| v.as_str()), score)
    }

    /// Segment each query in `queries` independently, preserving input order
    pub fn segment_batch<I>(&self, queries: I) -> Vec<Vec<String>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut search = Search::default();
        queries
            .into_iter()
            .map(|query| {
                let (words, _) = self.segment(query.as_ref(), &mut search);
                words.map(String::from).collect()
            })
            .collect()
    }

    /// Score of the exact phrase, or `0.0` if the phrase is not in the table
    pub fn score(&self, phrase: &str) -> f64 {
        self.scores.get(phrase).copied().unwrap_or(0.0)
    }

    /// The learned phrase score table
    pub fn scores(&self) -> &HashMap<String, f64> {
        &self.scores
    }
}

struct SegmentState<'a> {
    data: &'a Segmenter,
    words: Vec<&'a str>,
    search: &'a mut Search,
}

impl<'a> SegmentState<'a> {
    fn new(data: &'a Segmenter, input: &'a str, search: &'a mut Search) -> Self {
        search.clear();
        Self {
            data,
            words: input.split_whitespace().collect(),
            search,
        }
    }

    /// Fills `search` with the best partition and returns its score
    ///
    /// `best[i]` is the highest cumulative score of any partition of the
    /// first `i` words, `splits[i - 1]` the start of the final phrase in the
    /// partition that achieved it.
    fn run(mut self) -> f64 {
        let len = self.words.len();
        if len == 0 {
            return 0.0;
        }

        self.search.best.push(0.0);
        for end in 1..=len {
            let (mut max_score, mut max_start) = (f64::MIN, 0);
            for start in 0..end {
                let score = self.search.best[start] + self.phrase_score(start..end);
                // Of two equal-scoring partitions, the later split wins, so
                // the trailing phrase is the shortest one possible.
                if score >= max_score {
                    max_score = score;
                    max_start = start;
                }
            }
            self.search.best.push(max_score);
            self.search.splits.push(max_start);
        }

        let mut end = len;
        while end > 0 {
            let start = self.search.splits[end - 1];
            self.search.result.push(self.words[start..end].join(" ").into());
            end = start;
        }
        self.search.result.reverse();

        self.search.best[len]
    }

    /// Table score for the phrase spanning `range`, 0 for unknown phrases
    fn phrase_score(&mut self, range: Range<usize>) -> f64 {
        let phrase = &mut self.search.phrase;
        phrase.clear();
        for (i, word) in self.words[range].iter().enumerate() {
            if i > 0 {
                phrase.push(' ');
            }
            phrase.push_str(word);
        }

        self.data.scores.get(phrase.as_str()).copied().unwrap_or(0.0)
    }
}

/// Caller-owned scratch space for [`Segmenter::segment`]
#[derive(Clone, Default)]
pub struct Search {
    best: Vec<f64>,
    splits: Vec<usize>,
    phrase: String,
    result: Vec<String>,
}

impl Search {
    fn clear(&mut self) {
        self.best.clear();
        self.splits.clear();
        self.phrase.clear();
        self.result.clear();
    }
}

/// Returned by [`Segmenter::train`] when `alpha` is less than 1
#[derive(Debug)]
pub struct InvalidAlpha;

impl std::error::Error for InvalidAlpha {}

impl std::fmt::Display for InvalidAlpha {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("alpha must be at least 1")
    }
}

type HashMap<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;
type HashSet<T> = std::collections::HashSet<T, ahash::RandomState>;

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn ties_prefer_the_latest_split() {
        let mut scores = HashMap::default();
        scores.insert("a b".into(), 1.0);
        scores.insert("b c".into(), 1.0);
        let segmenter = Segmenter::from_map(scores);

        let mut search = Search::default();
        let (words, score) = segmenter.segment("a b c", &mut search);
        assert_eq!(words.collect::<Vec<_>>(), ["a b", "c"]);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn empty_query() {
        let segmenter = Segmenter::from_map(HashMap::default());
        let mut search = Search::default();
        let (words, score) = segmenter.segment("", &mut search);
        assert_eq!(words.len(), 0);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn untrained_model_degrades_to_single_words() {
        let segmenter = Segmenter::from_map(HashMap::default());
        let mut search = Search::default();
        let (words, score) = segmenter.segment("new iphone 6", &mut search);
        assert_eq!(words.collect::<Vec<_>>(), ["new", "iphone", "6"]);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn from_iters() {
        let segmenter = Segmenter::from_iters(vec![("iphone 6".into(), 2.0)].into_iter());
        assert_eq!(segmenter.score("iphone 6"), 2.0);
        assert_eq!(segmenter.score("iphone 7"), 0.0);
    }

    #[test]
    fn search_reuse_leaves_no_stale_state() {
        let mut scores = HashMap::default();
        scores.insert("a b".into(), 1.0);
        let segmenter = Segmenter::from_map(scores);

        let mut search = Search::default();
        let (words, _) = segmenter.segment("a b c d e", &mut search);
        assert_eq!(words.len(), 4);
        drop(words);
        let (words, score) = segmenter.segment("c", &mut search);
        assert_eq!(words.collect::<Vec<_>>(), ["c"]);
        assert_eq!(score, 0.0);
    }
}
