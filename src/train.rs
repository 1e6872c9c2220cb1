//! Training pipeline: significant n-gram extraction, per-candidate corpus
//! statistics, and the multi-word-entity score that feeds the segmenter.

use smartstring::alias::String;

use crate::{HashMap, HashSet};

/// Per-candidate accumulators gathered in a single corpus pass
///
/// For every scored n-gram `0 <= frequency <= co_occur` and `co_occur > 0`
/// hold; candidates whose words never co-occur with a query get no entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NgramStats {
    /// Queries containing the n-gram as a contiguous word sequence
    pub frequency: u64,
    /// Queries containing every word of the n-gram, in any order
    pub co_occur: u64,
    /// Probability mass of the n-gram landing contiguously by chance
    pub expectation: f64,
}

/// Extract the distinct word n-grams worth scoring at all
///
/// Candidates are every contiguous run of 2 to 10 words in the normalized
/// training queries. A candidate is significant when its words co-occur
/// (in any order) in at least `alpha` queries. Returns the candidates as
/// single-space-joined strings, sorted.
pub fn significant_ngrams<Q>(queries: &[Q], alpha: usize) -> Vec<String>
where
    Q: AsRef<str>,
{
    let queries = queries
        .iter()
        .map(|query| tokens(query.as_ref()).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    let word_sets = queries
        .iter()
        .map(|words| words.iter().copied().collect::<HashSet<_>>())
        .collect::<Vec<_>>();

    let mut candidates = HashSet::default();
    for words in &queries {
        for n in NGRAM_MIN..=NGRAM_MAX.min(words.len()) {
            for window in words.windows(n) {
                candidates.insert(window.to_vec());
            }
        }
    }

    let mut ngrams = candidates
        .into_iter()
        .filter(|words| {
            let documents = word_sets
                .iter()
                .filter(|set| words.iter().all(|word| set.contains(word)))
                .count();
            documents >= alpha
        })
        .map(|words| words.join(" ").into())
        .collect::<Vec<String>>();
    ngrams.sort();
    ngrams
}

/// Scan the corpus once per candidate n-gram and accumulate its statistics
///
/// Queries are normalized the same way as during extraction; the contiguity
/// test matches whole words, never raw substrings, so `iphone 7` does not
/// count inside `iphone 75`. Candidates that co-occur with no query at all
/// are left out of the result.
pub fn collect_stats<N, Q>(ngrams: &[N], queries: &[Q]) -> HashMap<String, NgramStats>
where
    N: AsRef<str>,
    Q: AsRef<str>,
{
    let queries = queries
        .iter()
        .map(|query| {
            let words = tokens(query.as_ref()).collect::<Vec<_>>();
            let set = words.iter().copied().collect::<HashSet<_>>();
            (words, set)
        })
        .collect::<Vec<_>>();

    let mut stats = HashMap::default();
    for ngram in ngrams {
        let ngram = ngram.as_ref();
        let words = ngram.split_whitespace().collect::<Vec<_>>();
        if words.is_empty() {
            continue;
        }

        let mut acc = NgramStats::default();
        for (query, word_set) in &queries {
            if !words.iter().all(|word| word_set.contains(word)) {
                continue;
            }

            acc.co_occur += 1;
            acc.expectation += placement_probability(query.len(), words.len());
            if query.windows(words.len()).any(|run| run == &words[..]) {
                acc.frequency += 1;
            }
        }

        if acc.co_occur > 0 {
            stats.insert(ngram.into(), acc);
        }
    }

    stats
}

/// Turn accumulated statistics into the phrase score table
///
/// The score is `2 * (frequency - expectation)^2 / co_occur`, a chi-square
/// like measure of how far the observed contiguous count strays from the
/// independence expectation. N-grams scoring below `beta * co_occur` are
/// omitted, as are n-grams with zero co-occurrences (which the collector
/// never emits, but prebuilt stats may contain).
pub fn compute_scores(stats: HashMap<String, NgramStats>, beta: f64) -> HashMap<String, f64> {
    let mut scores = HashMap::default();
    for (ngram, stats) in stats {
        if stats.co_occur == 0 {
            continue;
        }

        let frequency = stats.frequency as f64;
        let co_occur = stats.co_occur as f64;
        let score = 2.0 * (frequency - stats.expectation).powi(2) / co_occur;
        if score < beta * co_occur {
            continue;
        }

        scores.insert(ngram, score);
    }

    scores
}

/// Training-time tokenization: every non-alphanumeric character separates
fn tokens(query: &str) -> impl Iterator<Item = &str> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
}

/// Probability that `ngram_len` words scattered uniformly over `query_len`
/// slots land contiguously and in order: `(L - n + 1)! / L!`, with the
/// numerator argument clamped to 0 for candidates longer than the query.
/// Computed as a running reciprocal product so long queries underflow to 0
/// instead of overflowing the factorials.
fn placement_probability(query_len: usize, ngram_len: usize) -> f64 {
    let stop = (query_len + 1).saturating_sub(ngram_len);
    ((stop + 1)..=query_len).fold(1.0, |product, slot| product / slot as f64)
}

const NGRAM_MIN: usize = 2;
const NGRAM_MAX: usize = 10;
