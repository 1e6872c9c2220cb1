use std::collections::HashMap;

use query_segment::{Search, Segmenter};

fn main() {
    let mut scores = HashMap::default();

    scores.insert("new york".into(), 3.125);
    scores.insert("iphone 6".into(), 1.85);

    let segmenter = Segmenter::from_map(scores);
    let mut search = Search::default();

    let (words, score) = segmenter.segment("cheap iphone 6 case new york", &mut search);

    println!("{:?} (score {})", words.collect::<Vec<&str>>(), score);
}
