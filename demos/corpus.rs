//! Train a model from a query log and segment queries in bulk
//!
//! This is not actually an example, but a small tool: pass a query-log file
//! (one query per line) and a file of queries to segment, and get one
//! comma-joined segmentation per input line on stdout.

use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::process::exit;

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use query_segment::{Search, Segmenter};

fn main() {
    let mut args = env::args().skip(1);
    let (log, input) = match (args.next(), args.next()) {
        (Some(log), Some(input)) => (log, input),
        _ => {
            eprintln!("usage: corpus <query-log> <queries>");
            exit(1);
        }
    };

    let queries = read_lines(&log);
    eprintln!("read {} training queries", queries.len());

    let segmenter = match Segmenter::train(&queries, 2, 0.0) {
        Ok(segmenter) => segmenter,
        Err(e) => {
            eprintln!("error: {}", e);
            exit(1);
        }
    };
    eprintln!("scored {} phrases", segmenter.scores().len());

    // The score table is read-only from here on, so the inputs can fan out
    // across threads; collect() keeps them in input order.
    let inputs = read_lines(&input);
    let segmented = inputs
        .par_iter()
        .map_init(Search::default, |search, query| {
            let (words, _score) = segmenter.segment(query, search);
            words.collect::<Vec<_>>().join(",")
        })
        .collect::<Vec<_>>();

    for line in segmented {
        println!("{}", line);
    }
}

fn read_lines(path: &str) -> Vec<String> {
    let reader = BufReader::new(File::open(path).unwrap());
    reader
        .lines()
        .map(|ln| ln.unwrap().trim().to_owned())
        .filter(|ln| !ln.is_empty())
        .collect()
}
