//! Pairwise comparison: enumerate all unordered record pairs and emit
//! edges that clear the threshold.
//!
//! The pair count is O(n²); this is the stage worth sharding across workers
//! if it ever needs to be (edge append order does not matter downstream).
//! This implementation keeps a single sequential loop.
//!
//! A pathological record must not abort the whole run: each pair's score is
//! computed under a panic guard, and a failed pair is logged and treated as
//! "no edge", degrading that record to isolation instead of killing the
//! batch.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::models::{Record, SimilarityEdge};
use crate::progress::{DedupeProgressEvent, ProgressReporter};
use crate::similarity::{record_similarity, DedupeParams};

/// Compare every unordered pair once and collect edges with
/// `score >= threshold`.
///
/// Records whose content fingerprints are equal are exact duplicates up to
/// normalization and score 1.0 without running the similarity computation.
/// Progress is reported at 10% milestones of the pair count.
pub fn find_edges(
    records: &[Record],
    threshold: f64,
    params: &DedupeParams,
    reporter: &dyn ProgressReporter,
) -> Vec<SimilarityEdge> {
    let n = records.len();
    if n < 2 {
        return Vec::new();
    }

    let total = (n as u64) * (n as u64 - 1) / 2;
    let mut done: u64 = 0;
    let mut last_decile: u64 = 0;
    let mut edges = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            if let Some(score) = pair_score(&records[i], &records[j], params) {
                if score >= threshold {
                    edges.push(SimilarityEdge { a: i, b: j, score });
                }
            }

            done += 1;
            let decile = done * 10 / total;
            if decile > last_decile {
                last_decile = decile;
                reporter.report(DedupeProgressEvent::Comparing {
                    done,
                    total,
                    percent: (decile * 10) as u8,
                });
            }
        }
    }

    edges
}

/// Score one pair, containing any panic to this pair.
fn pair_score(a: &Record, b: &Record, params: &DedupeParams) -> Option<f64> {
    if !a.fingerprint.is_empty() && a.fingerprint == b.fingerprint {
        return Some(1.0);
    }

    match catch_unwind(AssertUnwindSafe(|| record_similarity(a, b, params))) {
        Ok(score) => Some(score),
        Err(_) => {
            eprintln!(
                "comparison failed for pair {} / {}; treating as no edge",
                a.id, b.id
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::progress::NoProgress;
    use crate::similarity::fingerprint;

    fn record(id: &str, title: &str, body: &str) -> Record {
        Record {
            id: id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            created_at: 0,
            updated_at: 0,
            fingerprint: fingerprint(title, body),
        }
    }

    struct CollectingReporter {
        events: Mutex<Vec<(u64, u64, u8)>>,
    }

    impl ProgressReporter for CollectingReporter {
        fn report(&self, event: DedupeProgressEvent) {
            let DedupeProgressEvent::Comparing {
                done,
                total,
                percent,
            } = event;
            self.events.lock().unwrap().push((done, total, percent));
        }
    }

    #[test]
    fn near_duplicates_form_an_edge() {
        let records = vec![
            record("a", "Write a poem", "Compose a short poem about the sea."),
            record("b", "Write a poem!", "Compose a short poem about the sea."),
            record("c", "Summarize text", "Summarize the given article in two sentences."),
        ];
        let edges = find_edges(&records, 0.8, &DedupeParams::default(), &NoProgress);
        assert_eq!(edges.len(), 1);
        assert_eq!((edges[0].a, edges[0].b), (0, 1));
        assert!(edges[0].score >= 0.9);
    }

    #[test]
    fn raising_threshold_only_removes_edges() {
        let records = vec![
            record("a", "Write a poem", "Compose a short poem about the sea."),
            record("b", "Write a poem!", "Compose a short poem about the sea."),
            record("c", "Write a poem?", "Compose a short poem about the sea!"),
        ];
        let params = DedupeParams::default();
        let loose = find_edges(&records, 0.8, &params, &NoProgress);
        let strict = find_edges(&records, 0.99, &params, &NoProgress);

        assert!(strict.len() <= loose.len());
        for edge in &strict {
            assert!(
                loose.iter().any(|e| e.a == edge.a && e.b == edge.b),
                "edge {}-{} present at 0.99 but missing at 0.8",
                edge.a,
                edge.b
            );
        }
        // The punctuation variants clear 0.8 but not 0.99.
        assert!(!loose.is_empty());
        assert!(strict.is_empty());
    }

    #[test]
    fn exact_duplicates_short_circuit_to_one() {
        // Case/whitespace variants share a fingerprint and must score 1.0
        // even at the strictest threshold.
        let records = vec![
            record("a", "Write a poem", "Compose a short poem about the sea."),
            record("b", "write  a poem", "Compose a short  poem about the sea."),
        ];
        let edges = find_edges(&records, 1.0, &DedupeParams::default(), &NoProgress);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].score, 1.0);
    }

    #[test]
    fn fewer_than_two_records_no_edges() {
        let params = DedupeParams::default();
        assert!(find_edges(&[], 0.8, &params, &NoProgress).is_empty());
        let one = vec![record("a", "t", "b")];
        assert!(find_edges(&one, 0.8, &params, &NoProgress).is_empty());
    }

    #[test]
    fn progress_hits_deciles_up_to_completion() {
        let records: Vec<Record> = (0..30)
            .map(|i| record(&format!("r{}", i), &format!("title {}", i), &format!("body {}", i)))
            .collect();
        let reporter = CollectingReporter {
            events: Mutex::new(Vec::new()),
        };
        find_edges(&records, 0.8, &DedupeParams::default(), &reporter);

        let events = reporter.events.lock().unwrap();
        assert!(!events.is_empty());
        // Percentages are nondecreasing and end at 100.
        let percents: Vec<u8> = events.iter().map(|(_, _, p)| *p).collect();
        assert!(percents.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*percents.last().unwrap(), 100);
        // Coarse-grained: at most one event per decile.
        assert!(events.len() <= 10);
    }
}
