use std::time::Instant;

use crate::candidate_store::CandidateStore;
use crate::session::{InputSession, KeyEvent};

fn p95_ms(samples: &mut [f64]) -> f64 {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let last = samples.len().saturating_sub(1);
    let idx = ((last as f64) * 0.95).round() as usize;
    samples[idx.min(last)]
}

fn large_store() -> CandidateStore {
    let mut store = CandidateStore::new();
    for i in 0..5_000 {
        store.add_word(&format!("tool-{i:05}"));
        store.add_word(&format!("x{i:04}-helper"));
    }
    store.add_word("firefox");
    store
}

#[test]
fn warm_keystroke_p95_under_15ms() {
    let store = large_store();

    for _ in 0..30 {
        let _ = store.best_matches("fx", 6);
    }

    let mut batch_p95 = Vec::with_capacity(5);
    for _ in 0..5 {
        let mut samples = Vec::with_capacity(80);
        for _ in 0..80 {
            let mut session = InputSession::new(&store, 6);
            let start = Instant::now();
            session.handle(KeyEvent::Char('f'));
            session.handle(KeyEvent::Char('x'));
            samples.push(start.elapsed().as_secs_f64() * 1000.0 / 2.0);
        }
        batch_p95.push(p95_ms(&mut samples));
    }

    batch_p95.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median_p95 = batch_p95[batch_p95.len() / 2];

    assert!(
        median_p95 <= 15.0,
        "median batch p95 too high: {median_p95:.3}ms (budget 15.0ms); batches={batch_p95:?}",
    );
}

#[test]
fn prefix_lookup_on_large_store_stays_bounded() {
    let store = large_store();
    let start = Instant::now();
    let matches = store.exact_matches("tool-0");
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    assert_eq!(matches.len(), 5_000);
    assert!(elapsed_ms <= 250.0, "prefix lookup took {elapsed_ms:.3}ms");
}
