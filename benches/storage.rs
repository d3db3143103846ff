//! History store benchmark: encrypted append and recent-score reads.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fatigue_engine::features::FeatureWindow;
use fatigue_engine::storage::{HistoryStore, ScoredRecord};
use tempfile::tempdir;

fn make_record(i: usize) -> ScoredRecord {
    let window = FeatureWindow {
        timestamp: "2026-08-29T10:00:00Z".to_string(),
        typing_speed: 60.0,
        typing_variance: 1.5,
        backspace_rate: 0.05,
        backspace_burst_rate: 2.0,
        ctrl_z_rate: 1.0,
        mouse_speed: 320.5,
        mouse_distance: 1800.25,
        window_duration: 60.0,
    };
    ScoredRecord {
        id: format!("rec-{}", i),
        session_id: "bench".to_string(),
        ts: i as i64,
        timestamp: window.timestamp.clone(),
        window,
        fatigue_score: 0.35,
        rule_score: 0.2,
        ml_score: 0.4,
    }
}

fn bench_append(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let store = HistoryStore::open(&dir.path().join("history.db"), b"bench-secret").unwrap();
    let mut i = 0usize;

    c.bench_function("storage_append_record", |b| {
        b.iter(|| {
            i += 1;
            black_box(store.append(&make_record(i))).unwrap()
        })
    });
}

fn bench_recent_scores(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let store = HistoryStore::open(&dir.path().join("history.db"), b"bench-secret").unwrap();
    for i in 0..1000 {
        store.append(&make_record(i)).unwrap();
    }

    c.bench_function("storage_recent_scores", |b| {
        b.iter(|| black_box(store.recent_scores("bench", 5)).unwrap())
    });
}

criterion_group!(benches, bench_append, bench_recent_scores);
criterion_main!(benches);
