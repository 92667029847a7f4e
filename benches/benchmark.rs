use std::hint::black_box;

use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use itertools::Itertools;
use sr_scheduler::{CardState, MILLIS_PER_DAY, Rating, ReviewEvent, Scheduler};

const NOW: i64 = 1_735_689_600_000;

pub(crate) fn review_log(len: usize) -> Vec<ReviewEvent> {
    let ratings = [Rating::Good, Rating::Good, Rating::Hard, Rating::Easy, Rating::Again];
    (0..len)
        .map(|i| ReviewEvent {
            rating: ratings[i % ratings.len()],
            timestamp: NOW + i as i64 * MILLIS_PER_DAY,
        })
        .collect_vec()
}

pub(crate) fn deck(size: usize) -> Vec<CardState> {
    (0..size)
        .map(|i| CardState {
            id: format!("card-{i}"),
            due: NOW + ((i * 7919) % 60) as i64 * MILLIS_PER_DAY - 30 * MILLIS_PER_DAY,
            interval: (i % 40) as u32 + 1,
            ease: 2.5,
            reps: (i % 5) as u32,
            lapses: 0,
        })
        .collect_vec()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let scheduler = Scheduler::default();
    let card = deck(1).remove(0);
    c.bench_function("next_states", |b| {
        b.iter(|| black_box(scheduler.next_states(black_box(&card), NOW).unwrap()))
    });
    let log = review_log(100);
    c.bench_function("replay 100 reviews", |b| {
        b.iter(|| black_box(scheduler.replay("card", NOW, black_box(&log)).unwrap()))
    });
    let states = deck(10_000);
    c.bench_function("due_queue 10k", |b| {
        b.iter(|| black_box(scheduler.due_queue(black_box(&states), NOW).unwrap()))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
