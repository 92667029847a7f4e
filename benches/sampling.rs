use criterion::{Criterion, criterion_group, criterion_main};
use sr_scheduler::{
    DifficultyWeights, DomainWeights, build_selection_criteria, sample_by_criteria,
    sample_by_domain_weights, sample_weighted, seeded_rng,
};
use std::hint::black_box;

const DIFFICULTIES: [(&str, u32); 3] = [("easy", 30), ("medium", 50), ("hard", 20)];

const DOMAINS: [(&str, u32); 5] = [
    ("asking_questions", 22),
    ("refining_targeting", 23),
    ("taking_action", 15),
    ("navigation", 23),
    ("reporting", 17),
];

#[derive(Clone)]
struct Question {
    domain: &'static str,
    difficulty: &'static str,
    weight: f64,
}

fn bank(size: usize) -> Vec<Question> {
    (0..size)
        .map(|i| Question {
            domain: DOMAINS[i % DOMAINS.len()].0,
            difficulty: DIFFICULTIES[i % DIFFICULTIES.len()].0,
            weight: (i % 10) as f64 + 0.5,
        })
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let questions = bank(2000);
    let weights: DomainWeights = DOMAINS
        .iter()
        .map(|&(domain, weight)| (domain.to_string(), weight))
        .collect();
    let mut rng = seeded_rng(42);
    c.bench_function("mock exam of 65", |b| {
        b.iter(|| {
            black_box(
                sample_by_domain_weights(&questions, |q| q.domain, &weights, 65, &mut rng)
                    .unwrap(),
            )
        })
    });
    let difficulties: DifficultyWeights = DIFFICULTIES
        .iter()
        .map(|&(difficulty, weight)| (difficulty.to_string(), weight))
        .collect();
    let criteria = build_selection_criteria(&weights, &difficulties, 65).unwrap();
    c.bench_function("stratified mock exam of 65", |b| {
        b.iter(|| {
            black_box(sample_by_criteria(
                &questions,
                |q| q.domain,
                |q| q.difficulty,
                &criteria,
                &mut rng,
            ))
        })
    });
    c.bench_function("weighted drill of 20", |b| {
        b.iter(|| black_box(sample_weighted(&questions, |q| q.weight, 20, &mut rng).unwrap()))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
