//! Question selection for drills and mock exams.
//!
//! Both samplers take the random number generator as an argument so that a
//! session can be reproduced from its seed.

use std::collections::BTreeMap;

use itertools::Itertools;
use log::warn;
use rand::distr::Distribution;
use rand::distr::weighted::{Error as WeightError, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::error::{InvalidArgumentSnafu, Result};

/// Relative weight of each domain in an exam blueprint, e.g. the published
/// percentage of questions per domain. Iteration order is the key order, which
/// keeps seeded sampling reproducible.
pub type DomainWeights = BTreeMap<String, u32>;

/// Relative weight of each difficulty level (e.g. `easy`, `medium`, `hard`)
/// applied within every domain.
pub type DifficultyWeights = BTreeMap<String, u32>;

/// How many questions of one difficulty to draw from one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCriterion {
    pub domain: String,
    pub difficulty: String,
    pub count: usize,
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Stratified sampling for a mock exam.
///
/// Each domain receives `round(weight / total * count)` randomly chosen items.
/// Slots left over (domains with too few items, rounding) are filled from the
/// unused items, then the whole selection is shuffled and cut to `count`.
/// Returns fewer than `count` items only when the pool itself is smaller.
pub fn sample_by_domain_weights<T, F, R>(
    items: &[T],
    domain_of: F,
    weights: &DomainWeights,
    count: usize,
    rng: &mut R,
) -> Result<Vec<T>>
where
    T: Clone,
    F: Fn(&T) -> &str,
    R: Rng + ?Sized,
{
    if count == 0 {
        return Ok(Vec::new());
    }
    let total: u64 = weights.values().map(|&w| u64::from(w)).sum();
    ensure!(
        total > 0,
        InvalidArgumentSnafu {
            reason: "domain weights sum to zero",
        }
    );

    let by_domain = items
        .iter()
        .enumerate()
        .into_group_map_by(|&(_, item)| domain_of(item));
    let mut used = vec![false; items.len()];
    let mut selected = Vec::with_capacity(count);

    for (domain, &weight) in weights {
        let Some(pool) = by_domain.get(domain.as_str()) else {
            warn!("no questions found for domain {domain}");
            continue;
        };
        let quota = (weight as f64 / total as f64 * count as f64).round() as usize;
        let mut pool = pool.iter().map(|&(index, _)| index).collect_vec();
        pool.shuffle(rng);
        for index in pool.into_iter().take(quota) {
            used[index] = true;
            selected.push(index);
        }
    }

    if selected.len() < count {
        let mut rest = (0..items.len()).filter(|&index| !used[index]).collect_vec();
        rest.shuffle(rng);
        let missing = count - selected.len();
        selected.extend(rest.into_iter().take(missing));
    }
    if selected.len() < count {
        warn!(
            "only {} questions available, {count} requested",
            selected.len()
        );
    }

    selected.shuffle(rng);
    selected.truncate(count);
    Ok(selected.into_iter().map(|index| items[index].clone()).collect())
}

/// Splits an exam of `count` questions into per-(domain, difficulty) quotas.
///
/// A domain gets `round(weight / total * count)` questions, which are then
/// divided as `round(domain_count * difficulty_weight / difficulty_total)`.
/// Empty quotas are left out.
pub fn build_selection_criteria(
    domain_weights: &DomainWeights,
    difficulty_weights: &DifficultyWeights,
    count: usize,
) -> Result<Vec<SelectionCriterion>> {
    let domain_total: u64 = domain_weights.values().map(|&w| u64::from(w)).sum();
    let difficulty_total: u64 = difficulty_weights.values().map(|&w| u64::from(w)).sum();
    ensure!(
        domain_total > 0 && difficulty_total > 0,
        InvalidArgumentSnafu {
            reason: "domain and difficulty weights must not sum to zero",
        }
    );

    let criteria = domain_weights
        .iter()
        .flat_map(move |(domain, &weight)| {
            let domain_count = (weight as f64 / domain_total as f64 * count as f64).round();
            difficulty_weights
                .iter()
                .map(move |(difficulty, &share)| SelectionCriterion {
                    domain: domain.clone(),
                    difficulty: difficulty.clone(),
                    count: (domain_count * share as f64 / difficulty_total as f64).round() as usize,
                })
        })
        .filter(|criterion| criterion.count > 0)
        .collect_vec();
    Ok(criteria)
}

/// Draws each criterion's quota at random from the items matching its domain
/// and difficulty, then shuffles the whole selection. A criterion with too
/// few matching items contributes what it has; no slot is refilled from
/// other criteria.
pub fn sample_by_criteria<T, D, L, R>(
    items: &[T],
    domain_of: D,
    difficulty_of: L,
    criteria: &[SelectionCriterion],
    rng: &mut R,
) -> Vec<T>
where
    T: Clone,
    D: Fn(&T) -> &str,
    L: Fn(&T) -> &str,
    R: Rng + ?Sized,
{
    let by_cell = items
        .iter()
        .enumerate()
        .into_group_map_by(|&(_, item)| (domain_of(item), difficulty_of(item)));
    let mut used = vec![false; items.len()];
    let mut selected = Vec::new();

    for criterion in criteria {
        let key = (criterion.domain.as_str(), criterion.difficulty.as_str());
        let mut pool = by_cell
            .get(&key)
            .map(|cell| {
                cell.iter()
                    .map(|&(index, _)| index)
                    .filter(|&index| !used[index])
                    .collect_vec()
            })
            .unwrap_or_default();
        if pool.len() < criterion.count {
            warn!(
                "only {} {} questions found for domain {}, {} requested",
                pool.len(),
                criterion.difficulty,
                criterion.domain,
                criterion.count
            );
        }
        pool.shuffle(rng);
        for index in pool.into_iter().take(criterion.count) {
            used[index] = true;
            selected.push(index);
        }
    }

    selected.shuffle(rng);
    selected.into_iter().map(|index| items[index].clone()).collect()
}

/// Draws up to `count` distinct items, each pick proportional to its weight
/// among the items not yet drawn. Once only zero-weight items remain they
/// are drawn uniformly.
pub fn sample_weighted<T, F, R>(
    items: &[T],
    weight_of: F,
    count: usize,
    rng: &mut R,
) -> Result<Vec<T>>
where
    T: Clone,
    F: Fn(&T) -> f64,
    R: Rng + ?Sized,
{
    let weights = items.iter().map(&weight_of).collect_vec();
    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return InvalidArgumentSnafu {
            reason: format!("sampling weight {bad} must be finite and non-negative"),
        }
        .fail();
    }
    ensure!(
        weights.iter().sum::<f64>().is_finite(),
        InvalidArgumentSnafu {
            reason: "sampling weights overflow when summed",
        }
    );

    let mut remaining = (0..items.len()).collect_vec();
    let mut picked = Vec::with_capacity(count.min(items.len()));
    while picked.len() < count && !remaining.is_empty() {
        let position = match WeightedIndex::new(remaining.iter().map(|&index| weights[index])) {
            Ok(distribution) => distribution.sample(rng),
            Err(WeightError::InsufficientNonZero) => rng.random_range(0..remaining.len()),
            Err(e) => {
                return InvalidArgumentSnafu {
                    reason: format!("cannot sample by weight: {e}"),
                }
                .fail();
            }
        };
        picked.push(items[remaining.remove(position)].clone());
    }
    Ok(picked)
}
