use chrono::{DateTime, Utc};
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ensure};

use crate::card::{CardState, MILLIS_PER_DAY, Rating, Timestamp, check_timestamp, current_timestamp};
use crate::error::{InvalidArgumentSnafu, Result};
use crate::parameters::{Parameters, check_parameters};

/// One recorded answer, as kept in a review log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEvent {
    pub rating: Rating,
    pub timestamp: Timestamp,
}

/// The state a card would move to under each rating.
#[derive(Debug, Clone, PartialEq)]
pub struct NextStates {
    pub again: CardState,
    pub hard: CardState,
    pub good: CardState,
    pub easy: CardState,
}

impl NextStates {
    pub fn get(&self, rating: Rating) -> &CardState {
        match rating {
            Rating::Again => &self.again,
            Rating::Hard => &self.hard,
            Rating::Good => &self.good,
            Rating::Easy => &self.easy,
        }
    }
}

/// SM-2 style scheduler. It holds only its parameters; card states are owned
/// by the caller and every operation returns a fresh value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scheduler {
    parameters: Parameters,
}

impl Scheduler {
    /// `None` selects the default parameters.
    pub fn new(parameters: Option<&Parameters>) -> Result<Self> {
        let parameters = match parameters {
            Some(parameters) => {
                check_parameters(parameters)?;
                parameters.clone()
            }
            None => Parameters::default(),
        };
        Ok(Self { parameters })
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn create_initial_state(&self, id: impl Into<String>, now: Timestamp) -> Result<CardState> {
        let id = id.into();
        ensure!(
            !id.is_empty(),
            InvalidArgumentSnafu {
                reason: "card id must not be empty",
            }
        );
        check_timestamp(now)?;
        Ok(CardState {
            id,
            due: now,
            interval: 0,
            ease: self.parameters.initial_ease,
            reps: 0,
            lapses: 0,
        })
    }

    pub fn is_due(&self, state: &CardState, now: Timestamp) -> Result<bool> {
        check_timestamp(now)?;
        state.validate(self.parameters.minimum_ease)?;
        Ok(state.is_due_at(now))
    }

    /// Computes the state after `rating` was recorded at `now`. The new due
    /// date is `now` plus the new interval in days.
    pub fn schedule(&self, state: &CardState, rating: Rating, now: Timestamp) -> Result<CardState> {
        check_timestamp(now)?;
        state.validate(self.parameters.minimum_ease)?;
        let p = &self.parameters;

        let (interval, ease, reps, lapses) = match rating {
            Rating::Again => (
                p.lapse_interval,
                self.floor_ease(state.ease - p.lapse_ease_penalty),
                0,
                state.lapses.saturating_add(1),
            ),
            Rating::Hard => {
                let interval = if state.reps == 0 {
                    p.hard_step
                } else {
                    grow(state.interval, p.hard_interval_factor)
                };
                (
                    interval,
                    self.floor_ease(state.ease - p.hard_ease_penalty),
                    state.reps.max(1),
                    state.lapses,
                )
            }
            Rating::Good => {
                let interval = match state.reps {
                    0 => p.good_steps[0],
                    1 => p.good_steps[1],
                    _ => grow(state.interval, state.ease),
                };
                (
                    interval,
                    state.ease,
                    state.reps.saturating_add(1),
                    state.lapses,
                )
            }
            Rating::Easy => {
                let ease = self.floor_ease(state.ease + p.easy_ease_bonus);
                let interval = match state.reps {
                    0 => p.easy_steps[0],
                    1 => p.easy_steps[1],
                    _ => grow(state.interval, ease * p.easy_interval_factor),
                };
                (interval, ease, state.reps.saturating_add(1), state.lapses)
            }
        };
        let interval = interval.min(p.maximum_interval);
        let due = due_after(now, interval)?;
        debug!(
            "card {} rated {rating}: interval {} -> {interval} days, ease {:.2} -> {ease:.2}",
            state.id, state.interval, state.ease
        );

        Ok(CardState {
            id: state.id.clone(),
            due,
            interval,
            ease,
            reps,
            lapses,
        })
    }

    pub fn next_states(&self, state: &CardState, now: Timestamp) -> Result<NextStates> {
        Ok(NextStates {
            again: self.schedule(state, Rating::Again, now)?,
            hard: self.schedule(state, Rating::Hard, now)?,
            good: self.schedule(state, Rating::Good, now)?,
            easy: self.schedule(state, Rating::Easy, now)?,
        })
    }

    /// Rebuilds a card's state from its review log. Reviews are applied in
    /// timestamp order; reviews sharing a timestamp keep their log order.
    pub fn replay(
        &self,
        id: impl Into<String>,
        created_at: Timestamp,
        reviews: &[ReviewEvent],
    ) -> Result<CardState> {
        let initial = self.create_initial_state(id, created_at)?;
        reviews
            .iter()
            .sorted_by_key(|review| review.timestamp)
            .try_fold(initial, |state, review| {
                ensure!(
                    review.timestamp >= created_at,
                    InvalidArgumentSnafu {
                        reason: format!(
                            "review at {} predates card creation at {created_at}",
                            review.timestamp
                        ),
                    }
                );
                self.schedule(&state, review.rating, review.timestamp)
            })
    }

    fn floor_ease(&self, ease: f64) -> f64 {
        ease.max(self.parameters.minimum_ease)
    }
}

fn grow(interval: u32, factor: f64) -> u32 {
    (interval as f64 * factor).round().max(1.0) as u32
}

fn due_after(now: Timestamp, interval: u32) -> Result<Timestamp> {
    now.checked_add(i64::from(interval) * MILLIS_PER_DAY)
        .context(InvalidArgumentSnafu {
            reason: format!("due date {interval} days after {now} overflows"),
        })
}

pub fn create_initial_state(id: impl Into<String>, now: Timestamp) -> Result<CardState> {
    Scheduler::default().create_initial_state(id, now)
}

pub fn create_initial_state_now(id: impl Into<String>) -> Result<CardState> {
    create_initial_state(id, current_timestamp())
}

pub fn is_due(state: &CardState, now: Timestamp) -> Result<bool> {
    Scheduler::default().is_due(state, now)
}

pub fn schedule(state: &CardState, rating: Rating, now: Timestamp) -> Result<CardState> {
    Scheduler::default().schedule(state, rating, now)
}

pub fn schedule_now(state: &CardState, rating: Rating) -> Result<CardState> {
    schedule(state, rating, current_timestamp())
}

pub fn next_due(state: &CardState) -> Result<DateTime<Utc>> {
    state.due_date()
}
