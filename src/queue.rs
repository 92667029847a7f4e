use itertools::Itertools;
use log::trace;

use crate::card::{CardState, Timestamp, check_timestamp};
use crate::error::Result;
use crate::scheduler::Scheduler;

impl Scheduler {
    /// Cards due at `now`, earliest first. Cards sharing a due time keep their
    /// input order; duplicates are passed through.
    pub fn due_queue(&self, states: &[CardState], now: Timestamp) -> Result<Vec<CardState>> {
        self.check_states(states, now)?;
        let queue = states
            .iter()
            .filter(|state| state.is_due_at(now))
            .sorted_by_key(|state| state.due)
            .cloned()
            .collect_vec();
        trace!("{} of {} cards due at {now}", queue.len(), states.len());
        Ok(queue)
    }

    pub fn due_count(&self, states: &[CardState], now: Timestamp) -> Result<usize> {
        self.check_states(states, now)?;
        Ok(states.iter().filter(|state| state.is_due_at(now)).count())
    }

    fn check_states(&self, states: &[CardState], now: Timestamp) -> Result<()> {
        check_timestamp(now)?;
        states
            .iter()
            .try_for_each(|state| state.validate(self.parameters().minimum_ease))
    }
}

pub fn get_due_queue(states: &[CardState], now: Timestamp) -> Result<Vec<CardState>> {
    Scheduler::default().due_queue(states, now)
}

pub fn due_count(states: &[CardState], now: Timestamp) -> Result<usize> {
    Scheduler::default().due_count(states, now)
}
