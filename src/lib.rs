mod card;
mod error;
mod exam;
mod parameters;
mod queue;
mod sampling;
mod scheduler;
#[cfg(test)]
mod test_helpers;

pub use card::{CardState, MILLIS_PER_DAY, Rating, Timestamp};
pub use error::{Result, SchedulerError};
pub use exam::{
    AnswerRecord, DEFAULT_PASSING_PERCENTAGE, DomainScore, ExamQuestion, ExamResult,
    exam_expires_at, is_exam_expired, remaining_time_seconds, score_exam, time_taken_minutes,
};
pub use parameters::{DEFAULT_INITIAL_EASE, DEFAULT_MAXIMUM_INTERVAL, MINIMUM_EASE, Parameters};
pub use queue::{due_count, get_due_queue};
pub use sampling::{
    DifficultyWeights, DomainWeights, SelectionCriterion, build_selection_criteria,
    sample_by_criteria, sample_by_domain_weights, sample_weighted, seeded_rng,
};
pub use scheduler::{
    NextStates, ReviewEvent, Scheduler, create_initial_state, create_initial_state_now, is_due,
    next_due, schedule, schedule_now,
};
