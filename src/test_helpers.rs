use crate::card::{CardState, MILLIS_PER_DAY, Timestamp};

/// 2025-01-01T00:00:00Z
pub(crate) const JAN_1_2025: Timestamp = 1_735_689_600_000;
pub(crate) const DAY: i64 = MILLIS_PER_DAY;

pub(crate) fn card(id: &str, due: Timestamp) -> CardState {
    CardState {
        id: id.into(),
        due,
        interval: 0,
        ease: 2.5,
        reps: 0,
        lapses: 0,
    }
}

pub(crate) fn mature_card(interval: u32, ease: f64, reps: u32) -> CardState {
    CardState {
        interval,
        ease,
        reps,
        ..card("mature", JAN_1_2025)
    }
}
