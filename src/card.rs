use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snafu::ensure;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::{InvalidArgumentSnafu, PreconditionViolationSnafu, Result, SchedulerError};

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// The learner's answer to a review. Buttons are numbered 1-4 in the usual
/// again/hard/good/easy order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// Parses a rating name as submitted by a UI or API layer.
    pub fn parse(value: &str) -> Result<Self> {
        Self::from_str(value).map_err(|_| SchedulerError::InvalidArgument {
            reason: format!("unrecognized rating {value:?}"),
        })
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl TryFrom<u8> for Rating {
    type Error = SchedulerError;

    fn try_from(button: u8) -> Result<Self> {
        match button {
            1 => Ok(Self::Again),
            2 => Ok(Self::Hard),
            3 => Ok(Self::Good),
            4 => Ok(Self::Easy),
            _ => InvalidArgumentSnafu {
                reason: format!("rating button must be 1-4, got {button}"),
            }
            .fail(),
        }
    }
}

/// Review state of one reviewable item for one learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardState {
    pub id: String,
    /// When the card becomes eligible for review.
    pub due: Timestamp,
    /// Current interval in whole days.
    pub interval: u32,
    pub ease: f64,
    /// Consecutive passing reviews since the last lapse.
    pub reps: u32,
    pub lapses: u32,
}

impl CardState {
    /// Inclusive: a card due exactly at `now` is due.
    pub fn is_due_at(&self, now: Timestamp) -> bool {
        self.due <= now
    }

    /// The due timestamp as a calendar instant.
    pub fn due_date(&self) -> Result<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.due).ok_or_else(|| {
            SchedulerError::InvalidArgument {
                reason: format!("due timestamp {} is out of range", self.due),
            }
        })
    }

    pub(crate) fn validate(&self, minimum_ease: f64) -> Result<()> {
        ensure!(
            self.ease.is_finite(),
            PreconditionViolationSnafu {
                id: self.id.as_str(),
                reason: format!("ease {} is not finite", self.ease),
            }
        );
        ensure!(
            self.ease >= minimum_ease,
            PreconditionViolationSnafu {
                id: self.id.as_str(),
                reason: format!("ease {} is below the floor {minimum_ease}", self.ease),
            }
        );
        ensure!(
            self.due >= 0,
            PreconditionViolationSnafu {
                id: self.id.as_str(),
                reason: format!("due timestamp {} is negative", self.due),
            }
        );
        Ok(())
    }
}

pub(crate) fn check_timestamp(now: Timestamp) -> Result<()> {
    ensure!(
        now >= 0,
        InvalidArgumentSnafu {
            reason: format!("timestamp {now} is negative"),
        }
    );
    Ok(())
}

pub(crate) fn current_timestamp() -> Timestamp {
    Utc::now().timestamp_millis()
}
