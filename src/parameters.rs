use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::error::{InvalidParametersSnafu, Result};

pub const DEFAULT_INITIAL_EASE: f64 = 2.5;
pub const MINIMUM_EASE: f64 = 1.3;
/// No cap: intervals only saturate at `u32::MAX` days.
pub const DEFAULT_MAXIMUM_INTERVAL: u32 = u32::MAX;

/// Tunables of the SM-2 style scheduler. Every field falls back to its default
/// when missing, so hosts can load partial overrides from JSON or TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    /// Subtracted from ease on "again".
    pub lapse_ease_penalty: f64,
    /// Subtracted from ease on "hard".
    pub hard_ease_penalty: f64,
    /// Added to ease on "easy".
    pub easy_ease_bonus: f64,
    pub hard_interval_factor: f64,
    /// Applied on top of ease for "easy" reviews of mature cards.
    pub easy_interval_factor: f64,
    /// Interval for "hard" on a card that was never reviewed.
    pub hard_step: u32,
    /// Intervals for the first and second "good" review.
    pub good_steps: [u32; 2],
    /// Intervals for the first and second "easy" review.
    pub easy_steps: [u32; 2],
    pub lapse_interval: u32,
    pub maximum_interval: u32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            initial_ease: DEFAULT_INITIAL_EASE,
            minimum_ease: MINIMUM_EASE,
            lapse_ease_penalty: 0.2,
            hard_ease_penalty: 0.15,
            easy_ease_bonus: 0.15,
            hard_interval_factor: 1.2,
            easy_interval_factor: 1.3,
            hard_step: 1,
            good_steps: [1, 6],
            easy_steps: [3, 7],
            lapse_interval: 1,
            maximum_interval: DEFAULT_MAXIMUM_INTERVAL,
        }
    }
}

pub(crate) fn check_parameters(parameters: &Parameters) -> Result<()> {
    let floats = [
        parameters.initial_ease,
        parameters.minimum_ease,
        parameters.lapse_ease_penalty,
        parameters.hard_ease_penalty,
        parameters.easy_ease_bonus,
        parameters.hard_interval_factor,
        parameters.easy_interval_factor,
    ];
    ensure!(
        floats.iter().all(|w| w.is_finite()),
        InvalidParametersSnafu {
            reason: "all factors must be finite",
        }
    );
    ensure!(
        parameters.minimum_ease > 0.0,
        InvalidParametersSnafu {
            reason: "minimum ease must be positive",
        }
    );
    ensure!(
        parameters.initial_ease >= parameters.minimum_ease,
        InvalidParametersSnafu {
            reason: "initial ease is below the minimum ease",
        }
    );
    ensure!(
        parameters.hard_interval_factor > 0.0 && parameters.easy_interval_factor > 0.0,
        InvalidParametersSnafu {
            reason: "interval factors must be positive",
        }
    );
    let steps = parameters
        .good_steps
        .iter()
        .chain(&parameters.easy_steps)
        .chain([&parameters.hard_step, &parameters.lapse_interval]);
    ensure!(
        steps.copied().all(|step| step >= 1),
        InvalidParametersSnafu {
            reason: "steps and the lapse interval must be at least one day",
        }
    );
    ensure!(
        parameters.maximum_interval >= 1,
        InvalidParametersSnafu {
            reason: "maximum interval must be at least one day",
        }
    );
    Ok(())
}
