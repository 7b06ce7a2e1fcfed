//! Periodic re-check setting

use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// How often the checker re-runs on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    /// Run the first check only (interval unset or `0`)
    #[default]
    Once,
    /// Explicitly switched off (`null` or a negative interval); scheduled like `Once`
    Disabled,
    /// Re-check every period
    Every(Duration),
}

impl Interval {
    /// Interpret a millisecond value: positive repeats, `0` runs once, negative disables
    pub fn from_millis(ms: i64) -> Self {
        match ms {
            0 => Interval::Once,
            ms if ms < 0 => Interval::Disabled,
            ms => Interval::Every(Duration::from_millis(ms.unsigned_abs())),
        }
    }

    /// The timer period, if a timer should run at all
    pub fn period(&self) -> Option<Duration> {
        match self {
            Interval::Every(period) => Some(*period),
            Interval::Once | Interval::Disabled => None,
        }
    }
}

impl<'de> Deserialize<'de> for Interval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<i64>::deserialize(deserializer)? {
            Some(ms) => Interval::from_millis(ms),
            None => Interval::Disabled,
        })
    }
}
