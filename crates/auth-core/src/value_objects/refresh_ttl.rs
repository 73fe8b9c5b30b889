//! Refresh token lifetime

use chrono::Duration;

const SECONDS_PER_DAY: i64 = 86_400;

/// Lifetime of a refresh token, expressed either in seconds or in whole days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTtl {
    Seconds(i64),
    Days(i64),
}

impl RefreshTtl {
    pub const DEFAULT_DAYS: i64 = 7;

    /// `None` when the lifetime does not fit in a [`Duration`]
    pub fn try_duration(self) -> Option<Duration> {
        match self {
            Self::Seconds(secs) => Duration::try_seconds(secs),
            Self::Days(days) => Duration::try_days(days),
        }
    }

    /// Informational lifetime in days, rounded to two decimals for second-based ttls
    #[allow(clippy::cast_precision_loss)]
    pub fn valid_days(self) -> f64 {
        match self {
            Self::Seconds(secs) => {
                ((secs as f64 / SECONDS_PER_DAY as f64) * 100.0).round() / 100.0
            }
            Self::Days(days) => days as f64,
        }
    }
}

impl Default for RefreshTtl {
    fn default() -> Self {
        Self::Days(Self::DEFAULT_DAYS)
    }
}
