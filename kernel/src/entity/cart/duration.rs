use error_stack::Report;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::{KernelError, RejectReason, Rejection};

/// Rental length in whole days.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct RentalDuration(i32);

impl RentalDuration {
    pub const MIN_DAYS: i32 = 1;
    pub const MAX_DAYS: i32 = 30;
    pub const DEFAULT_DAYS: i32 = 1;

    /// Wraps a stored value without checking the policy bounds.
    pub fn new(days: impl Into<i32>) -> Self {
        Self(days.into())
    }

    pub fn try_new(days: impl Into<i32>) -> error_stack::Result<Self, KernelError> {
        let days: i32 = days.into();
        if Self::accepts(days) {
            Ok(Self(days))
        } else {
            Err(Report::from(Rejection::out_of_range_duration(days)))
        }
    }

    pub fn accepts(days: i32) -> bool {
        (Self::MIN_DAYS..=Self::MAX_DAYS).contains(&days)
    }

    pub fn days(&self) -> i32 {
        self.0
    }

    pub fn as_time(&self) -> time::Duration {
        time::Duration::days(i64::from(self.0))
    }
}

impl Default for RentalDuration {
    fn default() -> Self {
        Self(Self::DEFAULT_DAYS)
    }
}

impl Rejection {
    pub(crate) fn out_of_range_duration(days: i32) -> Self {
        Rejection::new(
            RejectReason::InvalidDuration,
            format!(
                "rental duration {days} is outside {}..={} days",
                RentalDuration::MIN_DAYS,
                RentalDuration::MAX_DAYS
            ),
        )
    }
}
