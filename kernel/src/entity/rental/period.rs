use time::OffsetDateTime;
use vodca::References;

use crate::entity::RentalDuration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, References)]
pub struct RentalPeriod {
    start: OffsetDateTime,
    end: OffsetDateTime,
}

impl RentalPeriod {
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self { start, end }
    }

    pub fn starting(start: OffsetDateTime, duration: &RentalDuration) -> Self {
        Self {
            start,
            end: start + duration.as_time(),
        }
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;

    use crate::entity::{RentalDuration, RentalPeriod};

    #[test]
    fn ends_after_duration() {
        let period =
            RentalPeriod::starting(datetime!(2024-01-30 12:00 UTC), &RentalDuration::new(3));
        assert_eq!(period.end(), &datetime!(2024-02-02 12:00 UTC));
    }
}
