mod period;
mod status;

pub use self::{period::*, status::*};

use destructure::Destructure;
use vodca::References;

use crate::entity::{BookId, PaymentId, RentalDuration, UserId};

/// One borrowed book. Appended on rental and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, References, Destructure)]
pub struct Rental {
    user_id: UserId,
    book_id: BookId,
    payment_id: Option<PaymentId>,
    rental_duration: RentalDuration,
    period: RentalPeriod,
    status: RentalStatus,
}

impl Rental {
    pub fn new(
        user_id: UserId,
        book_id: BookId,
        payment_id: Option<PaymentId>,
        rental_duration: RentalDuration,
        period: RentalPeriod,
        status: RentalStatus,
    ) -> Self {
        Self {
            user_id,
            book_id,
            payment_id,
            rental_duration,
            period,
            status,
        }
    }
}
