use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{DestructRental, Rental, RentalStatus};

#[derive(Debug, Clone)]
pub struct RentalDto {
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub payment_id: Option<Uuid>,
    pub rental_duration: i32,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
    pub status: RentalStatus,
}

impl From<Rental> for RentalDto {
    fn from(value: Rental) -> Self {
        let DestructRental {
            user_id,
            book_id,
            payment_id,
            rental_duration,
            period,
            status,
        } = value.into_destruct();
        Self {
            user_id: user_id.into(),
            book_id: book_id.into(),
            payment_id: payment_id.map(Into::into),
            rental_duration: rental_duration.into(),
            start: *period.start(),
            end: *period.end(),
            status,
        }
    }
}

pub struct CreateRentalDto {
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub rental_duration: i32,
}
