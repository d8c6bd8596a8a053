use destructure::Destructure;
use vodca::References;

use crate::entity::{BookId, RentPrice, RentalDuration};

/// Snapshot of one rented book at the price charged.
#[derive(Debug, Clone, PartialEq, References, Destructure)]
pub struct PaymentItem {
    book_id: BookId,
    rental_duration: RentalDuration,
    rent_price: RentPrice,
}

impl PaymentItem {
    pub fn new(book_id: BookId, rental_duration: RentalDuration, rent_price: RentPrice) -> Self {
        Self {
            book_id,
            rental_duration,
            rent_price,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.rent_price.line_total(&self.rental_duration)
    }
}
