use destructure::{Destructure, Mutation};
use vodca::References;

use crate::entity::{BookId, BookTitle, CreatedAt, RentPrice, RentalDuration};

#[derive(Debug, Clone, PartialEq, References, Destructure, Mutation)]
pub struct CartItem {
    book_id: BookId,
    title: BookTitle,
    rent_price: RentPrice,
    rental_duration: RentalDuration,
    added_at: CreatedAt<CartItem>,
}

impl CartItem {
    pub fn new(
        book_id: BookId,
        title: BookTitle,
        rent_price: RentPrice,
        rental_duration: RentalDuration,
        added_at: CreatedAt<CartItem>,
    ) -> Self {
        Self {
            book_id,
            title,
            rent_price,
            rental_duration,
            added_at,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.rent_price.line_total(&self.rental_duration)
    }
}
