use uuid::Uuid;

use crate::transfer::{PaymentDto, RentalDto};

#[derive(Debug, Clone)]
pub struct CheckoutItemDto {
    pub book_id: Uuid,
    pub rental_duration: i32,
    /// Price the client saw. Checked against the catalog, never charged.
    pub rent_price: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CheckoutDto {
    pub user_id: Uuid,
    /// `None` checks out the stored cart.
    pub items: Option<Vec<CheckoutItemDto>>,
    pub total_amount: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CheckoutReceiptDto {
    pub payment: PaymentDto,
    pub rentals: Vec<RentalDto>,
}
