use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::CheckoutReceiptDto;
use kernel::prelude::entity::PaymentStatus;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentedBookResponse {
    book_id: Uuid,
    rental_duration: i32,
    rent_price: f64,
    #[serde(with = "time::serde::rfc3339")]
    rent_start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    rent_end_date: OffsetDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    payment_id: Uuid,
    total_amount: f64,
    status: PaymentStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    processed_at: Option<OffsetDateTime>,
    rented_books: Vec<RentedBookResponse>,
}

pub struct Presenter;

impl Exhaust<CheckoutReceiptDto> for Presenter {
    type To = (StatusCode, Json<ReceiptResponse>);
    fn emit(&self, CheckoutReceiptDto { payment, rentals }: CheckoutReceiptDto) -> Self::To {
        let rented_books = rentals
            .into_iter()
            .map(|rental| {
                let rent_price = payment
                    .items
                    .iter()
                    .find(|item| item.book_id == rental.book_id)
                    .map(|item| item.rent_price)
                    .unwrap_or_default();
                RentedBookResponse {
                    book_id: rental.book_id,
                    rental_duration: rental.rental_duration,
                    rent_price,
                    rent_start_date: rental.start,
                    rent_end_date: rental.end,
                }
            })
            .collect();
        let receipt = ReceiptResponse {
            payment_id: payment.id,
            total_amount: payment.total_amount,
            status: payment.status,
            processed_at: payment.processed_at,
            rented_books,
        };
        (StatusCode::CREATED, Json(receipt))
    }
}
