use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::{CartDto, CartItemDto};

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    book_id: Uuid,
    title: String,
    rent_price: f64,
    rental_duration: i32,
    line_total: f64,
    #[serde(with = "time::serde::rfc3339")]
    added_at: OffsetDateTime,
}

impl From<CartItemDto> for CartItemResponse {
    fn from(value: CartItemDto) -> Self {
        Self {
            book_id: value.book_id,
            title: value.title,
            rent_price: value.rent_price,
            rental_duration: value.rental_duration,
            line_total: value.line_total,
            added_at: value.added_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    items: Vec<CartItemResponse>,
    total_amount: f64,
}

pub struct Presenter;

impl Exhaust<CartDto> for Presenter {
    type To = Json<CartResponse>;
    fn emit(&self, input: CartDto) -> Self::To {
        Json(CartResponse {
            items: input.items.into_iter().map(CartItemResponse::from).collect(),
            total_amount: input.total_amount,
        })
    }
}
