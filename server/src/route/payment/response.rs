use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::{PaymentDto, PaymentItemDto};
use kernel::prelude::entity::PaymentStatus;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentItemResponse {
    book_id: Uuid,
    rental_duration: i32,
    rent_price: f64,
    line_total: f64,
}

impl From<PaymentItemDto> for PaymentItemResponse {
    fn from(value: PaymentItemDto) -> Self {
        Self {
            book_id: value.book_id,
            rental_duration: value.rental_duration,
            rent_price: value.rent_price,
            line_total: value.line_total,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    id: Uuid,
    items: Vec<PaymentItemResponse>,
    total_amount: f64,
    status: PaymentStatus,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    processed_at: Option<OffsetDateTime>,
}

impl From<PaymentDto> for PaymentResponse {
    fn from(value: PaymentDto) -> Self {
        Self {
            id: value.id,
            items: value.items.into_iter().map(PaymentItemResponse::from).collect(),
            total_amount: value.total_amount,
            status: value.status,
            created_at: value.created_at,
            processed_at: value.processed_at,
        }
    }
}

impl IntoResponse for PaymentResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub struct Presenter;

impl Exhaust<Option<PaymentDto>> for Presenter {
    type To = Option<PaymentResponse>;
    fn emit(&self, input: Option<PaymentDto>) -> Self::To {
        input.map(PaymentResponse::from)
    }
}

impl Exhaust<Vec<PaymentDto>> for Presenter {
    type To = Json<Vec<PaymentResponse>>;
    fn emit(&self, input: Vec<PaymentDto>) -> Self::To {
        Json(input.into_iter().map(PaymentResponse::from).collect())
    }
}
