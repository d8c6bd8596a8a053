use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::RentalDto;
use kernel::prelude::entity::RentalStatus;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalResponse {
    book_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_id: Option<Uuid>,
    rental_duration: i32,
    #[serde(with = "time::serde::rfc3339")]
    rent_start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    rent_end_date: OffsetDateTime,
    status: RentalStatus,
}

impl From<RentalDto> for RentalResponse {
    fn from(value: RentalDto) -> Self {
        Self {
            book_id: value.book_id,
            payment_id: value.payment_id,
            rental_duration: value.rental_duration,
            rent_start_date: value.start,
            rent_end_date: value.end,
            status: value.status,
        }
    }
}

pub struct Presenter;

impl Exhaust<RentalDto> for Presenter {
    type To = (StatusCode, Json<RentalResponse>);
    fn emit(&self, input: RentalDto) -> Self::To {
        (StatusCode::CREATED, Json(RentalResponse::from(input)))
    }
}
