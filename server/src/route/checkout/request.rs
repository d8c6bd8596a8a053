use axum::body::Bytes;
use error_stack::Report;
use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{CheckoutDto, CheckoutItemDto};
use kernel::{RejectReason, Rejection};

use crate::controller::TryIntake;
use crate::error::ErrorStatus;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutItemRequest {
    book_id: Uuid,
    rental_duration: i32,
    rent_price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutRequest {
    items: Option<Vec<CheckoutItemRequest>>,
    total_amount: Option<f64>,
}

pub struct Transformer;

/// (caller, raw body). An empty body checks out the stored cart.
impl TryIntake<(Uuid, Bytes)> for Transformer {
    type To = CheckoutDto;
    type Error = ErrorStatus;
    fn emit(&self, (user_id, body): (Uuid, Bytes)) -> Result<Self::To, Self::Error> {
        let request = if body.iter().all(u8::is_ascii_whitespace) {
            CheckoutRequest::default()
        } else {
            serde_json::from_slice::<CheckoutRequest>(&body).map_err(|e| {
                ErrorStatus::from(Report::from(Rejection::new(
                    RejectReason::InvalidRequest,
                    format!("malformed checkout body: {e}"),
                )))
            })?
        };
        Ok(CheckoutDto {
            user_id,
            items: request.items.map(|items| {
                items
                    .into_iter()
                    .map(|item| CheckoutItemDto {
                        book_id: item.book_id,
                        rental_duration: item.rental_duration,
                        rent_price: item.rent_price,
                    })
                    .collect()
            }),
            total_amount: request.total_amount,
        })
    }
}
