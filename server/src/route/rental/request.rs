use serde::Deserialize;
use uuid::Uuid;

use application::transfer::CreateRentalDto;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentRequest {
    book_id: Uuid,
    rental_duration: i32,
}

pub struct Transformer;

impl Intake<(Uuid, RentRequest)> for Transformer {
    type To = CreateRentalDto;
    fn emit(&self, (user_id, input): (Uuid, RentRequest)) -> Self::To {
        CreateRentalDto {
            user_id,
            book_id: input.book_id,
            rental_duration: input.rental_duration,
        }
    }
}
