use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{GetPaymentDto, GetPaymentsDto};
use kernel::prelude::entity::{SelectLimit, SelectOffset};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct GetAllRequest {
    status: Option<String>,
    #[serde(default)]
    limit: SelectLimit,
    #[serde(default)]
    offset: SelectOffset,
}

pub struct Transformer;

/// (caller, payment)
impl Intake<(Uuid, Uuid)> for Transformer {
    type To = GetPaymentDto;
    fn emit(&self, (user_id, id): (Uuid, Uuid)) -> Self::To {
        GetPaymentDto { user_id, id }
    }
}

impl Intake<(Uuid, GetAllRequest)> for Transformer {
    type To = GetPaymentsDto;
    fn emit(&self, (user_id, input): (Uuid, GetAllRequest)) -> Self::To {
        GetPaymentsDto {
            user_id,
            status: input.status,
            limit: input.limit,
            offset: input.offset,
        }
    }
}
