use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{CreateUserDto, GetUserDto, VerifyCredentialDto};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    name: String,
    email: String,
    password: String,
    phone_no: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

pub struct Transformer;

impl Intake<CreateRequest> for Transformer {
    type To = CreateUserDto;
    fn emit(&self, input: CreateRequest) -> Self::To {
        CreateUserDto {
            name: input.name,
            email: input.email,
            password: input.password,
            phone_no: input.phone_no,
        }
    }
}

impl Intake<LoginRequest> for Transformer {
    type To = VerifyCredentialDto;
    fn emit(&self, input: LoginRequest) -> Self::To {
        VerifyCredentialDto {
            email: input.email,
            password: input.password,
        }
    }
}

impl Intake<Uuid> for Transformer {
    type To = GetUserDto;
    fn emit(&self, id: Uuid) -> Self::To {
        GetUserDto { id }
    }
}
