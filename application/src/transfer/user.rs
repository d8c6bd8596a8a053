use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{DestructUser, User};

use crate::transfer::RentalDto;

#[derive(Debug, Clone)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_no: Option<String>,
    pub created_at: OffsetDateTime,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let DestructUser {
            id,
            name,
            email,
            phone_no,
            created_at,
            ..
        } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone_no: phone_no.map(Into::into),
            created_at: created_at.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserProfileDto {
    pub user: UserDto,
    pub rentals: Vec<RentalDto>,
}

pub struct GetUserDto {
    pub id: Uuid,
}

pub struct CreateUserDto {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone_no: Option<String>,
}

pub struct VerifyCredentialDto {
    pub email: String,
    pub password: String,
}
