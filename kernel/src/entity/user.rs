mod email;
mod id;
mod name;
mod password;

pub use self::{email::*, id::*, name::*, password::*};
use crate::entity::common::CreatedAt;
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, Destructure, References)]
pub struct User {
    id: UserId,
    name: UserName,
    email: UserEmail,
    password: PasswordHash,
    phone_no: Option<PhoneNumber>,
    created_at: CreatedAt<User>,
}

impl User {
    pub fn new(
        id: UserId,
        name: UserName,
        email: UserEmail,
        password: PasswordHash,
        phone_no: Option<PhoneNumber>,
        created_at: CreatedAt<User>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password,
            phone_no,
            created_at,
        }
    }
}
