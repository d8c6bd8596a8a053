use kernel::interface::query::UserQuery;
use kernel::interface::update::UserModifier;
use kernel::prelude::entity::{User, UserEmail, UserId};
use kernel::{KernelError, RejectReason, Rejection};

use crate::database::memory::{conflict, InMemoryTransaction};

pub struct InMemoryUserRepository;

#[async_trait::async_trait]
impl UserQuery for InMemoryUserRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        Ok(con.working.users.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        con: &mut InMemoryTransaction,
        email: &UserEmail,
    ) -> error_stack::Result<Option<User>, KernelError> {
        Ok(con
            .working
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }
}

#[async_trait::async_trait]
impl UserModifier for InMemoryUserRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        user: &User,
    ) -> error_stack::Result<(), KernelError> {
        let users = &mut con.working.users;
        if users.contains_key(user.id()) {
            return Err(conflict("user id already exists"));
        }
        if users.values().any(|held| held.email() == user.email()) {
            return Err(
                Rejection::new(RejectReason::EmailTaken, "email is already registered").into(),
            );
        }
        users.insert(user.id().clone(), user.clone());
        Ok(())
    }
}
