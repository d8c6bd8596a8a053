use kernel::interface::query::PaymentQuery;
use kernel::interface::update::PaymentModifier;
use kernel::prelude::entity::{
    Payment, PaymentId, PaymentStatus, SelectLimit, SelectOffset, UserId,
};
use kernel::KernelError;

use crate::database::memory::{conflict, missing, InMemoryTransaction};

pub struct InMemoryPaymentRepository;

#[async_trait::async_trait]
impl PaymentQuery for InMemoryPaymentRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &PaymentId,
    ) -> error_stack::Result<Option<Payment>, KernelError> {
        Ok(con
            .working
            .payments
            .iter()
            .find(|payment| payment.id() == id)
            .cloned())
    }

    async fn find_by_user_id(
        &self,
        con: &mut InMemoryTransaction,
        user_id: &UserId,
        status: Option<&PaymentStatus>,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Payment>, KernelError> {
        let limit: &i32 = limit.as_ref();
        let offset: &i32 = offset.as_ref();
        Ok(con
            .working
            .payments
            .iter()
            .rev()
            .filter(|payment| payment.user_id() == user_id)
            .filter(|payment| status.map_or(true, |status| payment.status() == status))
            .skip(*offset as usize)
            .take(*limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl PaymentModifier for InMemoryPaymentRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        payment: &Payment,
    ) -> error_stack::Result<(), KernelError> {
        let state = &mut con.working;
        if !state.users.contains_key(payment.user_id()) {
            return Err(missing("payer does not exist"));
        }
        if state.payments.iter().any(|held| held.id() == payment.id()) {
            return Err(conflict("payment id already exists"));
        }
        state.payments.push(payment.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        con: &mut InMemoryTransaction,
        payment: &Payment,
    ) -> error_stack::Result<(), KernelError> {
        match con
            .working
            .payments
            .iter_mut()
            .find(|held| held.id() == payment.id())
        {
            Some(held) => {
                *held = payment.clone();
                Ok(())
            }
            None => Err(missing("payment does not exist")),
        }
    }
}
