use kernel::interface::query::RentalQuery;
use kernel::interface::update::RentalModifier;
use kernel::prelude::entity::{PaymentId, Rental, UserId};
use kernel::KernelError;

use crate::database::memory::{missing, InMemoryTransaction};

pub struct InMemoryRentalRepository;

#[async_trait::async_trait]
impl RentalQuery for InMemoryRentalRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_user_id(
        &self,
        con: &mut InMemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        let mut rentals = con
            .working
            .rentals
            .iter()
            .filter(|rental| rental.user_id() == user_id)
            .cloned()
            .collect::<Vec<_>>();
        rentals.sort_by_key(|rental| *rental.period().start());
        Ok(rentals)
    }

    async fn find_by_payment_id(
        &self,
        con: &mut InMemoryTransaction,
        payment_id: &PaymentId,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        Ok(con
            .working
            .rentals
            .iter()
            .filter(|rental| rental.payment_id().as_ref() == Some(payment_id))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl RentalModifier for InMemoryRentalRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        rental: &Rental,
    ) -> error_stack::Result<(), KernelError> {
        let state = &mut con.working;
        if !state.books.contains_key(rental.book_id()) || !state.users.contains_key(rental.user_id())
        {
            return Err(missing("rental refers to an unknown book or user"));
        }
        if let Some(payment_id) = rental.payment_id() {
            if !state.payments.iter().any(|payment| payment.id() == payment_id) {
                return Err(missing("rental refers to an unknown payment"));
            }
        }
        state.rentals.push(rental.clone());
        Ok(())
    }
}
