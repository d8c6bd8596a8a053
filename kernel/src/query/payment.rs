use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Payment, PaymentId, PaymentStatus, SelectLimit, SelectOffset, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait PaymentQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &PaymentId,
    ) -> error_stack::Result<Option<Payment>, KernelError>;
    /// Newest first, optionally restricted to one status.
    async fn find_by_user_id(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        status: Option<&PaymentStatus>,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Payment>, KernelError>;
}

pub trait DependOnPaymentQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type PaymentQuery: PaymentQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn payment_query(&self) -> &Self::PaymentQuery;
}
