use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Cart, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait CartQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Items carry the current catalog price. A user without a cart gets an empty one.
    async fn find_by_user_id(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Cart, KernelError>;
}

pub trait DependOnCartQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type CartQuery: CartQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn cart_query(&self) -> &Self::CartQuery;
}
