use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BookId, CartItem, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait CartModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Creates the cart on first use.
    async fn add_item(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        item: &CartItem,
    ) -> error_stack::Result<(), KernelError>;
    async fn update_item(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        item: &CartItem,
    ) -> error_stack::Result<(), KernelError>;
    async fn remove_item(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError>;
    async fn clear(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnCartModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type CartModifier: CartModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn cart_modifier(&self) -> &Self::CartModifier;
}
