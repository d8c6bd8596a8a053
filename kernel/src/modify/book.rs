use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Book, BookId, BookQuantity, FeedbackRating, StockDecrement};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError>;
    /// Takes `amount` copies only if that many are on hand, keeping availability in step
    /// with the remaining quantity. Implementations must decide on the stored value, not
    /// on a quantity the caller read earlier. Copies taken are added to the book's
    /// lifetime rental count.
    async fn decrement_stock(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
        amount: &BookQuantity,
    ) -> error_stack::Result<StockDecrement, KernelError>;
    async fn record_rating(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
        rating: &FeedbackRating,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnBookModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookModifier: BookModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn book_modifier(&self) -> &Self::BookModifier;
}
