use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BookId, Feedback};
use crate::KernelError;

#[async_trait::async_trait]
pub trait FeedbackQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Newest first.
    async fn find_by_book_id(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<Feedback>, KernelError>;
}

pub trait DependOnFeedbackQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type FeedbackQuery: FeedbackQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn feedback_query(&self) -> &Self::FeedbackQuery;
}
