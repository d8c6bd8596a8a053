use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::Feedback;
use crate::KernelError;

#[async_trait::async_trait]
pub trait FeedbackModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        feedback: &Feedback,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnFeedbackModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type FeedbackModifier: FeedbackModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn feedback_modifier(&self) -> &Self::FeedbackModifier;
}
