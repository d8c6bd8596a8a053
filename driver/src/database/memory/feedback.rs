use kernel::interface::query::FeedbackQuery;
use kernel::interface::update::FeedbackModifier;
use kernel::prelude::entity::{BookId, Feedback};
use kernel::KernelError;

use crate::database::memory::{conflict, missing, InMemoryTransaction};

pub struct InMemoryFeedbackRepository;

#[async_trait::async_trait]
impl FeedbackQuery for InMemoryFeedbackRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_book_id(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<Feedback>, KernelError> {
        Ok(con
            .working
            .feedback
            .iter()
            .rev()
            .filter(|feedback| feedback.book_id() == book_id)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl FeedbackModifier for InMemoryFeedbackRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        feedback: &Feedback,
    ) -> error_stack::Result<(), KernelError> {
        let state = &mut con.working;
        if !state.books.contains_key(feedback.book_id())
            || !state.users.contains_key(feedback.user_id())
        {
            return Err(missing("feedback refers to an unknown book or user"));
        }
        if state.feedback.iter().any(|held| held.id() == feedback.id()) {
            return Err(conflict("feedback id already exists"));
        }
        state.feedback.push(feedback.clone());
        Ok(())
    }
}
