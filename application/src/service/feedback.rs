use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{
    BookQuery, DependOnBookQuery, DependOnFeedbackQuery, DependOnUserQuery, FeedbackQuery,
    UserQuery,
};
use kernel::interface::update::{
    BookModifier, DependOnBookModifier, DependOnFeedbackModifier, FeedbackModifier,
};
use kernel::prelude::entity::{
    BookId, CreatedAt, Feedback, FeedbackComment, FeedbackId, FeedbackRating, UserId,
};
use kernel::KernelError;

use crate::service::{book_not_found, user_not_found};
use crate::transfer::{CreateFeedbackDto, FeedbackDto, GetFeedbackDto};

#[async_trait::async_trait]
pub trait GetFeedbackService:
    'static + Sync + Send + DependOnBookQuery + DependOnFeedbackQuery
{
    async fn get_feedback(
        &self,
        dto: GetFeedbackDto,
    ) -> error_stack::Result<Vec<FeedbackDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let book_id = BookId::new(dto.book_id);
        if self
            .book_query()
            .find_by_id(&mut connection, &book_id)
            .await?
            .is_none()
        {
            return Err(book_not_found(&book_id));
        }
        let feedback = self
            .feedback_query()
            .find_by_book_id(&mut connection, &book_id)
            .await?;
        Ok(feedback.into_iter().map(FeedbackDto::from).collect())
    }
}

impl<T> GetFeedbackService for T where T: DependOnBookQuery + DependOnFeedbackQuery {}

/// Stores a review and folds its rating into the book's aggregate in one unit of work.
#[async_trait::async_trait]
pub trait CreateFeedbackService:
    'static
    + Sync
    + Send
    + DependOnUserQuery
    + DependOnBookQuery
    + DependOnBookModifier
    + DependOnFeedbackModifier
{
    async fn create_feedback(
        &self,
        dto: CreateFeedbackDto,
    ) -> error_stack::Result<FeedbackDto, KernelError> {
        let rating = FeedbackRating::try_new(dto.rating)?;
        let user_id = UserId::new(dto.user_id);
        let book_id = BookId::new(dto.book_id);

        let mut connection = self.database_connection().transact().await?;
        if self
            .user_query()
            .find_by_id(&mut connection, &user_id)
            .await?
            .is_none()
        {
            return Err(user_not_found(&user_id));
        }
        if self
            .book_query()
            .find_by_id(&mut connection, &book_id)
            .await?
            .is_none()
        {
            return Err(book_not_found(&book_id));
        }

        let feedback = Feedback::new(
            FeedbackId::new(Uuid::new_v4()),
            book_id.clone(),
            user_id,
            rating,
            dto.comment
                .filter(|comment| !comment.trim().is_empty())
                .map(FeedbackComment::new),
            CreatedAt::now(),
        );
        self.feedback_modifier()
            .create(&mut connection, &feedback)
            .await?;
        self.book_modifier()
            .record_rating(&mut connection, &book_id, &rating)
            .await?;
        connection.commit().await?;

        Ok(FeedbackDto::from(feedback))
    }
}

impl<T> CreateFeedbackService for T where
    T: DependOnUserQuery + DependOnBookQuery + DependOnBookModifier + DependOnFeedbackModifier
{
}
