use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::FeedbackQuery;
use kernel::interface::update::FeedbackModifier;
use kernel::prelude::entity::{
    BookId, CreatedAt, Feedback, FeedbackComment, FeedbackId, FeedbackRating, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresFeedbackRepository;

#[async_trait::async_trait]
impl FeedbackQuery for PostgresFeedbackRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_book_id(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<Feedback>, KernelError> {
        PgFeedbackInternal::find_by_book_id(con, book_id).await
    }
}

#[async_trait::async_trait]
impl FeedbackModifier for PostgresFeedbackRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        feedback: &Feedback,
    ) -> error_stack::Result<(), KernelError> {
        PgFeedbackInternal::create(con, feedback).await
    }
}

#[derive(sqlx::FromRow)]
struct FeedbackRow {
    id: Uuid,
    book_id: Uuid,
    user_id: Uuid,
    rating: i32,
    comment: Option<String>,
    created_at: OffsetDateTime,
}

impl From<FeedbackRow> for Feedback {
    fn from(value: FeedbackRow) -> Self {
        Feedback::new(
            FeedbackId::new(value.id),
            BookId::new(value.book_id),
            UserId::new(value.user_id),
            FeedbackRating::new(value.rating),
            value.comment.map(FeedbackComment::new),
            CreatedAt::new(value.created_at),
        )
    }
}

pub(in crate::database) struct PgFeedbackInternal;

impl PgFeedbackInternal {
    async fn find_by_book_id(
        con: &mut PgConnection,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<Feedback>, KernelError> {
        let rows = sqlx::query_as::<_, FeedbackRow>(
            // language=postgresql
            r#"
            SELECT id, book_id, user_id, rating, comment, created_at
            FROM book_feedback
            WHERE book_id = $1
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(book_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Feedback::from).collect())
    }

    async fn create(
        con: &mut PgConnection,
        feedback: &Feedback,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO book_feedback (id, book_id, user_id, rating, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(feedback.id().as_ref())
        .bind(feedback.book_id().as_ref())
        .bind(feedback.user_id().as_ref())
        .bind(feedback.rating().value())
        .bind(feedback.comment().as_ref().map(AsRef::<String>::as_ref))
        .bind(feedback.created_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
