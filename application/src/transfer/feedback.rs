use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{DestructFeedback, Feedback};

#[derive(Debug, Clone)]
pub struct FeedbackDto {
    pub id: Uuid,
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: OffsetDateTime,
}

impl From<Feedback> for FeedbackDto {
    fn from(value: Feedback) -> Self {
        let DestructFeedback {
            id,
            book_id,
            user_id,
            rating,
            comment,
            created_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            book_id: book_id.into(),
            user_id: user_id.into(),
            rating: rating.into(),
            comment: comment.map(Into::into),
            created_at: created_at.into(),
        }
    }
}

pub struct GetFeedbackDto {
    pub book_id: Uuid,
}

pub struct CreateFeedbackDto {
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
}
