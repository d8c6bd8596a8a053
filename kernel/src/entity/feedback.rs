mod id;
mod rating;

pub use self::{id::*, rating::*};

use destructure::Destructure;
use vodca::References;

use crate::entity::{BookId, CreatedAt, UserId};

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Feedback {
    id: FeedbackId,
    book_id: BookId,
    user_id: UserId,
    rating: FeedbackRating,
    comment: Option<FeedbackComment>,
    created_at: CreatedAt<Feedback>,
}

impl Feedback {
    pub fn new(
        id: FeedbackId,
        book_id: BookId,
        user_id: UserId,
        rating: FeedbackRating,
        comment: Option<FeedbackComment>,
        created_at: CreatedAt<Feedback>,
    ) -> Self {
        Self {
            id,
            book_id,
            user_id,
            rating,
            comment,
            created_at,
        }
    }
}
