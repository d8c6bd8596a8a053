use error_stack::Report;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::{KernelError, RejectReason, Rejection};

/// Star rating between 1 and 5.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct FeedbackRating(i32);

impl FeedbackRating {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 5;

    pub fn new(rating: impl Into<i32>) -> Self {
        Self(rating.into())
    }

    pub fn try_new(rating: impl Into<i32>) -> error_stack::Result<Self, KernelError> {
        let rating: i32 = rating.into();
        if (Self::MIN..=Self::MAX).contains(&rating) {
            Ok(Self(rating))
        } else {
            Err(Report::from(Rejection::new(
                RejectReason::InvalidRating,
                format!("rating {rating} is outside {}..={}", Self::MIN, Self::MAX),
            )))
        }
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct FeedbackComment(String);

impl FeedbackComment {
    pub fn new(comment: impl Into<String>) -> Self {
        Self(comment.into())
    }
}
