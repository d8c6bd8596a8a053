use vodca::References;

use crate::entity::FeedbackRating;

/// Running sum of feedback ratings for a book.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, References)]
pub struct BookRating {
    total: i64,
    count: i32,
}

impl BookRating {
    pub fn new(total: impl Into<i64>, count: impl Into<i32>) -> Self {
        Self {
            total: total.into(),
            count: count.into(),
        }
    }

    pub fn record(&self, rating: &FeedbackRating) -> Self {
        Self {
            total: self.total + i64::from(rating.value()),
            count: self.count + 1,
        }
    }

    pub fn average(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.total as f64 / f64::from(self.count))
        }
    }
}

#[cfg(test)]
mod test {
    use crate::entity::{BookRating, FeedbackRating};

    #[test]
    fn average_of_recorded_ratings() {
        let rating = BookRating::default();
        assert_eq!(rating.average(), None);
        let rating = rating
            .record(&FeedbackRating::new(5))
            .record(&FeedbackRating::new(2));
        assert_eq!(*rating.count(), 2);
        assert_eq!(rating.average(), Some(3.5));
    }
}
