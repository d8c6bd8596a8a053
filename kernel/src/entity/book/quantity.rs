use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Copies on hand. Never negative.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookQuantity(i32);

impl BookQuantity {
    pub fn new(quantity: impl Into<i32>) -> Self {
        let quantity: i32 = quantity.into();
        Self(quantity.max(0))
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// `None` when taking `amount` copies would go below zero.
    pub fn checked_sub(&self, amount: &BookQuantity) -> Option<BookQuantity> {
        self.0
            .checked_sub(amount.0)
            .filter(|remaining| *remaining >= 0)
            .map(BookQuantity)
    }
}

/// Outcome of a conditional stock decrement.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StockDecrement {
    Applied { remaining: BookQuantity },
    Insufficient,
    Missing,
}

#[cfg(test)]
mod test {
    use super::BookQuantity;

    #[test]
    fn never_negative() {
        assert_eq!(BookQuantity::new(-3), BookQuantity::new(0));
        let one = BookQuantity::new(1);
        assert_eq!(one.checked_sub(&one), Some(BookQuantity::new(0)));
        assert_eq!(BookQuantity::new(0).checked_sub(&one), None);
        assert!(!BookQuantity::new(0).is_positive());
    }
}
