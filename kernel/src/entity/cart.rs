mod duration;
mod item;

pub use self::{duration::*, item::*};

use destructure::Destructure;
use error_stack::Report;
use vodca::References;

use crate::entity::{BookId, TotalAmount, UserId};
use crate::{KernelError, RejectReason, Rejection};

/// A user's pending selection. Holds at most one entry per book.
#[derive(Debug, Clone, PartialEq, References, Destructure)]
pub struct Cart {
    user_id: UserId,
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new(user_id: UserId, items: Vec<CartItem>) -> Self {
        Self { user_id, items }
    }

    pub fn empty(user_id: UserId) -> Self {
        Self::new(user_id, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, book_id: &BookId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.book_id() == book_id)
    }

    pub fn add(&mut self, item: CartItem) -> error_stack::Result<(), KernelError> {
        if self.find(item.book_id()).is_some() {
            return Err(Report::from(Rejection::for_book(
                RejectReason::DuplicateItem,
                item.book_id(),
                "book is already in the cart",
            )));
        }
        self.items.push(item);
        Ok(())
    }

    pub fn change_duration(
        &mut self,
        book_id: &BookId,
        duration: RentalDuration,
    ) -> error_stack::Result<&CartItem, KernelError> {
        let Some(item) = self.items.iter_mut().find(|item| item.book_id() == book_id) else {
            return Err(Report::from(Rejection::for_book(
                RejectReason::NotInCart,
                book_id,
                "book is not in the cart",
            )));
        };
        item.substitute(|item| *item.rental_duration = duration);
        Ok(item)
    }

    /// Removing a book that is not in the cart is a no-op.
    pub fn remove(&mut self, book_id: &BookId) -> Option<CartItem> {
        let position = self.items.iter().position(|item| item.book_id() == book_id)?;
        Some(self.items.remove(position))
    }

    pub fn total(&self) -> TotalAmount {
        TotalAmount::sum(self.items.iter().map(CartItem::line_total))
    }
}
