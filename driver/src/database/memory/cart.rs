use kernel::interface::query::CartQuery;
use kernel::interface::update::CartModifier;
use kernel::prelude::entity::{BookId, Cart, CartItem, UserId};
use kernel::{KernelError, RejectReason, Rejection};

use crate::database::memory::{missing, InMemoryTransaction};

pub struct InMemoryCartRepository;

#[async_trait::async_trait]
impl CartQuery for InMemoryCartRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_user_id(
        &self,
        con: &mut InMemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Cart, KernelError> {
        let state = &con.working;
        let items = state
            .carts
            .get(user_id)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        let book = state.books.get(item.book_id())?;
                        Some(CartItem::new(
                            item.book_id().clone(),
                            book.title().clone(),
                            *book.rent_price(),
                            *item.rental_duration(),
                            item.added_at().clone(),
                        ))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(Cart::new(user_id.clone(), items))
    }
}

#[async_trait::async_trait]
impl CartModifier for InMemoryCartRepository {
    type Transaction = InMemoryTransaction;

    async fn add_item(
        &self,
        con: &mut InMemoryTransaction,
        user_id: &UserId,
        item: &CartItem,
    ) -> error_stack::Result<(), KernelError> {
        if !con.working.users.contains_key(user_id) {
            return Err(missing("cart owner does not exist"));
        }
        if !con.working.books.contains_key(item.book_id()) {
            return Err(missing("cart book does not exist"));
        }
        let items = con.working.carts.entry(user_id.clone()).or_default();
        if items.iter().any(|held| held.book_id() == item.book_id()) {
            return Err(Rejection::for_book(
                RejectReason::DuplicateItem,
                item.book_id(),
                "book is already in the cart",
            )
            .into());
        }
        items.push(item.clone());
        Ok(())
    }

    async fn update_item(
        &self,
        con: &mut InMemoryTransaction,
        user_id: &UserId,
        item: &CartItem,
    ) -> error_stack::Result<(), KernelError> {
        let held = con
            .working
            .carts
            .get_mut(user_id)
            .and_then(|items| items.iter_mut().find(|held| held.book_id() == item.book_id()));
        match held {
            Some(held) => {
                let duration = *item.rental_duration();
                held.substitute(|held| *held.rental_duration = duration);
                Ok(())
            }
            None => Err(missing("cart item does not exist")),
        }
    }

    async fn remove_item(
        &self,
        con: &mut InMemoryTransaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        if let Some(items) = con.working.carts.get_mut(user_id) {
            items.retain(|held| held.book_id() != book_id);
        }
        Ok(())
    }

    async fn clear(
        &self,
        con: &mut InMemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<(), KernelError> {
        con.working.carts.remove(user_id);
        Ok(())
    }
}
