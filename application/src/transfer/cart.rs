use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{Cart, CartItem, DestructCart, DestructCartItem};

#[derive(Debug, Clone)]
pub struct CartItemDto {
    pub book_id: Uuid,
    pub title: String,
    pub rent_price: f64,
    pub rental_duration: i32,
    pub line_total: f64,
    pub added_at: OffsetDateTime,
}

impl From<CartItem> for CartItemDto {
    fn from(value: CartItem) -> Self {
        let line_total = value.line_total();
        let DestructCartItem {
            book_id,
            title,
            rent_price,
            rental_duration,
            added_at,
        } = value.into_destruct();
        Self {
            book_id: book_id.into(),
            title: title.into(),
            rent_price: rent_price.into(),
            rental_duration: rental_duration.into(),
            line_total,
            added_at: added_at.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CartDto {
    pub user_id: Uuid,
    pub items: Vec<CartItemDto>,
    pub total_amount: f64,
}

impl From<Cart> for CartDto {
    fn from(value: Cart) -> Self {
        let total_amount = value.total().value();
        let DestructCart { user_id, items } = value.into_destruct();
        Self {
            user_id: user_id.into(),
            items: items.into_iter().map(CartItemDto::from).collect(),
            total_amount,
        }
    }
}

pub struct GetCartDto {
    pub user_id: Uuid,
}

pub struct AddCartItemDto {
    pub user_id: Uuid,
    pub book_id: Uuid,
    /// Falls back to the default rental length when absent.
    pub rental_duration: Option<i32>,
}

pub struct UpdateCartItemDto {
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub rental_duration: i32,
}

pub struct RemoveCartItemDto {
    pub user_id: Uuid,
    pub book_id: Uuid,
}
