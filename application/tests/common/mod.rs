#![allow(dead_code)]

pub mod faulty;

use std::time::Duration;

use uuid::Uuid;

use application::service::{
    AddCartItemService, CheckoutPolicy, CreateBookService, CreateUserService,
};
use application::transfer::{AddCartItemDto, CreateBookDto, CreateUserDto};
use driver::database::InMemoryDatabase;
use kernel::KernelError;

pub fn policy() -> CheckoutPolicy {
    CheckoutPolicy {
        max_attempts: 3,
        attempt_timeout: Duration::from_secs(5),
        retry_backoff: Duration::from_millis(1),
    }
}

pub async fn user(db: &InMemoryDatabase) -> error_stack::Result<Uuid, KernelError> {
    db.create_user(CreateUserDto {
        name: "reader".to_string(),
        email: format!("{}@example.com", Uuid::new_v4()),
        password: "rental-secret".to_string(),
        phone_no: None,
    })
    .await
}

pub async fn book(
    db: &InMemoryDatabase,
    price: f64,
    quantity: i32,
) -> error_stack::Result<Uuid, KernelError> {
    db.create_book(CreateBookDto {
        title: "Dune".to_string(),
        author: "Frank Herbert".to_string(),
        description: "Desert planet".to_string(),
        image_url: None,
        category: "fiction".to_string(),
        rent_price: price,
        quantity,
    })
    .await
}

pub async fn add_to_cart(
    db: &InMemoryDatabase,
    user_id: Uuid,
    book_id: Uuid,
    days: i32,
) -> error_stack::Result<(), KernelError> {
    db.add_cart_item(AddCartItemDto {
        user_id,
        book_id,
        rental_duration: Some(days),
    })
    .await?;
    Ok(())
}
