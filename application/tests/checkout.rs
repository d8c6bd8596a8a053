mod common;

use std::time::Duration;

use uuid::Uuid;

use application::service::{
    CheckoutPolicy, CheckoutService, GetBookService, GetCartService, GetPaymentService,
    GetUserService,
};
use application::transfer::{
    CheckoutDto, CheckoutItemDto, GetBookDto, GetCartDto, GetPaymentsDto, GetUserDto,
};
use driver::database::InMemoryDatabase;
use kernel::prelude::entity::{PaymentStatus, RentalStatus, SelectLimit, SelectOffset};
use kernel::{rejections_of, KernelError, RejectReason};

use crate::common::faulty::Faulty;
use crate::common::{add_to_cart, book, policy, user};

fn from_cart(user_id: Uuid) -> CheckoutDto {
    CheckoutDto {
        user_id,
        items: None,
        total_amount: None,
    }
}

async fn quantity(db: &InMemoryDatabase, book_id: Uuid) -> i32 {
    db.get_book(GetBookDto { id: book_id })
        .await
        .unwrap()
        .unwrap()
        .quantity
}

#[tokio::test]
async fn cart_becomes_rentals() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let user_id = user(&db).await?;
    let first = book(&db, 100.0, 2).await?;
    let second = book(&db, 50.0, 1).await?;
    add_to_cart(&db, user_id, first, 2).await?;
    add_to_cart(&db, user_id, second, 1).await?;

    let receipt = db.checkout(&policy(), from_cart(user_id)).await?;
    assert_eq!(receipt.payment.status, PaymentStatus::Completed);
    assert!((receipt.payment.total_amount - 250.0).abs() < 0.01);
    assert!(receipt.payment.processed_at.is_some());
    assert_eq!(receipt.rentals.len(), 2);
    assert!(receipt
        .rentals
        .iter()
        .all(|rental| rental.payment_id == Some(receipt.payment.id)));

    let cart = db.get_cart(GetCartDto { user_id }).await?;
    assert!(cart.items.is_empty());
    assert_eq!(quantity(&db, first).await, 1);
    assert_eq!(quantity(&db, second).await, 0);
    let sold_out = db.get_book(GetBookDto { id: second }).await?.unwrap();
    assert!(!sold_out.available);
    assert_eq!(sold_out.total_rentals, 1);
    assert!(receipt
        .rentals
        .iter()
        .all(|rental| rental.status == RentalStatus::Active));

    let profile = db.get_user(GetUserDto { id: user_id }).await?.unwrap();
    assert_eq!(profile.rentals.len(), 2);
    Ok(())
}

#[tokio::test]
async fn explicit_items_with_claimed_prices() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let user_id = user(&db).await?;
    let book_id = book(&db, 30.0, 3).await?;

    let receipt = db
        .checkout(
            &policy(),
            CheckoutDto {
                user_id,
                items: Some(vec![CheckoutItemDto {
                    book_id,
                    rental_duration: 4,
                    rent_price: Some(30.0),
                }]),
                total_amount: Some(120.0),
            },
        )
        .await?;
    assert_eq!(receipt.payment.items.len(), 1);
    assert_eq!(receipt.rentals[0].rental_duration, 4);
    assert_eq!(quantity(&db, book_id).await, 2);
    Ok(())
}

#[tokio::test]
async fn total_mismatch_changes_nothing() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let user_id = user(&db).await?;
    let first = book(&db, 100.0, 2).await?;
    let second = book(&db, 50.0, 1).await?;
    add_to_cart(&db, user_id, first, 2).await?;
    add_to_cart(&db, user_id, second, 1).await?;
    let before = db.snapshot().await;

    let report = db
        .checkout(
            &policy(),
            CheckoutDto {
                user_id,
                items: None,
                total_amount: Some(260.0),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Conflict);
    assert_eq!(
        rejections_of(&report)[0].reason(),
        &RejectReason::TotalMismatch
    );
    assert_eq!(db.snapshot().await, before);
    Ok(())
}

#[tokio::test]
async fn empty_cart_is_rejected() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let user_id = user(&db).await?;
    let report = db
        .checkout(&policy(), from_cart(user_id))
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Validation);
    assert_eq!(rejections_of(&report)[0].reason(), &RejectReason::EmptyCart);
    Ok(())
}

#[tokio::test]
async fn unknown_user_is_not_found() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let report = db
        .checkout(&policy(), from_cart(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::NotFound);
    assert_eq!(
        rejections_of(&report)[0].reason(),
        &RejectReason::UserNotFound
    );
    Ok(())
}

#[tokio::test]
async fn last_copy_goes_to_one_buyer() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let book_id = book(&db, 10.0, 1).await?;
    let alice = user(&db).await?;
    let bob = user(&db).await?;
    add_to_cart(&db, alice, book_id, 1).await?;
    add_to_cart(&db, bob, book_id, 1).await?;

    let handles = [alice, bob].map(|buyer| {
        let db = db.clone();
        tokio::spawn(async move { db.checkout(&policy(), from_cart(buyer)).await })
    });
    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap());
    }

    let winners = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(winners, 1);
    let loser = outcomes
        .into_iter()
        .find_map(Result::err)
        .unwrap();
    assert_eq!(loser.current_context(), &KernelError::Conflict);
    assert_eq!(
        rejections_of(&loser)[0].reason(),
        &RejectReason::Unavailable
    );
    assert_eq!(quantity(&db, book_id).await, 0);
    Ok(())
}

#[tokio::test]
async fn transient_commit_failures_are_retried() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let user_id = user(&db).await?;
    let book_id = book(&db, 10.0, 5).await?;
    add_to_cart(&db, user_id, book_id, 2).await?;

    db.fail_next_commits(2);
    let receipt = db.checkout(&policy(), from_cart(user_id)).await?;

    assert_eq!(quantity(&db, book_id).await, 4);
    let payments = db
        .get_payments(GetPaymentsDto {
            user_id,
            status: None,
            limit: SelectLimit::default(),
            offset: SelectOffset::default(),
        })
        .await?;
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].id, receipt.payment.id);
    Ok(())
}

#[tokio::test]
async fn gives_up_after_max_attempts() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let user_id = user(&db).await?;
    let book_id = book(&db, 10.0, 5).await?;
    add_to_cart(&db, user_id, book_id, 1).await?;
    let before = db.snapshot().await;

    let policy = CheckoutPolicy {
        max_attempts: 2,
        attempt_timeout: Duration::from_secs(5),
        retry_backoff: Duration::ZERO,
    };
    db.fail_next_commits(2);
    let report = db
        .checkout(&policy, from_cart(user_id))
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Concurrency);
    assert_eq!(db.snapshot().await, before);
    Ok(())
}

#[tokio::test]
async fn rejections_are_reported_together() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let user_id = user(&db).await?;
    let sold_out = book(&db, 10.0, 0).await?;
    let priced = book(&db, 20.0, 3).await?;

    let report = db
        .checkout(
            &policy(),
            CheckoutDto {
                user_id,
                items: Some(vec![
                    CheckoutItemDto {
                        book_id: sold_out,
                        rental_duration: 1,
                        rent_price: None,
                    },
                    CheckoutItemDto {
                        book_id: priced,
                        rental_duration: 1,
                        rent_price: Some(15.0),
                    },
                    CheckoutItemDto {
                        book_id: Uuid::new_v4(),
                        rental_duration: 1,
                        rent_price: None,
                    },
                ]),
                total_amount: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::NotFound);
    let reasons = rejections_of(&report)
        .into_iter()
        .map(|rejection| *rejection.reason())
        .collect::<Vec<_>>();
    assert_eq!(
        reasons,
        vec![
            RejectReason::Unavailable,
            RejectReason::PriceMismatch,
            RejectReason::BookNotFound
        ]
    );
    assert_eq!(quantity(&db, priced).await, 3);
    Ok(())
}

async fn payment_count(db: &InMemoryDatabase, user_id: Uuid) -> usize {
    db.get_payments(GetPaymentsDto {
        user_id,
        status: None,
        limit: SelectLimit::default(),
        offset: SelectOffset::default(),
    })
    .await
    .unwrap()
    .len()
}

#[tokio::test]
async fn lost_commit_ack_answers_with_stored_receipt() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let user_id = user(&db).await?;
    let book_id = book(&db, 25.0, 3).await?;
    add_to_cart(&db, user_id, book_id, 2).await?;

    db.lose_next_commit_acks(1);
    let receipt = db.checkout(&policy(), from_cart(user_id)).await?;

    assert_eq!(receipt.payment.status, PaymentStatus::Completed);
    assert!((receipt.payment.total_amount - 50.0).abs() < 0.01);
    assert_eq!(receipt.rentals.len(), 1);
    assert_eq!(receipt.rentals[0].payment_id, Some(receipt.payment.id));
    assert_eq!(payment_count(&db, user_id).await, 1);
    assert_eq!(quantity(&db, book_id).await, 2);
    assert!(db.get_cart(GetCartDto { user_id }).await?.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn lost_commit_ack_with_explicit_items_is_not_a_conflict(
) -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let user_id = user(&db).await?;
    let book_id = book(&db, 30.0, 3).await?;

    db.lose_next_commit_acks(1);
    let receipt = db
        .checkout(
            &policy(),
            CheckoutDto {
                user_id,
                items: Some(vec![CheckoutItemDto {
                    book_id,
                    rental_duration: 1,
                    rent_price: None,
                }]),
                total_amount: Some(30.0),
            },
        )
        .await?;

    assert_eq!(receipt.rentals.len(), 1);
    assert_eq!(payment_count(&db, user_id).await, 1);
    assert_eq!(quantity(&db, book_id).await, 2);
    Ok(())
}

#[tokio::test]
async fn slow_attempt_is_abandoned_and_retried() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let user_id = user(&db).await?;
    let book_id = book(&db, 10.0, 2).await?;
    add_to_cart(&db, user_id, book_id, 1).await?;

    let faulty = Faulty::new(db.clone()).slow_payments(1, Duration::from_millis(500));
    let policy = CheckoutPolicy {
        max_attempts: 3,
        attempt_timeout: Duration::from_millis(50),
        retry_backoff: Duration::from_millis(1),
    };
    let receipt = faulty.checkout(&policy, from_cart(user_id)).await?;

    assert_eq!(receipt.rentals.len(), 1);
    assert_eq!(payment_count(&db, user_id).await, 1);
    assert_eq!(quantity(&db, book_id).await, 1);
    Ok(())
}

#[tokio::test]
async fn attempts_past_deadline_surface_timeout() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let user_id = user(&db).await?;
    let book_id = book(&db, 10.0, 2).await?;
    add_to_cart(&db, user_id, book_id, 1).await?;
    let before = db.snapshot().await;

    let faulty = Faulty::new(db.clone()).slow_payments(u32::MAX, Duration::from_millis(500));
    let policy = CheckoutPolicy {
        max_attempts: 2,
        attempt_timeout: Duration::from_millis(30),
        retry_backoff: Duration::ZERO,
    };
    let report = faulty
        .checkout(&policy, from_cart(user_id))
        .await
        .unwrap_err();

    assert_eq!(report.current_context(), &KernelError::Timeout);
    assert_eq!(db.snapshot().await, before);
    Ok(())
}

#[tokio::test]
async fn failed_decrement_leaves_no_payment() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let user_id = user(&db).await?;
    let book_id = book(&db, 10.0, 2).await?;
    add_to_cart(&db, user_id, book_id, 1).await?;
    let before = db.snapshot().await;

    let faulty = Faulty::new(db.clone()).short_stock();
    let report = faulty
        .checkout(&policy(), from_cart(user_id))
        .await
        .unwrap_err();

    assert_eq!(report.current_context(), &KernelError::Conflict);
    assert_eq!(
        rejections_of(&report)[0].reason(),
        &RejectReason::Unavailable
    );
    assert_eq!(db.snapshot().await, before);
    assert_eq!(payment_count(&db, user_id).await, 0);
    Ok(())
}
