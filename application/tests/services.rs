mod common;

use uuid::Uuid;

use application::service::{
    CheckoutService, CreateFeedbackService, CreateUserService, GetBookService, GetCartService,
    GetFeedbackService, GetPaymentService, GetUserService, RemoveCartItemService,
    RentBookService, UpdateCartItemService, VerifyCredentialService,
};
use application::transfer::{
    CheckoutDto, CreateFeedbackDto, CreateRentalDto, CreateUserDto, GetBookDto, GetCartDto,
    GetFeedbackDto, GetPaymentDto, GetPaymentsDto, GetUserDto, RemoveCartItemDto,
    UpdateCartItemDto, VerifyCredentialDto,
};
use driver::database::InMemoryDatabase;
use kernel::prelude::entity::{SelectLimit, SelectOffset};
use kernel::{rejections_of, KernelError, RejectReason};

use crate::common::{add_to_cart, book, policy, user};

fn reason(report: &error_stack::Report<KernelError>) -> RejectReason {
    *rejections_of(report)[0].reason()
}

#[tokio::test]
async fn cart_keeps_one_line_per_book() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let user_id = user(&db).await?;
    let book_id = book(&db, 40.0, 2).await?;
    add_to_cart(&db, user_id, book_id, 1).await?;

    let report = add_to_cart(&db, user_id, book_id, 3).await.unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Validation);
    assert_eq!(reason(&report), RejectReason::DuplicateItem);

    let cart = db.get_cart(GetCartDto { user_id }).await?;
    assert_eq!(cart.items.len(), 1);
    assert!((cart.total_amount - 40.0).abs() < 0.01);
    Ok(())
}

#[tokio::test]
async fn cart_rejects_bad_duration_and_unknown_refs() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let user_id = user(&db).await?;
    let book_id = book(&db, 40.0, 2).await?;

    let report = add_to_cart(&db, user_id, book_id, 31).await.unwrap_err();
    assert_eq!(reason(&report), RejectReason::InvalidDuration);
    let report = add_to_cart(&db, user_id, Uuid::new_v4(), 1)
        .await
        .unwrap_err();
    assert_eq!(reason(&report), RejectReason::BookNotFound);
    let report = add_to_cart(&db, Uuid::new_v4(), book_id, 1)
        .await
        .unwrap_err();
    assert_eq!(reason(&report), RejectReason::UserNotFound);
    Ok(())
}

#[tokio::test]
async fn cart_update_and_remove() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let user_id = user(&db).await?;
    let book_id = book(&db, 25.0, 2).await?;
    add_to_cart(&db, user_id, book_id, 1).await?;

    let cart = db
        .update_cart_item(UpdateCartItemDto {
            user_id,
            book_id,
            rental_duration: 4,
        })
        .await?;
    assert_eq!(cart.items[0].rental_duration, 4);
    assert!((cart.total_amount - 100.0).abs() < 0.01);

    let report = db
        .update_cart_item(UpdateCartItemDto {
            user_id,
            book_id: Uuid::new_v4(),
            rental_duration: 2,
        })
        .await
        .unwrap_err();
    assert_eq!(reason(&report), RejectReason::NotInCart);

    for _ in 0..2 {
        let cart = db
            .remove_cart_item(RemoveCartItemDto { user_id, book_id })
            .await?;
        assert!(cart.items.is_empty());
        assert_eq!(cart.total_amount, 0.0);
    }
    Ok(())
}

#[tokio::test]
async fn feedback_updates_book_rating() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let user_id = user(&db).await?;
    let book_id = book(&db, 10.0, 1).await?;

    for rating in [5, 2] {
        db.create_feedback(CreateFeedbackDto {
            user_id,
            book_id,
            rating,
            comment: Some("worth it".to_string()),
        })
        .await?;
    }
    let report = db
        .create_feedback(CreateFeedbackDto {
            user_id,
            book_id,
            rating: 6,
            comment: None,
        })
        .await
        .unwrap_err();
    assert_eq!(reason(&report), RejectReason::InvalidRating);

    let book = db.get_book(GetBookDto { id: book_id }).await?.unwrap();
    assert_eq!(book.rating_count, 2);
    assert_eq!(book.average_rating, Some(3.5));
    let feedback = db.get_feedback(GetFeedbackDto { book_id }).await?;
    assert_eq!(feedback.len(), 2);
    assert_eq!(feedback[0].rating, 2);
    Ok(())
}

#[tokio::test]
async fn manual_rental_takes_stock_and_cart_line() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let user_id = user(&db).await?;
    let book_id = book(&db, 10.0, 1).await?;
    add_to_cart(&db, user_id, book_id, 2).await?;

    let rental = db
        .rent_book(CreateRentalDto {
            user_id,
            book_id,
            rental_duration: 3,
        })
        .await?;
    assert_eq!(rental.payment_id, None);
    assert_eq!(rental.end - rental.start, time::Duration::days(3));
    assert!(db.get_cart(GetCartDto { user_id }).await?.items.is_empty());

    let report = db
        .rent_book(CreateRentalDto {
            user_id,
            book_id,
            rental_duration: 1,
        })
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Conflict);
    assert_eq!(reason(&report), RejectReason::Unavailable);

    let profile = db.get_user(GetUserDto { id: user_id }).await?.unwrap();
    assert_eq!(profile.rentals.len(), 1);
    Ok(())
}

#[tokio::test]
async fn payments_are_scoped_to_owner() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let owner = user(&db).await?;
    let stranger = user(&db).await?;
    let book_id = book(&db, 10.0, 3).await?;
    add_to_cart(&db, owner, book_id, 1).await?;
    let receipt = db
        .checkout(
            &policy(),
            CheckoutDto {
                user_id: owner,
                items: None,
                total_amount: None,
            },
        )
        .await?;
    let id = receipt.payment.id;

    assert!(db
        .get_payment(GetPaymentDto { user_id: owner, id })
        .await?
        .is_some());
    assert!(db
        .get_payment(GetPaymentDto {
            user_id: stranger,
            id
        })
        .await?
        .is_none());

    let listed = |status: Option<&str>| GetPaymentsDto {
        user_id: owner,
        status: status.map(str::to_string),
        limit: SelectLimit::default(),
        offset: SelectOffset::default(),
    };
    assert_eq!(db.get_payments(listed(Some("completed"))).await?.len(), 1);
    assert!(db.get_payments(listed(Some("failed"))).await?.is_empty());
    let report = db.get_payments(listed(Some("refunded"))).await.unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Validation);
    Ok(())
}

#[tokio::test]
async fn email_registers_once() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let dto = || CreateUserDto {
        name: "reader".to_string(),
        email: "Reader@Example.com".to_string(),
        password: "correct horse".to_string(),
        phone_no: None,
    };
    let id = db.create_user(dto()).await?;
    let report = db.create_user(dto()).await.unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Conflict);
    assert_eq!(reason(&report), RejectReason::EmailTaken);

    let report = db
        .create_user(CreateUserDto {
            name: " ".to_string(),
            email: "nope".to_string(),
            password: "short".to_string(),
            phone_no: None,
        })
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Validation);
    assert_eq!(rejections_of(&report).len(), 3);

    let profile = db.get_user(GetUserDto { id }).await?.unwrap();
    assert_eq!(profile.user.email, "reader@example.com");
    Ok(())
}

#[tokio::test]
async fn password_is_stored_hashed_and_verified() -> error_stack::Result<(), KernelError> {
    let db = InMemoryDatabase::new();
    let id = db
        .create_user(CreateUserDto {
            name: "reader".to_string(),
            email: "login@example.com".to_string(),
            password: "correct horse".to_string(),
            phone_no: None,
        })
        .await?;

    let stored = format!("{:?}", db.snapshot().await);
    assert!(!stored.contains("correct horse"));

    let login = |email: &str, password: &str| VerifyCredentialDto {
        email: email.to_string(),
        password: password.to_string(),
    };
    assert_eq!(
        db.verify_credentials(login("Login@Example.com", "correct horse"))
            .await?,
        Some(id)
    );
    assert_eq!(
        db.verify_credentials(login("login@example.com", "battery staple"))
            .await?,
        None
    );
    assert_eq!(
        db.verify_credentials(login("nobody@example.com", "correct horse"))
            .await?,
        None
    );
    Ok(())
}
