use std::collections::{HashMap, HashSet};

use kernel::prelude::entity::{
    amounts_match, Book, BookId, PaymentItem, RentalDuration, TotalAmount,
};
use kernel::{rejected, KernelError, RejectReason, Rejection};

/// One requested rental before it has been checked against the catalog.
#[derive(Debug, Clone)]
pub(crate) struct CheckoutLine {
    pub book_id: BookId,
    pub rental_duration: i32,
    pub rent_price: Option<f64>,
}

/// Checks every line against the catalog snapshot in `books` and prices them from it.
///
/// Item failures are collected so the caller sees all of them at once. The claimed
/// total is only compared once every line is valid, since a total over a broken
/// line list means nothing.
pub(crate) fn validate(
    lines: &[CheckoutLine],
    books: &[Book],
    claimed_total: Option<f64>,
) -> error_stack::Result<Vec<PaymentItem>, KernelError> {
    if lines.is_empty() {
        return Err(Rejection::new(RejectReason::EmptyCart, "nothing to check out").into());
    }

    let catalog = books
        .iter()
        .map(|book| (book.id(), book))
        .collect::<HashMap<_, _>>();
    let mut seen = HashSet::new();
    let mut rejections = Vec::new();
    let mut items = Vec::with_capacity(lines.len());

    for line in lines {
        let book_id = &line.book_id;
        if !seen.insert(book_id) {
            rejections.push(Rejection::for_book(
                RejectReason::DuplicateItem,
                book_id,
                "book appears more than once",
            ));
            continue;
        }
        if !RentalDuration::accepts(line.rental_duration) {
            rejections.push(Rejection::for_book(
                RejectReason::InvalidDuration,
                book_id,
                format!(
                    "rental duration {} is outside {}..={} days",
                    line.rental_duration,
                    RentalDuration::MIN_DAYS,
                    RentalDuration::MAX_DAYS
                ),
            ));
        }
        let Some(book) = catalog.get(book_id) else {
            rejections.push(Rejection::for_book(
                RejectReason::BookNotFound,
                book_id,
                "book does not exist",
            ));
            continue;
        };
        if !book.is_available() {
            rejections.push(Rejection::for_book(
                RejectReason::Unavailable,
                book_id,
                "no copies left",
            ));
        }
        let current = book.rent_price().value();
        if let Some(expected) = line.rent_price {
            if !amounts_match(expected, current) {
                rejections.push(Rejection::for_book(
                    RejectReason::PriceMismatch,
                    book_id,
                    format!("price is {current}, request expected {expected}"),
                ));
            }
        }
        items.push(PaymentItem::new(
            book_id.clone(),
            RentalDuration::new(line.rental_duration),
            *book.rent_price(),
        ));
    }

    if !rejections.is_empty() {
        return Err(rejected(rejections));
    }

    if let Some(claimed) = claimed_total {
        let computed = TotalAmount::sum(items.iter().map(PaymentItem::line_total));
        if !computed.matches(claimed) {
            return Err(Rejection::new(
                RejectReason::TotalMismatch,
                format!("total is {}, request claimed {claimed}", computed.value()),
            )
            .into());
        }
    }

    Ok(items)
}
