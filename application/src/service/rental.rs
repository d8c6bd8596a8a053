use error_stack::Report;
use time::OffsetDateTime;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{DependOnUserQuery, UserQuery};
use kernel::interface::update::{
    BookModifier, CartModifier, DependOnBookModifier, DependOnCartModifier,
    DependOnRentalModifier, RentalModifier,
};
use kernel::prelude::entity::{
    BookId, BookQuantity, Rental, RentalDuration, RentalPeriod, RentalStatus, StockDecrement,
    UserId,
};
use kernel::{KernelError, RejectReason, Rejection};

use crate::service::{book_not_found, user_not_found};
use crate::transfer::{CreateRentalDto, RentalDto};

/// Lends a single book without a payment.
#[async_trait::async_trait]
pub trait RentBookService:
    'static
    + Sync
    + Send
    + DependOnUserQuery
    + DependOnBookModifier
    + DependOnRentalModifier
    + DependOnCartModifier
{
    async fn rent_book(&self, dto: CreateRentalDto) -> error_stack::Result<RentalDto, KernelError> {
        let duration = RentalDuration::try_new(dto.rental_duration)?;
        let user_id = UserId::new(dto.user_id);
        let book_id = BookId::new(dto.book_id);

        let mut connection = self.database_connection().transact().await?;
        if self
            .user_query()
            .find_by_id(&mut connection, &user_id)
            .await?
            .is_none()
        {
            return Err(user_not_found(&user_id));
        }
        let decrement = self
            .book_modifier()
            .decrement_stock(&mut connection, &book_id, &BookQuantity::new(1))
            .await?;
        ensure_taken(decrement, &book_id)?;

        let rental = Rental::new(
            user_id.clone(),
            book_id.clone(),
            None,
            duration,
            RentalPeriod::starting(OffsetDateTime::now_utc(), &duration),
            RentalStatus::Active,
        );
        self.rental_modifier()
            .create(&mut connection, &rental)
            .await?;
        self.cart_modifier()
            .remove_item(&mut connection, &user_id, &book_id)
            .await?;
        connection.commit().await?;

        Ok(RentalDto::from(rental))
    }
}

impl<T> RentBookService for T where
    T: DependOnUserQuery + DependOnBookModifier + DependOnRentalModifier + DependOnCartModifier
{
}

pub(crate) fn ensure_taken(
    decrement: StockDecrement,
    book_id: &BookId,
) -> error_stack::Result<BookQuantity, KernelError> {
    match decrement {
        StockDecrement::Applied { remaining } => Ok(remaining),
        StockDecrement::Insufficient => Err(Report::from(Rejection::for_book(
            RejectReason::Unavailable,
            book_id,
            "no copies left",
        ))),
        StockDecrement::Missing => Err(book_not_found(book_id)),
    }
}
