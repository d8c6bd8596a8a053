use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::CartQuery;
use kernel::interface::update::CartModifier;
use kernel::prelude::entity::{
    BookId, BookTitle, Cart, CartItem, CreatedAt, RentPrice, RentalDuration, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresCartRepository;

#[async_trait::async_trait]
impl CartQuery for PostgresCartRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_user_id(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Cart, KernelError> {
        PgCartInternal::find_by_user_id(con, user_id).await
    }
}

#[async_trait::async_trait]
impl CartModifier for PostgresCartRepository {
    type Transaction = PostgresTransaction;

    async fn add_item(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
        item: &CartItem,
    ) -> error_stack::Result<(), KernelError> {
        PgCartInternal::add_item(con, user_id, item).await
    }

    async fn update_item(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
        item: &CartItem,
    ) -> error_stack::Result<(), KernelError> {
        PgCartInternal::update_item(con, user_id, item).await
    }

    async fn remove_item(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        PgCartInternal::remove_item(con, user_id, book_id).await
    }

    async fn clear(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<(), KernelError> {
        PgCartInternal::clear(con, user_id).await
    }
}

#[derive(sqlx::FromRow)]
struct CartItemRow {
    book_id: Uuid,
    title: String,
    rent_price: f64,
    rental_duration: i32,
    added_at: OffsetDateTime,
}

impl From<CartItemRow> for CartItem {
    fn from(value: CartItemRow) -> Self {
        CartItem::new(
            BookId::new(value.book_id),
            BookTitle::new(value.title),
            RentPrice::new(value.rent_price),
            RentalDuration::new(value.rental_duration),
            CreatedAt::new(value.added_at),
        )
    }
}

pub(in crate::database) struct PgCartInternal;

impl PgCartInternal {
    /// Title and price come from the catalog, so the cart always shows what checkout will charge.
    async fn find_by_user_id(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Cart, KernelError> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            // language=postgresql
            r#"
            SELECT
                i.book_id,
                b.title,
                b.rent_price,
                i.rental_duration,
                i.added_at
            FROM
                cart_items i
                JOIN books b ON b.id = i.book_id
            WHERE
                i.user_id = $1
            ORDER BY
                i.position
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(Cart::new(
            user_id.clone(),
            rows.into_iter().map(CartItem::from).collect(),
        ))
    }

    async fn add_item(
        con: &mut PgConnection,
        user_id: &UserId,
        item: &CartItem,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO carts (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_ref())
        .execute(&mut *con)
        .await
        .convert_error()?;
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO cart_items (user_id, book_id, rental_duration, added_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_id.as_ref())
        .bind(item.book_id().as_ref())
        .bind(item.rental_duration().as_ref())
        .bind(item.added_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update_item(
        con: &mut PgConnection,
        user_id: &UserId,
        item: &CartItem,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE cart_items
            SET rental_duration = $3
            WHERE user_id = $1 AND book_id = $2
            "#,
        )
        .bind(user_id.as_ref())
        .bind(item.book_id().as_ref())
        .bind(item.rental_duration().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn remove_item(
        con: &mut PgConnection,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM cart_items
            WHERE user_id = $1 AND book_id = $2
            "#,
        )
        .bind(user_id.as_ref())
        .bind(book_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    /// Drops the cart itself; its items go with it.
    async fn clear(con: &mut PgConnection, user_id: &UserId) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM carts
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
