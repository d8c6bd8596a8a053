use std::collections::HashMap;

use error_stack::Report;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::PaymentQuery;
use kernel::interface::update::PaymentModifier;
use kernel::prelude::entity::{
    BookId, CreatedAt, Payment, PaymentId, PaymentItem, PaymentStatus, RentPrice,
    RentalDuration, SelectLimit, SelectOffset, TotalAmount, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresPaymentRepository;

#[async_trait::async_trait]
impl PaymentQuery for PostgresPaymentRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &PaymentId,
    ) -> error_stack::Result<Option<Payment>, KernelError> {
        PgPaymentInternal::find_by_id(con, id).await
    }

    async fn find_by_user_id(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
        status: Option<&PaymentStatus>,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Payment>, KernelError> {
        PgPaymentInternal::find_by_user_id(con, user_id, status, limit, offset).await
    }
}

#[async_trait::async_trait]
impl PaymentModifier for PostgresPaymentRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        payment: &Payment,
    ) -> error_stack::Result<(), KernelError> {
        PgPaymentInternal::create(con, payment).await
    }

    async fn update_status(
        &self,
        con: &mut PostgresTransaction,
        payment: &Payment,
    ) -> error_stack::Result<(), KernelError> {
        PgPaymentInternal::update_status(con, payment).await
    }
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    user_id: Uuid,
    total_amount: f64,
    status: String,
    created_at: OffsetDateTime,
    processed_at: Option<OffsetDateTime>,
}

#[derive(sqlx::FromRow)]
struct PaymentItemRow {
    payment_id: Uuid,
    book_id: Uuid,
    rental_duration: i32,
    rent_price: f64,
}

impl From<PaymentItemRow> for PaymentItem {
    fn from(value: PaymentItemRow) -> Self {
        PaymentItem::new(
            BookId::new(value.book_id),
            RentalDuration::new(value.rental_duration),
            RentPrice::new(value.rent_price),
        )
    }
}

fn parse_status(status: &str) -> error_stack::Result<PaymentStatus, KernelError> {
    match status {
        "pending" => Ok(PaymentStatus::Pending),
        "completed" => Ok(PaymentStatus::Completed),
        "failed" => Ok(PaymentStatus::Failed),
        other => Err(Report::new(KernelError::InvariantViolation)
            .attach_printable(format!("stored payment status `{other}` is unknown"))),
    }
}

/// Rebuilds a payment from its rows. A stored total that disagrees with the stored
/// items surfaces as [`KernelError::InvariantViolation`].
fn assemble(
    row: PaymentRow,
    items: Vec<PaymentItem>,
) -> error_stack::Result<Payment, KernelError> {
    Payment::new(
        PaymentId::new(row.id),
        UserId::new(row.user_id),
        items,
        TotalAmount::new(row.total_amount),
        parse_status(&row.status)?,
        CreatedAt::new(row.created_at),
        row.processed_at,
    )
}

pub(in crate::database) struct PgPaymentInternal;

impl PgPaymentInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &PaymentId,
    ) -> error_stack::Result<Option<Payment>, KernelError> {
        let row = sqlx::query_as::<_, PaymentRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, total_amount, status, created_at, processed_at
            FROM payments
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(&mut *con)
        .await
        .convert_error()?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut items = Self::items_of(con, &[row.id]).await?;
        let items = items.remove(&row.id).unwrap_or_default();
        assemble(row, items).map(Some)
    }

    async fn find_by_user_id(
        con: &mut PgConnection,
        user_id: &UserId,
        status: Option<&PaymentStatus>,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Payment>, KernelError> {
        let limit: &i32 = limit.as_ref();
        let offset: &i32 = offset.as_ref();
        let rows = sqlx::query_as::<_, PaymentRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, total_amount, status, created_at, processed_at
            FROM payments
            WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC, id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id.as_ref())
        .bind(status.map(PaymentStatus::as_str))
        .bind(i64::from(*limit))
        .bind(i64::from(*offset))
        .fetch_all(&mut *con)
        .await
        .convert_error()?;

        let ids = rows.iter().map(|row| row.id).collect::<Vec<_>>();
        let mut items = Self::items_of(con, &ids).await?;
        rows.into_iter()
            .map(|row| {
                let lines = items.remove(&row.id).unwrap_or_default();
                assemble(row, lines)
            })
            .collect()
    }

    async fn items_of(
        con: &mut PgConnection,
        ids: &[Uuid],
    ) -> error_stack::Result<HashMap<Uuid, Vec<PaymentItem>>, KernelError> {
        let rows = sqlx::query_as::<_, PaymentItemRow>(
            // language=postgresql
            r#"
            SELECT payment_id, book_id, rental_duration, rent_price
            FROM payment_items
            WHERE payment_id = ANY($1)
            ORDER BY payment_id, position
            "#,
        )
        .bind(ids)
        .fetch_all(con)
        .await
        .convert_error()?;
        let mut grouped = HashMap::<Uuid, Vec<PaymentItem>>::new();
        for row in rows {
            grouped
                .entry(row.payment_id)
                .or_default()
                .push(PaymentItem::from(row));
        }
        Ok(grouped)
    }

    async fn create(
        con: &mut PgConnection,
        payment: &Payment,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO payments (id, user_id, total_amount, status, created_at, processed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(payment.id().as_ref())
        .bind(payment.user_id().as_ref())
        .bind(payment.total_amount().value())
        .bind(payment.status().as_str())
        .bind(payment.created_at().as_ref())
        .bind(payment.processed_at())
        .execute(&mut *con)
        .await
        .convert_error()?;

        for (position, item) in payment.items().iter().enumerate() {
            sqlx::query(
                // language=postgresql
                r#"
                INSERT INTO payment_items (payment_id, position, book_id, rental_duration, rent_price)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(payment.id().as_ref())
            .bind(position as i32)
            .bind(item.book_id().as_ref())
            .bind(item.rental_duration().as_ref())
            .bind(item.rent_price().value())
            .execute(&mut *con)
            .await
            .convert_error()?;
        }
        Ok(())
    }

    async fn update_status(
        con: &mut PgConnection,
        payment: &Payment,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE payments
            SET status = $2, processed_at = $3
            WHERE id = $1
            "#,
        )
        .bind(payment.id().as_ref())
        .bind(payment.status().as_str())
        .bind(payment.processed_at())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::PaymentQuery;
    use kernel::interface::update::{BookModifier, PaymentModifier, UserModifier};
    use kernel::prelude::entity::{
        CreatedAt, Payment, PaymentId, PaymentItem, PaymentStatus, RentalDuration, SelectLimit,
        SelectOffset,
    };
    use kernel::KernelError;

    use crate::database::postgres::book::test::book;
    use crate::database::postgres::test_support::now;
    use crate::database::postgres::user::test::user;
    use crate::database::postgres::{
        PostgresBookRepository, PostgresDatabase, PostgresPaymentRepository,
        PostgresUserRepository,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn pending_payments_are_queryable() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let user = user();
        let book = book(3);
        PostgresUserRepository.create(&mut con, &user).await?;
        PostgresBookRepository.create(&mut con, &book).await?;

        let payment = Payment::pending(
            PaymentId::new(Uuid::new_v4()),
            user.id().clone(),
            vec![PaymentItem::new(
                book.id().clone(),
                RentalDuration::new(3),
                *book.rent_price(),
            )],
            CreatedAt::new(now()),
        );
        PostgresPaymentRepository.create(&mut con, &payment).await?;

        let pending = PostgresPaymentRepository
            .find_by_user_id(
                &mut con,
                user.id(),
                Some(&PaymentStatus::Pending),
                &SelectLimit::default(),
                &SelectOffset::default(),
            )
            .await?;
        assert_eq!(pending, vec![payment.clone()]);

        let mut settled = payment.clone();
        settled.settle(PaymentStatus::Completed, now())?;
        PostgresPaymentRepository
            .update_status(&mut con, &settled)
            .await?;

        let found = PostgresPaymentRepository
            .find_by_id(&mut con, payment.id())
            .await?;
        assert_eq!(found, Some(settled));
        let pending = PostgresPaymentRepository
            .find_by_user_id(
                &mut con,
                user.id(),
                Some(&PaymentStatus::Pending),
                &SelectLimit::default(),
                &SelectOffset::default(),
            )
            .await?;
        assert!(pending.is_empty());

        con.roll_back().await?;
        Ok(())
    }
}
