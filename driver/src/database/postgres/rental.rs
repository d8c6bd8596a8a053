use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::RentalQuery;
use kernel::interface::update::RentalModifier;
use kernel::prelude::entity::{
    BookId, PaymentId, Rental, RentalDuration, RentalPeriod, RentalStatus, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresRentalRepository;

#[async_trait::async_trait]
impl RentalQuery for PostgresRentalRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_user_id(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        PgRentalInternal::find_by_user_id(con, user_id).await
    }

    async fn find_by_payment_id(
        &self,
        con: &mut PostgresTransaction,
        payment_id: &PaymentId,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        PgRentalInternal::find_by_payment_id(con, payment_id).await
    }
}

#[async_trait::async_trait]
impl RentalModifier for PostgresRentalRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        rental: &Rental,
    ) -> error_stack::Result<(), KernelError> {
        PgRentalInternal::create(con, rental).await
    }
}

#[derive(sqlx::FromRow)]
struct RentalRow {
    user_id: Uuid,
    book_id: Uuid,
    payment_id: Option<Uuid>,
    rental_duration: i32,
    rent_start: OffsetDateTime,
    rent_end: OffsetDateTime,
    status: String,
}

impl TryFrom<RentalRow> for Rental {
    type Error = error_stack::Report<KernelError>;

    fn try_from(value: RentalRow) -> Result<Self, Self::Error> {
        Ok(Rental::new(
            UserId::new(value.user_id),
            BookId::new(value.book_id),
            value.payment_id.map(PaymentId::new),
            RentalDuration::new(value.rental_duration),
            RentalPeriod::new(value.rent_start, value.rent_end),
            value.status.parse::<RentalStatus>()?,
        ))
    }
}

pub(in crate::database) struct PgRentalInternal;

impl PgRentalInternal {
    async fn find_by_user_id(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        let rows = sqlx::query_as::<_, RentalRow>(
            // language=postgresql
            r#"
            SELECT
                user_id,
                book_id,
                payment_id,
                rental_duration,
                rent_start,
                rent_end,
                status
            FROM
                rentals
            WHERE
                user_id = $1
            ORDER BY
                rent_start, id
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Rental::try_from).collect()
    }

    async fn find_by_payment_id(
        con: &mut PgConnection,
        payment_id: &PaymentId,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        let rows = sqlx::query_as::<_, RentalRow>(
            // language=postgresql
            r#"
            SELECT
                user_id,
                book_id,
                payment_id,
                rental_duration,
                rent_start,
                rent_end,
                status
            FROM
                rentals
            WHERE
                payment_id = $1
            ORDER BY
                id
            "#,
        )
        .bind(payment_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Rental::try_from).collect()
    }

    async fn create(con: &mut PgConnection, rental: &Rental) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO rentals (user_id, book_id, payment_id, rental_duration, rent_start, rent_end,
                                 status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(rental.user_id().as_ref())
        .bind(rental.book_id().as_ref())
        .bind(rental.payment_id().as_ref().map(AsRef::<Uuid>::as_ref))
        .bind(rental.rental_duration().as_ref())
        .bind(rental.period().start())
        .bind(rental.period().end())
        .bind(rental.status().as_str())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use time::OffsetDateTime;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::RentalQuery;
    use kernel::interface::update::{BookModifier, RentalModifier, UserModifier};
    use kernel::prelude::entity::{Rental, RentalDuration, RentalPeriod, RentalStatus};
    use kernel::KernelError;

    use crate::database::postgres::book::test::book;
    use crate::database::postgres::test_support::now;
    use crate::database::postgres::user::test::user;
    use crate::database::postgres::{
        PostgresBookRepository, PostgresDatabase, PostgresRentalRepository,
        PostgresUserRepository,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn lists_rentals_of_user() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let user = user();
        let book = book(2);
        PostgresUserRepository.create(&mut con, &user).await?;
        PostgresBookRepository.create(&mut con, &book).await?;

        let duration = RentalDuration::new(7);
        let start: OffsetDateTime = now();
        let rental = Rental::new(
            user.id().clone(),
            book.id().clone(),
            None,
            duration,
            RentalPeriod::starting(start, &duration),
            RentalStatus::Active,
        );
        PostgresRentalRepository.create(&mut con, &rental).await?;

        let found = PostgresRentalRepository
            .find_by_user_id(&mut con, user.id())
            .await?;
        assert_eq!(found, vec![rental]);

        con.roll_back().await?;
        Ok(())
    }
}
