use std::ops::{Deref, DerefMut};
use std::time::Duration;

use error_stack::ResultExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnBookQuery, DependOnCartQuery, DependOnFeedbackQuery, DependOnPaymentQuery,
    DependOnRentalQuery, DependOnUserQuery,
};
use kernel::interface::update::{
    DependOnBookModifier, DependOnCartModifier, DependOnFeedbackModifier,
    DependOnPaymentModifier, DependOnRentalModifier, DependOnUserModifier,
};
use kernel::KernelError;

use crate::error::ConvertError;
use crate::{env, env_or};

pub use self::{book::*, cart::*, feedback::*, payment::*, rental::*, user::*};

mod book;
mod cart;
mod feedback;
mod payment;
mod rental;
mod user;

const POSTGRES_URL: &str = "POSTGRES_URL";
const POSTGRES_MAX_CONNECTIONS: &str = "POSTGRES_MAX_CONNECTIONS";
const POSTGRES_ACQUIRE_TIMEOUT_MS: &str = "POSTGRES_ACQUIRE_TIMEOUT_MS";
const POSTGRES_LOCK_TIMEOUT_MS: &str = "POSTGRES_LOCK_TIMEOUT_MS";
const POSTGRES_MIGRATE: &str = "POSTGRES_MIGRATE";

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
    lock_timeout: Duration,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        let max_connections = env_or(POSTGRES_MAX_CONNECTIONS, 10u32)?;
        let acquire_timeout = Duration::from_millis(env_or(POSTGRES_ACQUIRE_TIMEOUT_MS, 3000u64)?);
        let lock_timeout = Duration::from_millis(env_or(POSTGRES_LOCK_TIMEOUT_MS, 2000u64)?);

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(&url)
            .await
            .convert_error()?;

        if env_or(POSTGRES_MIGRATE, true)? {
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .change_context_lazy(|| KernelError::Internal)
                .attach_printable_lazy(|| "Failed to apply migrations")?;
        }

        tracing::info!(max_connections, ?acquire_timeout, ?lock_timeout, "postgres pool ready");
        Ok(Self { pool, lock_timeout })
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresTransaction;

    /// Every transaction waits at most `lock_timeout` on a row lock before failing.
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let mut transaction = self.pool.begin().await.convert_error()?;
        // language=postgresql
        let statement = format!(
            "SET LOCAL lock_timeout = '{}ms'",
            self.lock_timeout.as_millis()
        );
        sqlx::query(&statement)
            .execute(&mut *transaction)
            .await
            .convert_error()?;
        Ok(PostgresTransaction(transaction))
    }
}

/// An open Postgres transaction. Dropping it without committing rolls it back.
pub struct PostgresTransaction(sqlx::Transaction<'static, Postgres>);

#[async_trait::async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

impl Deref for PostgresTransaction {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl DependOnBookQuery for PostgresDatabase {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for PostgresDatabase {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}

impl DependOnCartQuery for PostgresDatabase {
    type CartQuery = PostgresCartRepository;
    fn cart_query(&self) -> &Self::CartQuery {
        &PostgresCartRepository
    }
}

impl DependOnCartModifier for PostgresDatabase {
    type CartModifier = PostgresCartRepository;
    fn cart_modifier(&self) -> &Self::CartModifier {
        &PostgresCartRepository
    }
}

impl DependOnFeedbackQuery for PostgresDatabase {
    type FeedbackQuery = PostgresFeedbackRepository;
    fn feedback_query(&self) -> &Self::FeedbackQuery {
        &PostgresFeedbackRepository
    }
}

impl DependOnFeedbackModifier for PostgresDatabase {
    type FeedbackModifier = PostgresFeedbackRepository;
    fn feedback_modifier(&self) -> &Self::FeedbackModifier {
        &PostgresFeedbackRepository
    }
}

impl DependOnPaymentQuery for PostgresDatabase {
    type PaymentQuery = PostgresPaymentRepository;
    fn payment_query(&self) -> &Self::PaymentQuery {
        &PostgresPaymentRepository
    }
}

impl DependOnPaymentModifier for PostgresDatabase {
    type PaymentModifier = PostgresPaymentRepository;
    fn payment_modifier(&self) -> &Self::PaymentModifier {
        &PostgresPaymentRepository
    }
}

impl DependOnRentalQuery for PostgresDatabase {
    type RentalQuery = PostgresRentalRepository;
    fn rental_query(&self) -> &Self::RentalQuery {
        &PostgresRentalRepository
    }
}

impl DependOnRentalModifier for PostgresDatabase {
    type RentalModifier = PostgresRentalRepository;
    fn rental_modifier(&self) -> &Self::RentalModifier {
        &PostgresRentalRepository
    }
}

impl DependOnUserQuery for PostgresDatabase {
    type UserQuery = PostgresUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &PostgresUserRepository
    }
}

impl DependOnUserModifier for PostgresDatabase {
    type UserModifier = PostgresUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &PostgresUserRepository
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use time::OffsetDateTime;

    /// Current time at the microsecond precision Postgres stores.
    pub fn now() -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();
        now.replace_nanosecond(now.nanosecond() / 1_000 * 1_000)
            .unwrap()
    }
}
