use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::UserQuery;
use kernel::interface::update::UserModifier;
use kernel::prelude::entity::{
    CreatedAt, PasswordHash, PhoneNumber, User, UserEmail, UserId, UserName,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresUserRepository;

#[async_trait::async_trait]
impl UserQuery for PostgresUserRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        PgUserInternal::find_by_id(con, id).await
    }

    async fn find_by_email(
        &self,
        con: &mut PostgresTransaction,
        email: &UserEmail,
    ) -> error_stack::Result<Option<User>, KernelError> {
        PgUserInternal::find_by_email(con, email).await
    }
}

#[async_trait::async_trait]
impl UserModifier for PostgresUserRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        user: &User,
    ) -> error_stack::Result<(), KernelError> {
        PgUserInternal::create(con, user).await
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    phone_no: Option<String>,
    created_at: OffsetDateTime,
}

impl From<UserRow> for User {
    fn from(value: UserRow) -> Self {
        User::new(
            UserId::new(value.id),
            UserName::new(value.name),
            UserEmail::new(value.email),
            PasswordHash::new(value.password_hash),
            value.phone_no.map(PhoneNumber::new),
            CreatedAt::new(value.created_at),
        )
    }
}

pub(in crate::database) struct PgUserInternal;

impl PgUserInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        let row = sqlx::query_as::<_, UserRow>(
            // language=postgresql
            r#"
            SELECT id, name, email, password_hash, phone_no, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(User::from))
    }

    async fn find_by_email(
        con: &mut PgConnection,
        email: &UserEmail,
    ) -> error_stack::Result<Option<User>, KernelError> {
        let row = sqlx::query_as::<_, UserRow>(
            // language=postgresql
            r#"
            SELECT id, name, email, password_hash, phone_no, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(User::from))
    }

    async fn create(con: &mut PgConnection, user: &User) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO users (id, name, email, password_hash, phone_no, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id().as_ref())
        .bind(user.name().as_ref())
        .bind(user.email().as_ref())
        .bind(user.password().as_ref())
        .bind(user.phone_no().as_ref().map(AsRef::<String>::as_ref))
        .bind(user.created_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test {
    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::UserQuery;
    use kernel::interface::update::UserModifier;
    use kernel::prelude::entity::{
        CreatedAt, PasswordHash, User, UserEmail, UserId, UserName,
    };
    use kernel::{rejections_of, KernelError, RejectReason};

    use crate::database::postgres::test_support::now;
    use crate::database::postgres::{PostgresDatabase, PostgresUserRepository};

    pub fn user() -> User {
        let id = Uuid::new_v4();
        User::new(
            UserId::new(id),
            UserName::new("reader"),
            UserEmail::new(format!("{id}@example.com")),
            PasswordHash::new("$2b$04$abcdefghijklmnopqrstuu"),
            None,
            CreatedAt::new(now()),
        )
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn finds_by_id_and_email() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let user = user();
        PostgresUserRepository.create(&mut con, &user).await?;

        let found = PostgresUserRepository.find_by_id(&mut con, user.id()).await?;
        assert_eq!(found.as_ref(), Some(&user));
        let found = PostgresUserRepository
            .find_by_email(&mut con, user.email())
            .await?;
        assert_eq!(found, Some(user.clone()));

        let report = PostgresUserRepository
            .create(&mut con, &user)
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Conflict);
        assert!(rejections_of(&report).is_empty());

        con.roll_back().await?;
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn duplicate_email_is_rejected_by_constraint() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let first = user();
        PostgresUserRepository.create(&mut con, &first).await?;
        let twin = User::new(
            UserId::new(Uuid::new_v4()),
            UserName::new("twin"),
            first.email().clone(),
            PasswordHash::new("$2b$04$abcdefghijklmnopqrstuu"),
            None,
            CreatedAt::new(now()),
        );
        let report = PostgresUserRepository
            .create(&mut con, &twin)
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Conflict);
        assert_eq!(
            rejections_of(&report)[0].reason(),
            &RejectReason::EmailTaken
        );

        con.roll_back().await?;
        Ok(())
    }
}
