use error_stack::{Report, ResultExt};
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnRentalQuery, DependOnUserQuery, RentalQuery, UserQuery,
};
use kernel::interface::update::{DependOnUserModifier, UserModifier};
use kernel::prelude::entity::{
    CreatedAt, PasswordHash, PhoneNumber, User, UserEmail, UserId, UserName,
};
use kernel::{rejected, KernelError, RejectReason, Rejection};

use crate::transfer::{
    CreateUserDto, GetUserDto, RentalDto, UserDto, UserProfileDto, VerifyCredentialDto,
};

/// bcrypt work factor of stored passwords.
const PASSWORD_COST: u32 = 8;
const MIN_PASSWORD_LEN: usize = 8;

#[async_trait::async_trait]
pub trait GetUserService:
    'static + Sync + Send + DependOnUserQuery + DependOnRentalQuery
{
    async fn get_user(
        &self,
        dto: GetUserDto,
    ) -> error_stack::Result<Option<UserProfileDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let id = UserId::new(dto.id);
        let Some(user) = self.user_query().find_by_id(&mut connection, &id).await? else {
            return Ok(None);
        };
        let rentals = self
            .rental_query()
            .find_by_user_id(&mut connection, &id)
            .await?;
        Ok(Some(UserProfileDto {
            user: UserDto::from(user),
            rentals: rentals.into_iter().map(RentalDto::from).collect(),
        }))
    }
}

impl<T> GetUserService for T where T: DependOnUserQuery + DependOnRentalQuery {}

#[async_trait::async_trait]
pub trait CreateUserService:
    'static + Sync + Send + DependOnUserQuery + DependOnUserModifier
{
    async fn create_user(&self, dto: CreateUserDto) -> error_stack::Result<Uuid, KernelError> {
        let name = UserName::new(dto.name);
        let email = UserEmail::new(dto.email);
        let mut problems = Vec::new();
        if name.is_blank() {
            problems.push(Rejection::new(RejectReason::InvalidRequest, "name is empty"));
        }
        if !email.looks_valid() {
            problems.push(Rejection::new(
                RejectReason::InvalidRequest,
                "email is not a valid address",
            ));
        }
        if dto.password.chars().count() < MIN_PASSWORD_LEN {
            problems.push(Rejection::new(
                RejectReason::InvalidRequest,
                format!("password must have at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        if !problems.is_empty() {
            return Err(rejected(problems));
        }

        let mut connection = self.database_connection().transact().await?;
        if self
            .user_query()
            .find_by_email(&mut connection, &email)
            .await?
            .is_some()
        {
            return Err(Report::from(Rejection::new(
                RejectReason::EmailTaken,
                "email is already registered",
            )));
        }

        let password = hash_password(dto.password).await?;
        let uuid = Uuid::new_v4();
        let user = User::new(
            UserId::new(uuid),
            name,
            email,
            password,
            dto.phone_no
                .filter(|phone| !phone.trim().is_empty())
                .map(PhoneNumber::new),
            CreatedAt::now(),
        );
        self.user_modifier().create(&mut connection, &user).await?;
        connection.commit().await?;

        tracing::info!(user = %uuid, "user registered");
        Ok(uuid)
    }
}

impl<T> CreateUserService for T where T: DependOnUserQuery + DependOnUserModifier {}

/// Checks an email and password pair for the gateway that issues tokens. Answers with
/// the user's id, or `None` when either half is wrong.
#[async_trait::async_trait]
pub trait VerifyCredentialService: 'static + Sync + Send + DependOnUserQuery {
    async fn verify_credentials(
        &self,
        dto: VerifyCredentialDto,
    ) -> error_stack::Result<Option<Uuid>, KernelError> {
        let email = UserEmail::new(dto.email);
        let mut connection = self.database_connection().transact().await?;
        let user = self.user_query().find_by_email(&mut connection, &email).await?;
        connection.roll_back().await?;

        let Some(user) = user else {
            tracing::debug!("login for unknown email");
            return Ok(None);
        };
        let id = *AsRef::<Uuid>::as_ref(user.id());
        if verify_password(dto.password, user.password().clone()).await? {
            Ok(Some(id))
        } else {
            tracing::debug!(user = %id, "login with wrong password");
            Ok(None)
        }
    }
}

impl<T> VerifyCredentialService for T where T: DependOnUserQuery {}

async fn hash_password(password: String) -> error_stack::Result<PasswordHash, KernelError> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, PASSWORD_COST))
        .await
        .change_context(KernelError::Internal)?
        .change_context(KernelError::Internal)
        .attach_printable("failed to hash password")?;
    Ok(PasswordHash::new(hashed))
}

async fn verify_password(
    password: String,
    hash: PasswordHash,
) -> error_stack::Result<bool, KernelError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, AsRef::<String>::as_ref(&hash)))
        .await
        .change_context(KernelError::Internal)?
        .change_context(KernelError::InvariantViolation)
        .attach_printable("stored password hash is malformed")
}

pub(crate) fn user_not_found(id: &UserId) -> Report<KernelError> {
    Report::from(Rejection::new(
        RejectReason::UserNotFound,
        format!("user {} does not exist", AsRef::<Uuid>::as_ref(id)),
    ))
}
