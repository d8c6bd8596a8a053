mod validate;

use std::time::Duration;

use error_stack::Report;
use rand::Rng;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{
    BookQuery, CartQuery, DependOnBookQuery, DependOnCartQuery, DependOnPaymentQuery,
    DependOnRentalQuery, DependOnUserQuery, PaymentQuery, RentalQuery, UserQuery,
};
use kernel::interface::update::{
    BookModifier, CartModifier, DependOnBookModifier, DependOnCartModifier,
    DependOnPaymentModifier, DependOnRentalModifier, PaymentModifier, RentalModifier,
};
use kernel::prelude::entity::{
    BookId, BookQuantity, CreatedAt, Payment, PaymentId, PaymentStatus, Rental, RentalPeriod,
    RentalStatus, UserId,
};
use kernel::{rejections_of, KernelError, RejectReason, Rejection};

use crate::service::rental::ensure_taken;
use crate::service::user_not_found;
use crate::transfer::{CheckoutDto, CheckoutReceiptDto, PaymentDto, RentalDto};

pub(crate) use self::validate::{validate, CheckoutLine};

/// Bounds on how long and how often a checkout is attempted.
#[derive(Debug, Clone)]
pub struct CheckoutPolicy {
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub retry_backoff: Duration,
}

impl CheckoutPolicy {
    /// Linear backoff with up to half a step of random jitter.
    fn backoff(&self, attempt: u32) -> Duration {
        let step = self.retry_backoff.as_millis() as u64;
        let jitter = if step == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=step / 2)
        };
        Duration::from_millis(step * u64::from(attempt) + jitter)
    }
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(5),
            retry_backoff: Duration::from_millis(50),
        }
    }
}

/// Input of one checkout, fixed before the first attempt and reused by every retry.
#[doc(hidden)]
pub struct CheckoutRequest {
    user_id: UserId,
    payment_id: PaymentId,
    lines: Option<Vec<CheckoutLine>>,
    total_amount: Option<f64>,
}

impl From<CheckoutDto> for CheckoutRequest {
    fn from(value: CheckoutDto) -> Self {
        Self {
            user_id: UserId::new(value.user_id),
            payment_id: PaymentId::new(Uuid::new_v4()),
            lines: value.items.map(|items| {
                items
                    .into_iter()
                    .map(|item| CheckoutLine {
                        book_id: BookId::new(item.book_id),
                        rental_duration: item.rental_duration,
                        rent_price: item.rent_price,
                    })
                    .collect()
            }),
            total_amount: value.total_amount,
        }
    }
}

/// Turns a cart (or an explicit item list) into a completed payment and rental records.
///
/// Everything one attempt writes happens in a single transaction: the payment, the
/// stock decrements, the rentals and clearing the cart are either all committed or
/// none of them are. Stock is taken with a conditional decrement, so when two
/// checkouts race for the last copy the loser fails with `unavailable` instead of
/// driving the quantity negative.
///
/// Business rejections are returned as-is. Transient failures and attempts that
/// overrun `attempt_timeout` are retried up to `max_attempts` times with the same
/// input and payment id. A failed attempt may still have committed (the
/// acknowledgement was lost, or the deadline hit after the commit landed), so every
/// retry first looks the payment id up and answers with the stored receipt if it is
/// there.
#[async_trait::async_trait]
pub trait CheckoutService:
    'static
    + Sync
    + Send
    + DependOnUserQuery
    + DependOnBookQuery
    + DependOnCartQuery
    + DependOnPaymentQuery
    + DependOnRentalQuery
    + DependOnBookModifier
    + DependOnCartModifier
    + DependOnPaymentModifier
    + DependOnRentalModifier
{
    async fn checkout(
        &self,
        policy: &CheckoutPolicy,
        dto: CheckoutDto,
    ) -> error_stack::Result<CheckoutReceiptDto, KernelError> {
        let request = CheckoutRequest::from(dto);
        let payment = *AsRef::<Uuid>::as_ref(&request.payment_id);
        let user = *AsRef::<Uuid>::as_ref(&request.user_id);
        let max_attempts = policy.max_attempts.max(1);

        let mut attempt = 1;
        loop {
            tracing::debug!(%payment, %user, attempt, "checkout attempt");
            let replay = attempt > 1;
            let outcome = match tokio::time::timeout(
                policy.attempt_timeout,
                self.checkout_once(&request, replay),
            )
            .await
            {
                Ok(outcome) => outcome,
                Err(_) => Err(Report::new(KernelError::Timeout).attach_printable(format!(
                    "checkout attempt exceeded {:?}",
                    policy.attempt_timeout
                ))),
            };

            let report = match outcome {
                Ok(receipt) => {
                    tracing::info!(
                        %payment,
                        %user,
                        attempt,
                        total = receipt.payment.total_amount,
                        "checkout completed"
                    );
                    return Ok(receipt);
                }
                Err(report) => report,
            };

            let kind = *report.current_context();
            if kind.is_transient() && attempt < max_attempts {
                let wait = policy.backoff(attempt);
                tracing::warn!(
                    %payment,
                    %user,
                    attempt,
                    ?kind,
                    ?wait,
                    "checkout attempt failed, retrying"
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
                continue;
            }

            match kind {
                KernelError::InvariantViolation => {
                    tracing::error!(target: "invariant", %payment, %user, "{report:?}");
                }
                KernelError::Validation | KernelError::NotFound | KernelError::Conflict => {
                    let reasons = rejections_of(&report)
                        .into_iter()
                        .map(|rejection| rejection.reason())
                        .collect::<Vec<_>>();
                    tracing::warn!(%payment, %user, ?kind, ?reasons, "checkout rejected");
                }
                _ => {
                    tracing::error!(%payment, %user, attempt, ?kind, "checkout failed");
                }
            }
            return Err(report);
        }
    }

    #[doc(hidden)]
    async fn checkout_once(
        &self,
        request: &CheckoutRequest,
        replay: bool,
    ) -> error_stack::Result<CheckoutReceiptDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        if replay {
            match self.committed_receipt(&mut connection, request).await {
                Ok(Some(receipt)) => {
                    connection.roll_back().await?;
                    return Ok(receipt);
                }
                Ok(None) => {}
                Err(report) => {
                    if let Err(rollback) = connection.roll_back().await {
                        tracing::warn!("rollback after failed lookup also failed: {rollback:?}");
                    }
                    return Err(report);
                }
            }
        }
        match self.checkout_within(&mut connection, request).await {
            Ok(receipt) => {
                connection.commit().await?;
                Ok(receipt)
            }
            Err(report) => {
                if let Err(rollback) = connection.roll_back().await {
                    tracing::warn!("rollback after failed checkout also failed: {rollback:?}");
                }
                Err(report)
            }
        }
    }

    /// The receipt of an earlier attempt of this request that did commit, if any.
    #[doc(hidden)]
    async fn committed_receipt(
        &self,
        connection: &mut <Self::DatabaseConnection as DatabaseConnection>::Transaction,
        request: &CheckoutRequest,
    ) -> error_stack::Result<Option<CheckoutReceiptDto>, KernelError> {
        let Some(payment) = self
            .payment_query()
            .find_by_id(connection, &request.payment_id)
            .await?
        else {
            return Ok(None);
        };
        if payment.user_id() != &request.user_id || payment.status() != &PaymentStatus::Completed
        {
            return Err(Report::new(KernelError::InvariantViolation).attach_printable(format!(
                "payment {} was stored as {} for another attempt",
                AsRef::<Uuid>::as_ref(&request.payment_id),
                payment.status()
            )));
        }
        let rentals = self
            .rental_query()
            .find_by_payment_id(connection, &request.payment_id)
            .await?;
        tracing::info!(
            payment = %AsRef::<Uuid>::as_ref(&request.payment_id),
            "earlier checkout attempt had already committed"
        );
        Ok(Some(CheckoutReceiptDto {
            payment: PaymentDto::from(payment),
            rentals: rentals.into_iter().map(RentalDto::from).collect(),
        }))
    }

    #[doc(hidden)]
    async fn checkout_within(
        &self,
        connection: &mut <Self::DatabaseConnection as DatabaseConnection>::Transaction,
        request: &CheckoutRequest,
    ) -> error_stack::Result<CheckoutReceiptDto, KernelError> {
        let user_id = &request.user_id;
        if self
            .user_query()
            .find_by_id(connection, user_id)
            .await?
            .is_none()
        {
            return Err(user_not_found(user_id));
        }

        let lines = match &request.lines {
            Some(lines) => lines.clone(),
            None => {
                let cart = self.cart_query().find_by_user_id(connection, user_id).await?;
                if cart.is_empty() {
                    return Err(Rejection::new(RejectReason::EmptyCart, "cart is empty").into());
                }
                cart.items()
                    .iter()
                    .map(|item| CheckoutLine {
                        book_id: item.book_id().clone(),
                        rental_duration: item.rental_duration().days(),
                        rent_price: None,
                    })
                    .collect()
            }
        };

        let ids = lines
            .iter()
            .map(|line| line.book_id.clone())
            .collect::<Vec<_>>();
        let books = self.book_query().find_by_ids(connection, &ids).await?;
        let items = validate(&lines, &books, request.total_amount)?;

        let mut payment = Payment::pending(
            request.payment_id.clone(),
            user_id.clone(),
            items,
            CreatedAt::now(),
        );
        self.payment_modifier().create(connection, &payment).await?;

        for item in payment.items() {
            let decrement = self
                .book_modifier()
                .decrement_stock(connection, item.book_id(), &BookQuantity::new(1))
                .await?;
            ensure_taken(decrement, item.book_id())?;
        }

        let now = OffsetDateTime::now_utc();
        let mut rentals = Vec::with_capacity(payment.items().len());
        for item in payment.items() {
            let rental = Rental::new(
                user_id.clone(),
                item.book_id().clone(),
                Some(request.payment_id.clone()),
                *item.rental_duration(),
                RentalPeriod::starting(now, item.rental_duration()),
                RentalStatus::Active,
            );
            self.rental_modifier().create(connection, &rental).await?;
            rentals.push(rental);
        }

        payment.settle(PaymentStatus::Completed, now)?;
        self.payment_modifier()
            .update_status(connection, &payment)
            .await?;

        self.cart_modifier().clear(connection, user_id).await?;

        Ok(CheckoutReceiptDto {
            payment: PaymentDto::from(payment),
            rentals: rentals.into_iter().map(RentalDto::from).collect(),
        })
    }
}

impl<T> CheckoutService for T where
    T: DependOnUserQuery
        + DependOnBookQuery
        + DependOnCartQuery
        + DependOnPaymentQuery
        + DependOnRentalQuery
        + DependOnBookModifier
        + DependOnCartModifier
        + DependOnPaymentModifier
        + DependOnRentalModifier
{
}
