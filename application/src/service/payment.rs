use std::str::FromStr;

use kernel::interface::database::DatabaseConnection;
use kernel::interface::query::{DependOnPaymentQuery, PaymentQuery};
use kernel::prelude::entity::{PaymentId, PaymentStatus, UserId};
use kernel::KernelError;

use crate::transfer::{GetPaymentDto, GetPaymentsDto, PaymentDto};

#[async_trait::async_trait]
pub trait GetPaymentService: 'static + Sync + Send + DependOnPaymentQuery {
    /// Payments owned by someone else are reported as absent.
    async fn get_payment(
        &self,
        dto: GetPaymentDto,
    ) -> error_stack::Result<Option<PaymentDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let owner = UserId::new(dto.user_id);
        let payment = self
            .payment_query()
            .find_by_id(&mut connection, &PaymentId::new(dto.id))
            .await?;
        Ok(payment
            .filter(|payment| payment.user_id() == &owner)
            .map(PaymentDto::from))
    }

    async fn get_payments(
        &self,
        dto: GetPaymentsDto,
    ) -> error_stack::Result<Vec<PaymentDto>, KernelError> {
        let status = dto
            .status
            .as_deref()
            .map(PaymentStatus::from_str)
            .transpose()?;
        let mut connection = self.database_connection().transact().await?;
        let payments = self
            .payment_query()
            .find_by_user_id(
                &mut connection,
                &UserId::new(dto.user_id),
                status.as_ref(),
                &dto.limit,
                &dto.offset,
            )
            .await?;
        Ok(payments.into_iter().map(PaymentDto::from).collect())
    }
}

impl<T> GetPaymentService for T where T: DependOnPaymentQuery {}
