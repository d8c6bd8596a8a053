mod amount;
mod id;
mod item;
mod status;

pub use self::{amount::*, id::*, item::*, status::*};

use destructure::Destructure;
use error_stack::Report;
use time::OffsetDateTime;
use vodca::References;

use crate::entity::{CreatedAt, UserId};
use crate::KernelError;

#[derive(Debug, Clone, PartialEq, References, Destructure)]
pub struct Payment {
    id: PaymentId,
    user_id: UserId,
    items: Vec<PaymentItem>,
    total_amount: TotalAmount,
    status: PaymentStatus,
    created_at: CreatedAt<Payment>,
    processed_at: Option<OffsetDateTime>,
}

impl Payment {
    /// Fails with [`KernelError::InvariantViolation`] when `total_amount` differs from
    /// the sum of the item lines.
    pub fn new(
        id: PaymentId,
        user_id: UserId,
        items: Vec<PaymentItem>,
        total_amount: TotalAmount,
        status: PaymentStatus,
        created_at: CreatedAt<Payment>,
        processed_at: Option<OffsetDateTime>,
    ) -> error_stack::Result<Self, KernelError> {
        let computed = TotalAmount::sum(items.iter().map(PaymentItem::line_total));
        if !computed.matches(total_amount.value()) {
            return Err(Report::new(KernelError::InvariantViolation).attach_printable(format!(
                "payment {} total {} differs from item sum {}",
                AsRef::<uuid::Uuid>::as_ref(&id),
                total_amount.value(),
                computed.value()
            )));
        }
        Ok(Self {
            id,
            user_id,
            items,
            total_amount,
            status,
            created_at,
            processed_at,
        })
    }

    /// A pending payment whose total is computed from its items.
    pub fn pending(
        id: PaymentId,
        user_id: UserId,
        items: Vec<PaymentItem>,
        created_at: CreatedAt<Payment>,
    ) -> Self {
        let total_amount = TotalAmount::sum(items.iter().map(PaymentItem::line_total));
        Self {
            id,
            user_id,
            items,
            total_amount,
            status: PaymentStatus::Pending,
            created_at,
            processed_at: None,
        }
    }

    pub fn settle(
        &mut self,
        next: PaymentStatus,
        at: OffsetDateTime,
    ) -> error_stack::Result<(), KernelError> {
        if !self.status.can_become(&next) {
            return Err(Report::new(KernelError::Conflict)
                .attach_printable(format!("payment cannot move from {} to {next}", self.status)));
        }
        self.status = next;
        self.processed_at = Some(at);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use time::OffsetDateTime;
    use uuid::Uuid;

    use crate::entity::{
        BookId, CreatedAt, Payment, PaymentId, PaymentItem, PaymentStatus, RentPrice,
        RentalDuration, TotalAmount, UserId,
    };
    use crate::KernelError;

    fn items() -> Vec<PaymentItem> {
        vec![
            PaymentItem::new(
                BookId::new(Uuid::new_v4()),
                RentalDuration::new(2),
                RentPrice::new(100.0),
            ),
            PaymentItem::new(
                BookId::new(Uuid::new_v4()),
                RentalDuration::new(1),
                RentPrice::new(50.0),
            ),
        ]
    }

    #[test]
    fn total_must_match_items() {
        let payment = Payment::new(
            PaymentId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            items(),
            TotalAmount::new(250.0),
            PaymentStatus::Completed,
            CreatedAt::now(),
            None,
        );
        assert!(payment.is_ok());

        let report = Payment::new(
            PaymentId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            items(),
            TotalAmount::new(260.0),
            PaymentStatus::Completed,
            CreatedAt::now(),
            None,
        )
        .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::InvariantViolation);
    }

    #[test]
    fn settles_once() {
        let mut payment = Payment::pending(
            PaymentId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            items(),
            CreatedAt::now(),
        );
        assert!(payment.total_amount().matches(250.0));

        let now = OffsetDateTime::now_utc();
        payment.settle(PaymentStatus::Completed, now).unwrap();
        assert_eq!(payment.status(), &PaymentStatus::Completed);
        assert_eq!(payment.processed_at(), &Some(now));

        assert!(payment.settle(PaymentStatus::Failed, now).is_err());
    }
}
