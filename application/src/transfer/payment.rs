use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{
    DestructPayment, DestructPaymentItem, Payment, PaymentItem, PaymentStatus, SelectLimit,
    SelectOffset,
};

#[derive(Debug, Clone)]
pub struct PaymentItemDto {
    pub book_id: Uuid,
    pub rental_duration: i32,
    pub rent_price: f64,
    pub line_total: f64,
}

impl From<PaymentItem> for PaymentItemDto {
    fn from(value: PaymentItem) -> Self {
        let line_total = value.line_total();
        let DestructPaymentItem {
            book_id,
            rental_duration,
            rent_price,
        } = value.into_destruct();
        Self {
            book_id: book_id.into(),
            rental_duration: rental_duration.into(),
            rent_price: rent_price.into(),
            line_total,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaymentDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<PaymentItemDto>,
    pub total_amount: f64,
    pub status: PaymentStatus,
    pub created_at: OffsetDateTime,
    pub processed_at: Option<OffsetDateTime>,
}

impl From<Payment> for PaymentDto {
    fn from(value: Payment) -> Self {
        let DestructPayment {
            id,
            user_id,
            items,
            total_amount,
            status,
            created_at,
            processed_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            items: items.into_iter().map(PaymentItemDto::from).collect(),
            total_amount: total_amount.into(),
            status,
            created_at: created_at.into(),
            processed_at,
        }
    }
}

pub struct GetPaymentDto {
    pub user_id: Uuid,
    pub id: Uuid,
}

pub struct GetPaymentsDto {
    pub user_id: Uuid,
    pub status: Option<String>,
    pub limit: SelectLimit,
    pub offset: SelectOffset,
}
