mod book;
mod cart;
mod checkout;
mod health;
mod payment;
mod rental;
mod user;

pub use self::{
    book::BookRouter, cart::CartRouter, checkout::CheckoutRouter, health::HealthRouter,
    payment::PaymentRouter, rental::RentalRouter, user::UserRouter,
};

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use error_stack::Report;
use serde::de::DeserializeOwned;

use kernel::{RejectReason, Rejection};

use crate::error::ErrorStatus;

/// `Json` whose rejections use the common error body.
pub struct Body<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Body<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ErrorStatus;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Body(value)),
            Err(rejection) => Err(malformed(&rejection)),
        }
    }
}

fn malformed(rejection: &JsonRejection) -> ErrorStatus {
    ErrorStatus::from(Report::from(Rejection::new(
        RejectReason::InvalidRequest,
        rejection.body_text(),
    )))
}
