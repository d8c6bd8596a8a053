mod request;
mod response;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;

use application::service::CheckoutService;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::identity::Caller;
use crate::route::checkout::request::Transformer;
use crate::route::checkout::response::Presenter;

pub trait CheckoutRouter {
    fn route_checkout(self) -> Self;
}

impl CheckoutRouter for Router<AppModule> {
    fn route_checkout(self) -> Self {
        self.route("/checkout", post(checkout))
    }
}

async fn checkout(
    State(handler): State<AppModule>,
    Caller(user_id): Caller,
    body: Bytes,
) -> Result<impl IntoResponse, ErrorStatus> {
    Controller::new(Transformer, Presenter)
        .try_intake((user_id, body))?
        .handle(|dto| async move {
            handler
                .pgpool()
                .checkout(handler.checkout_policy(), dto)
                .await
        })
        .await
        .map_err(ErrorStatus::from)
}
