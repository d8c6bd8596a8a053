mod request;
mod response;

pub(crate) use self::response::RentalResponse;

use axum::extract::State;
use axum::routing::post;
use axum::Router;

use application::service::RentBookService;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::identity::Caller;
use crate::route::rental::request::{RentRequest, Transformer};
use crate::route::rental::response::Presenter;
use crate::route::Body;

pub trait RentalRouter {
    fn route_rental(self) -> Self;
}

impl RentalRouter for Router<AppModule> {
    fn route_rental(self) -> Self {
        self.route(
            "/rentals",
            post(
                |State(handler): State<AppModule>,
                 Caller(user_id): Caller,
                 Body(req): Body<RentRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((user_id, req))
                        .handle(|dto| async move { handler.pgpool().rent_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
