mod request;
mod response;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use uuid::Uuid;

use application::service::GetPaymentService;
use kernel::RejectReason;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::identity::Caller;
use crate::route::payment::request::{GetAllRequest, Transformer};
use crate::route::payment::response::Presenter;

pub trait PaymentRouter {
    fn route_payment(self) -> Self;
}

impl PaymentRouter for Router<AppModule> {
    fn route_payment(self) -> Self {
        self.route(
            "/payments",
            get(
                |State(handler): State<AppModule>,
                 Caller(user_id): Caller,
                 Query(req): Query<GetAllRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((user_id, req))
                        .handle(|dto| async move { handler.pgpool().get_payments(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/payments/:id",
            get(
                |State(handler): State<AppModule>,
                 Caller(user_id): Caller,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((user_id, id))
                        .handle(|dto| async move { handler.pgpool().get_payment(dto).await })
                        .await
                        .map_err(ErrorStatus::from)?
                        .ok_or_else(|| {
                            ErrorStatus::not_found(
                                RejectReason::PaymentNotFound,
                                "payment does not exist",
                            )
                        })
                },
            ),
        )
    }
}
