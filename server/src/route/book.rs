mod request;
mod response;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use uuid::Uuid;

use application::service::{
    CreateBookService, CreateFeedbackService, GetBookService, GetFeedbackService,
};
use kernel::RejectReason;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::identity::Caller;
use crate::route::book::request::{
    CreateFeedbackRequest, CreateRequest, FeedbackTransformer, GetAllRequest, Transformer,
};
use crate::route::book::response::{FeedbackPresenter, Presenter};
use crate::route::Body;

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl BookRouter for Router<AppModule> {
    fn route_book(self) -> Self {
        self.route(
            "/books",
            get(
                |State(handler): State<AppModule>, Query(req): Query<GetAllRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(req)
                        .handle(|dto| async move { handler.pgpool().get_all_books(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(handler): State<AppModule>,
                 _: Caller,
                 Body(req): Body<CreateRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(req)
                        .handle(|dto| async move { handler.pgpool().create_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/:id",
            get(
                |State(handler): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(id)
                        .handle(|dto| async move { handler.pgpool().get_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)?
                        .ok_or_else(|| {
                            ErrorStatus::not_found(RejectReason::BookNotFound, "book does not exist")
                        })
                },
            ),
        )
        .route(
            "/books/:id/feedback",
            get(
                |State(handler): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(FeedbackTransformer, FeedbackPresenter)
                        .intake(id)
                        .handle(|dto| async move { handler.pgpool().get_feedback(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(handler): State<AppModule>,
                 Caller(user_id): Caller,
                 Path(id): Path<Uuid>,
                 Body(req): Body<CreateFeedbackRequest>| async move {
                    Controller::new(FeedbackTransformer, FeedbackPresenter)
                        .intake((user_id, id, req))
                        .handle(|dto| async move { handler.pgpool().create_feedback(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
