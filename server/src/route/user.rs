mod request;
mod response;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use application::service::{CreateUserService, GetUserService, VerifyCredentialService};
use kernel::RejectReason;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::identity::{Caller, Unauthenticated};
use crate::route::user::request::{CreateRequest, LoginRequest, Transformer};
use crate::route::user::response::{LoginPresenter, Presenter};
use crate::route::Body;

pub trait UserRouter {
    fn route_user(self) -> Self;
}

impl UserRouter for Router<AppModule> {
    fn route_user(self) -> Self {
        self.route(
            "/users",
            post(
                |State(handler): State<AppModule>, Body(req): Body<CreateRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(req)
                        .handle(|dto| async move { handler.pgpool().create_user(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route("/users/login", post(login))
        .route(
            "/users/me",
            get(
                |State(handler): State<AppModule>, Caller(id): Caller| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(id)
                        .handle(|dto| async move { handler.pgpool().get_user(dto).await })
                        .await
                        .map_err(ErrorStatus::from)?
                        .ok_or_else(|| {
                            ErrorStatus::not_found(RejectReason::UserNotFound, "user does not exist")
                        })
                },
            ),
        )
    }
}

async fn login(
    State(handler): State<AppModule>,
    Body(req): Body<LoginRequest>,
) -> Result<impl IntoResponse, Response> {
    Controller::new(Transformer, LoginPresenter)
        .intake(req)
        .handle(|dto| async move { handler.pgpool().verify_credentials(dto).await })
        .await
        .map_err(|report| ErrorStatus::from(report).into_response())?
        .ok_or_else(|| Unauthenticated::invalid_credentials().into_response())
}
