mod request;
mod response;

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::Router;
use uuid::Uuid;

use application::service::{
    AddCartItemService, GetCartService, RemoveCartItemService, UpdateCartItemService,
};

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::identity::Caller;
use crate::route::cart::request::{AddItemRequest, ItemPath, Transformer, UpdateItemRequest};
use crate::route::cart::response::Presenter;
use crate::route::Body;

pub trait CartRouter {
    fn route_cart(self) -> Self;
}

impl CartRouter for Router<AppModule> {
    fn route_cart(self) -> Self {
        self.route(
            "/cart",
            get(
                |State(handler): State<AppModule>, Caller(user_id): Caller| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(user_id)
                        .handle(|dto| async move { handler.pgpool().get_cart(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/cart/items",
            post(
                |State(handler): State<AppModule>,
                 Caller(user_id): Caller,
                 Body(req): Body<AddItemRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((user_id, req))
                        .handle(|dto| async move { handler.pgpool().add_cart_item(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/cart/items/:book_id",
            put(
                |State(handler): State<AppModule>,
                 Caller(user_id): Caller,
                 Path(book_id): Path<Uuid>,
                 Body(req): Body<UpdateItemRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((ItemPath { user_id, book_id }, req))
                        .handle(|dto| async move { handler.pgpool().update_cart_item(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(handler): State<AppModule>,
                 Caller(user_id): Caller,
                 Path(book_id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(ItemPath { user_id, book_id })
                        .handle(|dto| async move { handler.pgpool().remove_cart_item(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
