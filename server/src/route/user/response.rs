use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::UserProfileDto;

use crate::controller::Exhaust;
use crate::route::rental::RentalResponse;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    id: Uuid,
}

impl IntoResponse for CreatedResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    user_id: Uuid,
}

impl IntoResponse for LoginResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    id: Uuid,
    name: String,
    email: String,
    phone_no: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    rented_books: Vec<RentalResponse>,
}

impl IntoResponse for ProfileResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub struct Presenter;

impl Exhaust<Uuid> for Presenter {
    type To = CreatedResponse;
    fn emit(&self, id: Uuid) -> Self::To {
        CreatedResponse { id }
    }
}

pub struct LoginPresenter;

impl Exhaust<Option<Uuid>> for LoginPresenter {
    type To = Option<LoginResponse>;
    fn emit(&self, input: Option<Uuid>) -> Self::To {
        input.map(|user_id| LoginResponse { user_id })
    }
}

impl Exhaust<Option<UserProfileDto>> for Presenter {
    type To = Option<ProfileResponse>;
    fn emit(&self, input: Option<UserProfileDto>) -> Self::To {
        input.map(|UserProfileDto { user, rentals }| ProfileResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            phone_no: user.phone_no,
            created_at: user.created_at,
            rented_books: rentals.into_iter().map(RentalResponse::from).collect(),
        })
    }
}
