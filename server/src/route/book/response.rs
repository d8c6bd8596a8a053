use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::{BookDto, FeedbackDto};

use crate::controller::Exhaust;

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
pub struct BookResponse {
    id: Uuid,
    title: String,
    author: String,
    description: String,
    image_url: Option<String>,
    category: String,
    rent_price: f64,
    quantity: i32,
    available: bool,
    average_rating: Option<f64>,
    rating_count: i32,
    total_rentals: i64,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl From<BookDto> for BookResponse {
    fn from(value: BookDto) -> Self {
        Self {
            id: value.id,
            title: value.title,
            author: value.author,
            description: value.description,
            image_url: value.image_url,
            category: value.category,
            rent_price: value.rent_price,
            quantity: value.quantity,
            available: value.available,
            average_rating: value.average_rating,
            rating_count: value.rating_count,
            total_rentals: value.total_rentals,
            created_at: value.created_at,
        }
    }
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    id: Uuid,
    book_id: Uuid,
    user_id: Uuid,
    rating: i32,
    comment: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl From<FeedbackDto> for FeedbackResponse {
    fn from(value: FeedbackDto) -> Self {
        Self {
            id: value.id,
            book_id: value.book_id,
            user_id: value.user_id,
            rating: value.rating,
            comment: value.comment,
            created_at: value.created_at,
        }
    }
}

pub struct Presenter;

impl Exhaust<Uuid> for Presenter {
    type To = CreatedResponse;
    fn emit(&self, id: Uuid) -> Self::To {
        CreatedResponse { id }
    }
}

impl Exhaust<Option<BookDto>> for Presenter {
    type To = Option<BookResponse>;
    fn emit(&self, input: Option<BookDto>) -> Self::To {
        input.map(BookResponse::from)
    }
}

impl Exhaust<Vec<BookDto>> for Presenter {
    type To = Json<Vec<BookResponse>>;
    fn emit(&self, input: Vec<BookDto>) -> Self::To {
        Json(input.into_iter().map(BookResponse::from).collect())
    }
}

pub struct FeedbackPresenter;

impl Exhaust<FeedbackDto> for FeedbackPresenter {
    type To = (StatusCode, Json<FeedbackResponse>);
    fn emit(&self, input: FeedbackDto) -> Self::To {
        (StatusCode::CREATED, Json(FeedbackResponse::from(input)))
    }
}

impl Exhaust<Vec<FeedbackDto>> for FeedbackPresenter {
    type To = Json<Vec<FeedbackResponse>>;
    fn emit(&self, input: Vec<FeedbackDto>) -> Self::To {
        Json(input.into_iter().map(FeedbackResponse::from).collect())
    }
}
