use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{
    CreateBookDto, CreateFeedbackDto, GetAllBookDto, GetBookDto, GetFeedbackDto,
};
use kernel::prelude::entity::{SelectLimit, SelectOffset};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    title: String,
    author: String,
    #[serde(default)]
    description: String,
    image_url: Option<String>,
    category: String,
    quantity: i32,
    rent_price: f64,
}

// I want to use primitive type(i32) in these fields, but default attribute not supported for literals(https://github.com/serde-rs/serde/issues/368)
#[derive(Debug, Deserialize)]
pub struct GetAllRequest {
    #[serde(default)]
    limit: SelectLimit,
    #[serde(default)]
    offset: SelectOffset,
}

#[derive(Debug, Deserialize)]
pub struct CreateFeedbackRequest {
    rating: i32,
    comment: Option<String>,
}

pub struct Transformer;

impl Intake<CreateRequest> for Transformer {
    type To = CreateBookDto;
    fn emit(&self, input: CreateRequest) -> Self::To {
        CreateBookDto {
            title: input.title,
            author: input.author,
            description: input.description,
            image_url: input.image_url,
            category: input.category,
            rent_price: input.rent_price,
            quantity: input.quantity,
        }
    }
}

impl Intake<GetAllRequest> for Transformer {
    type To = GetAllBookDto;
    fn emit(&self, input: GetAllRequest) -> Self::To {
        GetAllBookDto {
            limit: input.limit,
            offset: input.offset,
        }
    }
}

impl Intake<Uuid> for Transformer {
    type To = GetBookDto;
    fn emit(&self, id: Uuid) -> Self::To {
        GetBookDto { id }
    }
}

pub struct FeedbackTransformer;

impl Intake<Uuid> for FeedbackTransformer {
    type To = GetFeedbackDto;
    fn emit(&self, book_id: Uuid) -> Self::To {
        GetFeedbackDto { book_id }
    }
}

/// (caller, book, body)
impl Intake<(Uuid, Uuid, CreateFeedbackRequest)> for FeedbackTransformer {
    type To = CreateFeedbackDto;
    fn emit(&self, (user_id, book_id, input): (Uuid, Uuid, CreateFeedbackRequest)) -> Self::To {
        CreateFeedbackDto {
            user_id,
            book_id,
            rating: input.rating,
            comment: input.comment,
        }
    }
}
