use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{AddCartItemDto, GetCartDto, RemoveCartItemDto, UpdateCartItemDto};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    book_id: Uuid,
    rental_duration: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    rental_duration: i32,
}

/// Caller and the book the path names.
#[derive(Debug)]
pub struct ItemPath {
    pub user_id: Uuid,
    pub book_id: Uuid,
}

pub struct Transformer;

impl Intake<Uuid> for Transformer {
    type To = GetCartDto;
    fn emit(&self, user_id: Uuid) -> Self::To {
        GetCartDto { user_id }
    }
}

impl Intake<(Uuid, AddItemRequest)> for Transformer {
    type To = AddCartItemDto;
    fn emit(&self, (user_id, input): (Uuid, AddItemRequest)) -> Self::To {
        AddCartItemDto {
            user_id,
            book_id: input.book_id,
            rental_duration: input.rental_duration,
        }
    }
}

impl Intake<(ItemPath, UpdateItemRequest)> for Transformer {
    type To = UpdateCartItemDto;
    fn emit(&self, (path, input): (ItemPath, UpdateItemRequest)) -> Self::To {
        UpdateCartItemDto {
            user_id: path.user_id,
            book_id: path.book_id,
            rental_duration: input.rental_duration,
        }
    }
}

impl Intake<ItemPath> for Transformer {
    type To = RemoveCartItemDto;
    fn emit(&self, path: ItemPath) -> Self::To {
        RemoveCartItemDto {
            user_id: path.user_id,
            book_id: path.book_id,
        }
    }
}
