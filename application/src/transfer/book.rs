use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{Book, DestructBook, SelectLimit, SelectOffset};

#[derive(Debug, Clone)]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub image_url: Option<String>,
    pub category: String,
    pub rent_price: f64,
    pub quantity: i32,
    pub available: bool,
    pub average_rating: Option<f64>,
    pub rating_count: i32,
    pub total_rentals: i64,
    pub created_at: OffsetDateTime,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let available = value.is_available();
        let DestructBook {
            id,
            title,
            author,
            description,
            image_url,
            category,
            rent_price,
            quantity,
            rating,
            total_rentals,
            created_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            description: description.into(),
            image_url: image_url.map(Into::into),
            category: category.into(),
            rent_price: rent_price.into(),
            quantity: quantity.into(),
            available,
            average_rating: rating.average(),
            rating_count: *rating.count(),
            total_rentals: total_rentals.into(),
            created_at: created_at.into(),
        }
    }
}

pub struct GetBookDto {
    pub id: Uuid,
}

pub struct GetAllBookDto {
    pub limit: SelectLimit,
    pub offset: SelectOffset,
}

pub struct CreateBookDto {
    pub title: String,
    pub author: String,
    pub description: String,
    pub image_url: Option<String>,
    pub category: String,
    pub rent_price: f64,
    pub quantity: i32,
}
