mod detail;
mod id;
mod price;
mod quantity;
mod rating;
mod rentals;
mod title;

pub use self::{
    detail::*, id::*, price::*, quantity::*, rating::*, rentals::*, title::*,
};
use crate::entity::common::CreatedAt;
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, PartialEq, References, Destructure, Mutation)]
pub struct Book {
    id: BookId,
    title: BookTitle,
    author: BookAuthor,
    description: BookDescription,
    image_url: Option<BookImageUrl>,
    category: BookCategory,
    rent_price: RentPrice,
    quantity: BookQuantity,
    rating: BookRating,
    total_rentals: TotalRentals,
    created_at: CreatedAt<Book>,
}

impl Book {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: BookId,
        title: BookTitle,
        author: BookAuthor,
        description: BookDescription,
        image_url: Option<BookImageUrl>,
        category: BookCategory,
        rent_price: RentPrice,
        quantity: BookQuantity,
        rating: BookRating,
        total_rentals: TotalRentals,
        created_at: CreatedAt<Book>,
    ) -> Self {
        Self {
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
        }
    }

    /// Availability is derived from stock, never stored independently.
    pub fn is_available(&self) -> bool {
        self.quantity.is_positive()
    }
}
