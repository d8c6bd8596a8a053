use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{
    Book, BookAuthor, BookCategory, BookDescription, BookId, BookImageUrl, BookQuantity,
    BookRating, BookTitle, CreatedAt, RentPrice, TotalRentals,
};
use kernel::{rejected, KernelError, RejectReason, Rejection};

use crate::transfer::{BookDto, CreateBookDto, GetAllBookDto, GetBookDto};

#[async_trait::async_trait]
pub trait GetBookService: 'static + Sync + Send + DependOnBookQuery {
    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<Option<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let id = BookId::new(dto.id);
        let book = self.book_query().find_by_id(&mut connection, &id).await?;
        Ok(book.map(BookDto::from))
    }

    async fn get_all_books(
        &self,
        dto: GetAllBookDto,
    ) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let books = self
            .book_query()
            .find_all(&mut connection, &dto.limit, &dto.offset)
            .await?;
        Ok(books.into_iter().map(BookDto::from).collect())
    }
}

impl<T> GetBookService for T where T: DependOnBookQuery {}

#[async_trait::async_trait]
pub trait CreateBookService: 'static + Sync + Send + DependOnBookModifier {
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<Uuid, KernelError> {
        let mut problems = Vec::new();
        if dto.title.trim().is_empty() {
            problems.push(Rejection::new(RejectReason::InvalidRequest, "title is empty"));
        }
        if dto.author.trim().is_empty() {
            problems.push(Rejection::new(RejectReason::InvalidRequest, "author is empty"));
        }
        if dto.quantity < 0 {
            problems.push(Rejection::new(
                RejectReason::InvalidRequest,
                format!("quantity {} is negative", dto.quantity),
            ));
        }
        let rent_price = RentPrice::new(dto.rent_price);
        if !rent_price.is_valid() {
            problems.push(Rejection::new(
                RejectReason::InvalidRequest,
                format!("rent price {} must be positive", dto.rent_price),
            ));
        }
        if !problems.is_empty() {
            return Err(rejected(problems));
        }

        let uuid = Uuid::new_v4();
        let book = Book::new(
            BookId::new(uuid),
            BookTitle::new(dto.title),
            BookAuthor::new(dto.author),
            BookDescription::new(dto.description),
            dto.image_url.map(BookImageUrl::new),
            BookCategory::new(dto.category),
            rent_price,
            BookQuantity::new(dto.quantity),
            BookRating::default(),
            TotalRentals::default(),
            CreatedAt::now(),
        );

        let mut connection = self.database_connection().transact().await?;
        self.book_modifier().create(&mut connection, &book).await?;
        connection.commit().await?;

        tracing::info!(book = %uuid, "book registered");
        Ok(uuid)
    }
}

impl<T> CreateBookService for T where T: DependOnBookModifier {}

pub(crate) fn book_not_found(id: &BookId) -> Report<KernelError> {
    Report::from(Rejection::for_book(
        RejectReason::BookNotFound,
        id,
        "book does not exist",
    ))
}
