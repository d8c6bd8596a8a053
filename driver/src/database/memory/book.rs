use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    Book, BookId, BookQuantity, FeedbackRating, SelectLimit, SelectOffset, StockDecrement,
};
use kernel::KernelError;

use crate::database::memory::{conflict, missing, InMemoryTransaction};

pub struct InMemoryBookRepository;

fn order_key(book: &Book) -> (OffsetDateTime, Uuid) {
    let created_at: &OffsetDateTime = book.created_at().as_ref();
    let id: &Uuid = book.id().as_ref();
    (*created_at, *id)
}

#[async_trait::async_trait]
impl BookQuery for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.working.books.get(id).cloned())
    }

    async fn find_by_ids(
        &self,
        con: &mut InMemoryTransaction,
        ids: &[BookId],
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let mut found = Vec::new();
        for id in ids {
            let Some(book) = con.working.books.get(id) else {
                continue;
            };
            if !found.iter().any(|seen: &Book| seen.id() == id) {
                found.push(book.clone());
            }
        }
        Ok(found)
    }

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let limit: &i32 = limit.as_ref();
        let offset: &i32 = offset.as_ref();
        let mut books = con.working.books.values().cloned().collect::<Vec<_>>();
        books.sort_by_key(order_key);
        Ok(books
            .into_iter()
            .skip(*offset as usize)
            .take(*limit as usize)
            .collect())
    }
}

#[async_trait::async_trait]
impl BookModifier for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        if con.working.books.contains_key(book.id()) {
            return Err(conflict("book id already exists"));
        }
        con.working.books.insert(book.id().clone(), book.clone());
        Ok(())
    }

    async fn decrement_stock(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
        amount: &BookQuantity,
    ) -> error_stack::Result<StockDecrement, KernelError> {
        let Some(book) = con.working.books.get_mut(book_id) else {
            return Ok(StockDecrement::Missing);
        };
        let Some(remaining) = book.quantity().checked_sub(amount) else {
            return Ok(StockDecrement::Insufficient);
        };
        let total_rentals = book.total_rentals().add(amount);
        book.substitute(|book| {
            *book.quantity = remaining;
            *book.total_rentals = total_rentals;
        });
        Ok(StockDecrement::Applied { remaining })
    }

    async fn record_rating(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
        rating: &FeedbackRating,
    ) -> error_stack::Result<(), KernelError> {
        let Some(book) = con.working.books.get_mut(book_id) else {
            return Err(missing("rated book does not exist"));
        };
        let recorded = book.rating().record(rating);
        book.substitute(|book| *book.rating = recorded);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test {
    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{
        Book, BookAuthor, BookCategory, BookDescription, BookId, BookQuantity, BookRating,
        BookTitle, CreatedAt, RentPrice, SelectLimit, SelectOffset, StockDecrement,
        TotalRentals,
    };
    use kernel::KernelError;

    use crate::database::{InMemoryBookRepository, InMemoryDatabase};

    pub fn book(quantity: i32) -> Book {
        Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new("Dune"),
            BookAuthor::new("Frank Herbert"),
            BookDescription::new("Desert planet"),
            None,
            BookCategory::new("fiction"),
            RentPrice::new(50.0),
            BookQuantity::new(quantity),
            BookRating::default(),
            TotalRentals::default(),
            CreatedAt::now(),
        )
    }

    #[tokio::test]
    async fn decrement_never_goes_below_zero() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await?;
        let book = book(1);
        InMemoryBookRepository.create(&mut con, &book).await?;

        let one = BookQuantity::new(1);
        let first = InMemoryBookRepository
            .decrement_stock(&mut con, book.id(), &one)
            .await?;
        assert_eq!(
            first,
            StockDecrement::Applied {
                remaining: BookQuantity::new(0)
            }
        );
        let second = InMemoryBookRepository
            .decrement_stock(&mut con, book.id(), &one)
            .await?;
        assert_eq!(second, StockDecrement::Insufficient);
        let absent = InMemoryBookRepository
            .decrement_stock(&mut con, &BookId::new(Uuid::new_v4()), &one)
            .await?;
        assert_eq!(absent, StockDecrement::Missing);

        let stored = InMemoryBookRepository
            .find_by_id(&mut con, book.id())
            .await?
            .unwrap();
        assert!(!stored.is_available());
        assert_eq!(stored.total_rentals(), &TotalRentals::new(1));
        con.commit().await?;
        Ok(())
    }

    #[tokio::test]
    async fn find_all_pages() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await?;
        for _ in 0..3 {
            InMemoryBookRepository.create(&mut con, &book(2)).await?;
        }
        let page = InMemoryBookRepository
            .find_all(&mut con, &SelectLimit::new(2), &SelectOffset::new(2))
            .await?;
        assert_eq!(page.len(), 1);
        con.roll_back().await?;
        Ok(())
    }
}
