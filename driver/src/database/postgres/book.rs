use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    Book, BookAuthor, BookCategory, BookDescription, BookId, BookImageUrl, BookQuantity,
    BookRating, BookTitle, CreatedAt, FeedbackRating, RentPrice, SelectLimit, SelectOffset,
    StockDecrement, TotalRentals,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id).await
    }

    async fn find_by_ids(
        &self,
        con: &mut PostgresTransaction,
        ids: &[BookId],
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_by_ids(con, ids).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_all(con, limit, offset).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::create(con, book).await
    }

    async fn decrement_stock(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
        amount: &BookQuantity,
    ) -> error_stack::Result<StockDecrement, KernelError> {
        PgBookInternal::decrement_stock(con, book_id, amount).await
    }

    async fn record_rating(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
        rating: &FeedbackRating,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::record_rating(con, book_id, rating).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: Uuid,
    title: String,
    author: String,
    description: String,
    image_url: Option<String>,
    category: String,
    rent_price: f64,
    quantity: i32,
    rating_total: i64,
    rating_count: i32,
    total_rentals: i64,
    created_at: OffsetDateTime,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        Book::new(
            BookId::new(value.id),
            BookTitle::new(value.title),
            BookAuthor::new(value.author),
            BookDescription::new(value.description),
            value.image_url.map(BookImageUrl::new),
            BookCategory::new(value.category),
            RentPrice::new(value.rent_price),
            BookQuantity::new(value.quantity),
            BookRating::new(value.rating_total, value.rating_count),
            TotalRentals::new(value.total_rentals),
            CreatedAt::new(value.created_at),
        )
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, description, image_url, category,
                   rent_price, quantity, rating_total, rating_count, total_rentals, created_at
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn find_by_ids(
        con: &mut PgConnection,
        ids: &[BookId],
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let ids = ids.iter().map(|id| *id.as_ref()).collect::<Vec<Uuid>>();
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, description, image_url, category,
                   rent_price, quantity, rating_total, rating_count, total_rentals, created_at
            FROM books
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn find_all(
        con: &mut PgConnection,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let limit: &i32 = limit.as_ref();
        let offset: &i32 = offset.as_ref();
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, description, image_url, category,
                   rent_price, quantity, rating_total, rating_count, total_rentals, created_at
            FROM books
            ORDER BY created_at, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(*limit))
        .bind(i64::from(*offset))
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn create(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO books (id, title, author, description, image_url, category,
                               rent_price, quantity, available, rating_total, rating_count,
                               total_rentals, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.author().as_ref())
        .bind(book.description().as_ref())
        .bind(book.image_url().as_ref().map(AsRef::<String>::as_ref))
        .bind(book.category().as_ref())
        .bind(book.rent_price().as_ref())
        .bind(book.quantity().as_ref())
        .bind(book.is_available())
        .bind(book.rating().total())
        .bind(book.rating().count())
        .bind(book.total_rentals().as_ref())
        .bind(book.created_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    /// Takes stock under the row lock so the check and the write see the same quantity.
    /// Every copy taken also counts towards the book's lifetime rentals.
    async fn decrement_stock(
        con: &mut PgConnection,
        book_id: &BookId,
        amount: &BookQuantity,
    ) -> error_stack::Result<StockDecrement, KernelError> {
        let remaining = sqlx::query_scalar::<_, i32>(
            // language=postgresql
            r#"
            UPDATE books
            SET quantity      = quantity - $2,
                available     = quantity - $2 > 0,
                total_rentals = total_rentals + $2
            WHERE id = $1 AND quantity >= $2
            RETURNING quantity
            "#,
        )
        .bind(book_id.as_ref())
        .bind(amount.as_ref())
        .fetch_optional(&mut *con)
        .await
        .convert_error()?;

        if let Some(remaining) = remaining {
            return Ok(StockDecrement::Applied {
                remaining: BookQuantity::new(remaining),
            });
        }

        let exists = sqlx::query_scalar::<_, bool>(
            // language=postgresql
            r#"
            SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)
            "#,
        )
        .bind(book_id.as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(if exists {
            StockDecrement::Insufficient
        } else {
            StockDecrement::Missing
        })
    }

    async fn record_rating(
        con: &mut PgConnection,
        book_id: &BookId,
        rating: &FeedbackRating,
    ) -> error_stack::Result<(), KernelError> {
        let updated = sqlx::query(
            // language=postgresql
            r#"
            UPDATE books
            SET rating_total = rating_total + $2,
                rating_count = rating_count + 1
            WHERE id = $1
            "#,
        )
        .bind(book_id.as_ref())
        .bind(i64::from(rating.value()))
        .execute(con)
        .await
        .convert_error()?;
        if updated.rows_affected() == 0 {
            return Err(error_stack::Report::new(KernelError::NotFound)
                .attach_printable("rated book no longer exists"));
        }
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
        BookTitle, CreatedAt, FeedbackRating, RentPrice, StockDecrement,
        TotalRentals,
    };
    use kernel::KernelError;

    use crate::database::postgres::{PostgresBookRepository, PostgresDatabase};

    pub fn book(quantity: i32) -> Book {
        Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new("The Left Hand of Darkness"),
            BookAuthor::new("Ursula K. Le Guin"),
            BookDescription::new("Winter is a planet without gender."),
            None,
            BookCategory::new("sf"),
            RentPrice::new(120.0),
            BookQuantity::new(quantity),
            BookRating::default(),
            TotalRentals::default(),
            CreatedAt::new(crate::database::postgres::test_support::now()),
        )
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn stock_never_goes_negative() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let book = book(1);
        PostgresBookRepository.create(&mut con, &book).await?;

        let found = PostgresBookRepository.find_by_id(&mut con, book.id()).await?;
        assert_eq!(found, Some(book.clone()));

        let one = BookQuantity::new(1);
        let taken = PostgresBookRepository
            .decrement_stock(&mut con, book.id(), &one)
            .await?;
        assert_eq!(
            taken,
            StockDecrement::Applied {
                remaining: BookQuantity::new(0)
            }
        );
        let again = PostgresBookRepository
            .decrement_stock(&mut con, book.id(), &one)
            .await?;
        assert_eq!(again, StockDecrement::Insufficient);
        let missing = PostgresBookRepository
            .decrement_stock(&mut con, &BookId::new(Uuid::new_v4()), &one)
            .await?;
        assert_eq!(missing, StockDecrement::Missing);

        let found = PostgresBookRepository
            .find_by_id(&mut con, book.id())
            .await?
            .unwrap();
        assert!(!found.is_available());
        assert_eq!(found.total_rentals(), &TotalRentals::new(1));

        PostgresBookRepository
            .record_rating(&mut con, book.id(), &FeedbackRating::new(4))
            .await?;
        let found = PostgresBookRepository
            .find_by_ids(&mut con, &[book.id().clone()])
            .await?;
        assert_eq!(found[0].rating().average(), Some(4.0));

        con.roll_back().await?;
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn concurrent_decrements_take_the_last_copy_once() -> error_stack::Result<(), KernelError>
    {
        let db = PostgresDatabase::new().await?;
        let book = book(1);
        let mut con = db.transact().await?;
        PostgresBookRepository.create(&mut con, &book).await?;
        con.commit().await?;

        let race = |db: PostgresDatabase, id: BookId| async move {
            let mut con = db.transact().await?;
            let outcome = PostgresBookRepository
                .decrement_stock(&mut con, &id, &BookQuantity::new(1))
                .await?;
            con.commit().await?;
            Ok::<_, error_stack::Report<KernelError>>(outcome)
        };
        let (first, second) = tokio::join!(
            tokio::spawn(race(db.clone(), book.id().clone())),
            tokio::spawn(race(db.clone(), book.id().clone())),
        );
        let mut outcomes = vec![first.unwrap()?, second.unwrap()?];
        outcomes.sort_by_key(|outcome| matches!(outcome, StockDecrement::Insufficient));
        assert_eq!(
            outcomes,
            vec![
                StockDecrement::Applied {
                    remaining: BookQuantity::new(0)
                },
                StockDecrement::Insufficient
            ]
        );
        Ok(())
    }
}
