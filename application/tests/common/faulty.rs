use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use kernel::interface::database::DatabaseConnection;
use kernel::interface::query::{
    DependOnBookQuery, DependOnCartQuery, DependOnPaymentQuery, DependOnRentalQuery,
    DependOnUserQuery,
};
use kernel::interface::update::{
    BookModifier, DependOnBookModifier, DependOnCartModifier, DependOnPaymentModifier,
    DependOnRentalModifier, PaymentModifier,
};
use kernel::prelude::entity::{
    Book, BookId, BookQuantity, FeedbackRating, Payment, StockDecrement,
};
use kernel::KernelError;

use driver::database::{
    InMemoryBookRepository, InMemoryCartRepository, InMemoryDatabase, InMemoryPaymentRepository,
    InMemoryRentalRepository, InMemoryTransaction, InMemoryUserRepository,
};

/// [`InMemoryDatabase`] whose book and payment writes can be made to misbehave.
pub struct Faulty {
    pub db: InMemoryDatabase,
    books: FaultyBookRepository,
    payments: SlowPaymentRepository,
}

impl Faulty {
    pub fn new(db: InMemoryDatabase) -> Self {
        Self {
            db,
            books: FaultyBookRepository { short: false },
            payments: SlowPaymentRepository {
                slow_calls: AtomicU32::new(0),
                delay: Duration::ZERO,
            },
        }
    }

    /// Every stock decrement reports too few copies, whatever is stored.
    pub fn short_stock(mut self) -> Self {
        self.books.short = true;
        self
    }

    /// The next `calls` payment inserts stall for `delay` before writing.
    pub fn slow_payments(mut self, calls: u32, delay: Duration) -> Self {
        self.payments = SlowPaymentRepository {
            slow_calls: AtomicU32::new(calls),
            delay,
        };
        self
    }
}

pub struct FaultyBookRepository {
    short: bool,
}

#[async_trait::async_trait]
impl BookModifier for FaultyBookRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        InMemoryBookRepository.create(con, book).await
    }

    async fn decrement_stock(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
        amount: &BookQuantity,
    ) -> error_stack::Result<StockDecrement, KernelError> {
        if self.short {
            return Ok(StockDecrement::Insufficient);
        }
        InMemoryBookRepository
            .decrement_stock(con, book_id, amount)
            .await
    }

    async fn record_rating(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
        rating: &FeedbackRating,
    ) -> error_stack::Result<(), KernelError> {
        InMemoryBookRepository
            .record_rating(con, book_id, rating)
            .await
    }
}

pub struct SlowPaymentRepository {
    slow_calls: AtomicU32,
    delay: Duration,
}

#[async_trait::async_trait]
impl PaymentModifier for SlowPaymentRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        payment: &Payment,
    ) -> error_stack::Result<(), KernelError> {
        let slow = self
            .slow_calls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if slow {
            tokio::time::sleep(self.delay).await;
        }
        InMemoryPaymentRepository.create(con, payment).await
    }

    async fn update_status(
        &self,
        con: &mut InMemoryTransaction,
        payment: &Payment,
    ) -> error_stack::Result<(), KernelError> {
        InMemoryPaymentRepository.update_status(con, payment).await
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for Faulty {
    type Transaction = InMemoryTransaction;

    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        self.db.transact().await
    }
}

impl DependOnUserQuery for Faulty {
    type UserQuery = InMemoryUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &InMemoryUserRepository
    }
}

impl DependOnBookQuery for Faulty {
    type BookQuery = InMemoryBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &InMemoryBookRepository
    }
}

impl DependOnCartQuery for Faulty {
    type CartQuery = InMemoryCartRepository;
    fn cart_query(&self) -> &Self::CartQuery {
        &InMemoryCartRepository
    }
}

impl DependOnPaymentQuery for Faulty {
    type PaymentQuery = InMemoryPaymentRepository;
    fn payment_query(&self) -> &Self::PaymentQuery {
        &InMemoryPaymentRepository
    }
}

impl DependOnRentalQuery for Faulty {
    type RentalQuery = InMemoryRentalRepository;
    fn rental_query(&self) -> &Self::RentalQuery {
        &InMemoryRentalRepository
    }
}

impl DependOnBookModifier for Faulty {
    type BookModifier = FaultyBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &self.books
    }
}

impl DependOnCartModifier for Faulty {
    type CartModifier = InMemoryCartRepository;
    fn cart_modifier(&self) -> &Self::CartModifier {
        &InMemoryCartRepository
    }
}

impl DependOnPaymentModifier for Faulty {
    type PaymentModifier = SlowPaymentRepository;
    fn payment_modifier(&self) -> &Self::PaymentModifier {
        &self.payments
    }
}

impl DependOnRentalModifier for Faulty {
    type RentalModifier = InMemoryRentalRepository;
    fn rental_modifier(&self) -> &Self::RentalModifier {
        &InMemoryRentalRepository
    }
}
