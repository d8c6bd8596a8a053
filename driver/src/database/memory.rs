use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use error_stack::Report;
use tokio::sync::{Mutex, OwnedMutexGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnBookQuery, DependOnCartQuery, DependOnFeedbackQuery, DependOnPaymentQuery,
    DependOnRentalQuery, DependOnUserQuery,
};
use kernel::interface::update::{
    DependOnBookModifier, DependOnCartModifier, DependOnFeedbackModifier,
    DependOnPaymentModifier, DependOnRentalModifier, DependOnUserModifier,
};
use kernel::prelude::entity::{Book, BookId, CartItem, Feedback, Payment, Rental, User, UserId};
use kernel::KernelError;

pub use self::{book::*, cart::*, feedback::*, payment::*, rental::*, user::*};

mod book;
mod cart;
mod feedback;
mod payment;
mod rental;
mod user;

/// Everything the in-memory store holds. Compared whole by tests that check a failed
/// operation left no trace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryState {
    users: HashMap<UserId, User>,
    books: HashMap<BookId, Book>,
    carts: HashMap<UserId, Vec<CartItem>>,
    payments: Vec<Payment>,
    rentals: Vec<Rental>,
    feedback: Vec<Feedback>,
}

/// Process-local store with the same transactional contract as Postgres.
///
/// Transactions are serialized: `transact` holds the store lock until the transaction
/// is committed, rolled back or dropped, and writes go to a private copy that only
/// `commit` publishes.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
    commit_failures: Arc<AtomicU32>,
    lost_acks: Arc<AtomicU32>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `count` commits fail with [`KernelError::Concurrency`] and discard
    /// their writes, as a serialization conflict would.
    pub fn fail_next_commits(&self, count: u32) {
        self.commit_failures.store(count, Ordering::SeqCst);
    }

    /// The next `count` commits publish their writes and then fail with
    /// [`KernelError::Connection`], as when the link drops before the acknowledgement
    /// arrives.
    pub fn lose_next_commit_acks(&self, count: u32) {
        self.lost_acks.store(count, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;

    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(InMemoryTransaction {
            guard,
            working,
            commit_failures: Arc::clone(&self.commit_failures),
            lost_acks: Arc::clone(&self.lost_acks),
        })
    }
}

pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    commit_failures: Arc<AtomicU32>,
    lost_acks: Arc<AtomicU32>,
}

fn take_one(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
        .is_ok()
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        if take_one(&self.commit_failures) {
            return Err(Report::new(KernelError::Concurrency)
                .attach_printable("injected commit failure"));
        }
        let Self {
            mut guard,
            working,
            lost_acks,
            ..
        } = self;
        *guard = working;
        if take_one(&lost_acks) {
            return Err(Report::new(KernelError::Connection)
                .attach_printable("commit acknowledgement lost"));
        }
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

impl DependOnBookQuery for InMemoryDatabase {
    type BookQuery = InMemoryBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &InMemoryBookRepository
    }
}

impl DependOnBookModifier for InMemoryDatabase {
    type BookModifier = InMemoryBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &InMemoryBookRepository
    }
}

impl DependOnCartQuery for InMemoryDatabase {
    type CartQuery = InMemoryCartRepository;
    fn cart_query(&self) -> &Self::CartQuery {
        &InMemoryCartRepository
    }
}

impl DependOnCartModifier for InMemoryDatabase {
    type CartModifier = InMemoryCartRepository;
    fn cart_modifier(&self) -> &Self::CartModifier {
        &InMemoryCartRepository
    }
}

impl DependOnFeedbackQuery for InMemoryDatabase {
    type FeedbackQuery = InMemoryFeedbackRepository;
    fn feedback_query(&self) -> &Self::FeedbackQuery {
        &InMemoryFeedbackRepository
    }
}

impl DependOnFeedbackModifier for InMemoryDatabase {
    type FeedbackModifier = InMemoryFeedbackRepository;
    fn feedback_modifier(&self) -> &Self::FeedbackModifier {
        &InMemoryFeedbackRepository
    }
}

impl DependOnPaymentQuery for InMemoryDatabase {
    type PaymentQuery = InMemoryPaymentRepository;
    fn payment_query(&self) -> &Self::PaymentQuery {
        &InMemoryPaymentRepository
    }
}

impl DependOnPaymentModifier for InMemoryDatabase {
    type PaymentModifier = InMemoryPaymentRepository;
    fn payment_modifier(&self) -> &Self::PaymentModifier {
        &InMemoryPaymentRepository
    }
}

impl DependOnRentalQuery for InMemoryDatabase {
    type RentalQuery = InMemoryRentalRepository;
    fn rental_query(&self) -> &Self::RentalQuery {
        &InMemoryRentalRepository
    }
}

impl DependOnRentalModifier for InMemoryDatabase {
    type RentalModifier = InMemoryRentalRepository;
    fn rental_modifier(&self) -> &Self::RentalModifier {
        &InMemoryRentalRepository
    }
}

impl DependOnUserQuery for InMemoryDatabase {
    type UserQuery = InMemoryUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &InMemoryUserRepository
    }
}

impl DependOnUserModifier for InMemoryDatabase {
    type UserModifier = InMemoryUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &InMemoryUserRepository
    }
}

fn conflict(message: impl Into<String>) -> Report<KernelError> {
    Report::new(KernelError::Conflict).attach_printable(message.into())
}

fn missing(message: impl Into<String>) -> Report<KernelError> {
    Report::new(KernelError::NotFound).attach_printable(message.into())
}
