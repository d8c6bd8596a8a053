use std::fmt::{Display, Formatter};

use error_stack::{Context, Report};
use serde::Serialize;

use crate::entity::BookId;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum KernelError {
    Validation,
    NotFound,
    Conflict,
    Concurrency,
    Timeout,
    Connection,
    InvariantViolation,
    Internal,
}

impl KernelError {
    /// Failures that may succeed when the whole unit of work is attempted again.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            KernelError::Concurrency | KernelError::Timeout | KernelError::Connection
        )
    }

    fn precedence(&self) -> u8 {
        match self {
            KernelError::Validation => 0,
            KernelError::NotFound => 1,
            KernelError::Conflict => 2,
            _ => 3,
        }
    }
}

impl Display for KernelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Validation => write!(f, "Request validation failed"),
            KernelError::NotFound => write!(f, "Referenced resource not found"),
            KernelError::Conflict => write!(f, "Request conflicts with current state"),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Connection => write!(f, "Database connection lost"),
            KernelError::InvariantViolation => write!(f, "Stored data violates an invariant"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    EmptyCart,
    InvalidDuration,
    DuplicateItem,
    BookNotFound,
    UserNotFound,
    PaymentNotFound,
    Unavailable,
    PriceMismatch,
    TotalMismatch,
    NotInCart,
    InvalidRating,
    InvalidRequest,
    EmailTaken,
}

impl RejectReason {
    pub fn kind(&self) -> KernelError {
        match self {
            RejectReason::EmptyCart
            | RejectReason::InvalidDuration
            | RejectReason::DuplicateItem
            | RejectReason::InvalidRating
            | RejectReason::InvalidRequest => KernelError::Validation,
            RejectReason::BookNotFound
            | RejectReason::UserNotFound
            | RejectReason::PaymentNotFound
            | RejectReason::NotInCart => KernelError::NotFound,
            RejectReason::Unavailable
            | RejectReason::PriceMismatch
            | RejectReason::TotalMismatch
            | RejectReason::EmailTaken => KernelError::Conflict,
        }
    }
}

/// Business-rule failure attached to a [`KernelError`] report so callers can tell
/// which item failed and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    reason: RejectReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    book_id: Option<BookId>,
    detail: String,
}

impl Rejection {
    pub fn new(reason: RejectReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            book_id: None,
            detail: detail.into(),
        }
    }

    pub fn for_book(reason: RejectReason, book_id: &BookId, detail: impl Into<String>) -> Self {
        Self {
            reason,
            book_id: Some(book_id.clone()),
            detail: detail.into(),
        }
    }

    pub fn reason(&self) -> &RejectReason {
        &self.reason
    }

    pub fn book_id(&self) -> Option<&BookId> {
        self.book_id.as_ref()
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn into_report(self) -> Report<KernelError> {
        rejected(vec![self])
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.book_id {
            Some(book_id) => write!(
                f,
                "{:?} (book {}): {}",
                self.reason,
                AsRef::<uuid::Uuid>::as_ref(book_id),
                self.detail
            ),
            None => write!(f, "{:?}: {}", self.reason, self.detail),
        }
    }
}

impl From<Rejection> for Report<KernelError> {
    fn from(rejection: Rejection) -> Self {
        rejection.into_report()
    }
}

/// Builds one report out of every rejection. The report's context is the most
/// client-actionable class among them: validation, then not found, then conflict.
pub fn rejected(rejections: impl IntoIterator<Item = Rejection>) -> Report<KernelError> {
    let rejections = rejections.into_iter().collect::<Vec<_>>();
    let kind = rejections
        .iter()
        .map(|rejection| rejection.reason().kind())
        .min_by_key(KernelError::precedence)
        .unwrap_or(KernelError::Validation);
    rejections
        .into_iter()
        .fold(Report::new(kind), |report, rejection| {
            report.attach_printable(rejection)
        })
}

/// Collects every [`Rejection`] attached to `report`, in the order they were attached.
pub fn rejections_of(report: &Report<KernelError>) -> Vec<&Rejection> {
    let mut found = report
        .frames()
        .filter_map(|frame| frame.downcast_ref::<Rejection>())
        .collect::<Vec<_>>();
    found.reverse();
    found
}
