use error_stack::Report;
use sqlx::Error;

use kernel::{KernelError, RejectReason, Rejection};

pub trait ConvertError: 'static + Sized {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T: 'static> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let rejection = unique_rejection(&error);
            let context = rejection
                .as_ref()
                .map(|rejection| rejection.reason().kind())
                .unwrap_or_else(|| classify(&error));
            let report = Report::from(error).change_context(context);
            match rejection {
                Some(rejection) => report.attach_printable(rejection),
                None => report,
            }
        })
    }
}

/// Unique constraints whose violation is a business rejection, for inserts that lost a
/// race against the read-side check.
fn unique_rejection(error: &Error) -> Option<Rejection> {
    let Error::Database(error) = error else {
        return None;
    };
    if error.code().as_deref() != Some("23505") {
        return None;
    }
    match error.constraint()? {
        "users_email_key" => Some(Rejection::new(
            RejectReason::EmailTaken,
            "email is already registered",
        )),
        "cart_items_pkey" => Some(Rejection::new(
            RejectReason::DuplicateItem,
            "book is already in the cart",
        )),
        _ => None,
    }
}

fn classify(error: &Error) -> KernelError {
    match error {
        Error::PoolTimedOut => KernelError::Timeout,
        Error::Io(_) | Error::Tls(_) | Error::PoolClosed | Error::WorkerCrashed => {
            KernelError::Connection
        }
        Error::RowNotFound => KernelError::NotFound,
        Error::Database(error) => match error.code().as_deref() {
            // serialization_failure, deadlock_detected
            Some("40001") | Some("40P01") => KernelError::Concurrency,
            // lock_not_available, query_canceled (statement or lock timeout)
            Some("55P03") | Some("57014") => KernelError::Timeout,
            Some("23505") | Some("23514") => KernelError::Conflict,
            Some("23503") => KernelError::NotFound,
            // admin_shutdown, crash_shutdown, cannot_connect_now
            Some("57P01") | Some("57P02") | Some("57P03") => KernelError::Connection,
            _ => KernelError::Internal,
        },
        _ => KernelError::Internal,
    }
}

#[cfg(test)]
mod test {
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt::{Display, Formatter};
    use std::io;

    use sqlx::error::{DatabaseError, ErrorKind};

    use kernel::{rejections_of, KernelError, RejectReason};

    use crate::error::ConvertError;

    #[derive(Debug)]
    struct UniqueViolation(&'static str);

    impl Display for UniqueViolation {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "duplicate key value violates unique constraint \"{}\"", self.0)
        }
    }

    impl StdError for UniqueViolation {}

    impl DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed("23505"))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            Some(self.0)
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    fn violated(constraint: &'static str) -> error_stack::Report<KernelError> {
        let failed: Result<(), sqlx::Error> =
            Err(sqlx::Error::Database(Box::new(UniqueViolation(constraint))));
        failed.convert_error().unwrap_err()
    }

    #[test]
    fn known_unique_constraints_carry_a_rejection() {
        let report = violated("users_email_key");
        assert_eq!(report.current_context(), &KernelError::Conflict);
        assert_eq!(
            rejections_of(&report)[0].reason(),
            &RejectReason::EmailTaken
        );

        let report = violated("cart_items_pkey");
        assert_eq!(report.current_context(), &KernelError::Validation);
        assert_eq!(
            rejections_of(&report)[0].reason(),
            &RejectReason::DuplicateItem
        );

        let report = violated("payments_pkey");
        assert_eq!(report.current_context(), &KernelError::Conflict);
        assert!(rejections_of(&report).is_empty());
    }

    #[test]
    fn pool_and_io_failures_are_transient() {
        let timed_out: Result<(), sqlx::Error> = Err(sqlx::Error::PoolTimedOut);
        let report = timed_out.convert_error().unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Timeout);

        let reset: Result<(), sqlx::Error> = Err(sqlx::Error::Io(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "reset by peer",
        )));
        let report = reset.convert_error().unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Connection);
        assert!(report.current_context().is_transient());
    }

    #[test]
    fn decode_failure_is_internal() {
        let broken: Result<(), sqlx::Error> = Err(sqlx::Error::ColumnNotFound("id".into()));
        let report = broken.convert_error().unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Internal);
    }
}
