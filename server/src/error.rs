use std::process::{ExitCode, Termination};

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use error_stack::Report;
use serde::Serialize;

use kernel::{rejections_of, KernelError, RejectReason, Rejection};

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

/// JSON body of every failed request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody<'a> {
    pub reason: &'static str,
    pub message: String,
    pub rejections: Vec<&'a Rejection>,
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl ErrorStatus {
    /// For lookups that found nothing.
    pub fn not_found(reason: RejectReason, detail: impl Into<String>) -> Self {
        ErrorStatus(Report::from(Rejection::new(reason, detail)))
    }

    pub fn kind(&self) -> &KernelError {
        self.0.current_context()
    }

    fn status(&self) -> StatusCode {
        match self.kind() {
            KernelError::Validation => StatusCode::BAD_REQUEST,
            KernelError::NotFound => StatusCode::NOT_FOUND,
            KernelError::Conflict => StatusCode::CONFLICT,
            KernelError::Concurrency | KernelError::Connection => StatusCode::SERVICE_UNAVAILABLE,
            KernelError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            KernelError::InvariantViolation | KernelError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

pub(crate) fn reason_code(kind: &KernelError) -> &'static str {
    match kind {
        KernelError::Validation => "validation",
        KernelError::NotFound => "not_found",
        KernelError::Conflict => "conflict",
        KernelError::Concurrency => "concurrency",
        KernelError::Timeout => "timeout",
        KernelError::Connection => "connection",
        KernelError::InvariantViolation => "invariant_violation",
        KernelError::Internal => "internal",
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let kind = self.kind();
        match kind {
            KernelError::InvariantViolation => {
                tracing::error!(target: "invariant", "{:?}", self.0);
            }
            _ if status.is_server_error() => tracing::error!("{:?}", self.0),
            _ => tracing::debug!("request rejected: {:?}", self.0),
        }
        let body = ErrorBody {
            reason: reason_code(kind),
            message: kind.to_string(),
            rejections: rejections_of(&self.0),
        };
        (status, Json(body)).into_response()
    }
}
