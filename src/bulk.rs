//! Bulk-delete confirmation lifecycle.
//!
//! Closed -> Confirming -> Busy -> Closed. A [`BulkDeleteJob`] owns the
//! records captured at confirmation time, so it can run on another thread
//! while the table keeps changing.

use crate::options::BulkDeleteFn;
use serde::Serialize;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// Failure reported by a bulk-delete callback. The table never shows it;
/// surfacing it is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BulkActionError {
    message: String,
}

impl BulkActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct JobId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulkDeleteState {
    #[default]
    Closed,
    Confirming,
    Busy(JobId),
}

impl BulkDeleteState {
    pub fn is_busy(&self) -> bool {
        matches!(self, BulkDeleteState::Busy(_))
    }
}

/// Result of one bulk-delete call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkDeleteOutcome {
    pub job: JobId,
    /// Number of records handed to the callback
    pub requested: usize,
    pub result: Result<(), BulkActionError>,
}

impl BulkDeleteOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// A confirmed bulk delete waiting to run.
pub struct BulkDeleteJob<R> {
    id: JobId,
    records: Vec<R>,
    action: BulkDeleteFn<R>,
}

impl<R> BulkDeleteJob<R> {
    pub(crate) fn new(id: JobId, records: Vec<R>, action: BulkDeleteFn<R>) -> Self {
        Self { id, records, action }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    /// Records captured when the delete was confirmed.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Invoke the callback exactly once. A panic inside it is reported as a
    /// failed outcome.
    pub fn run(self) -> BulkDeleteOutcome {
        let Self { id, records, action } = self;
        let requested = records.len();
        let result = match panic::catch_unwind(AssertUnwindSafe(|| action(records))) {
            Ok(result) => result,
            Err(payload) => Err(BulkActionError::new(panic_message(payload.as_ref()))),
        };
        BulkDeleteOutcome {
            job: id,
            requested,
            result,
        }
    }
}

impl<R> fmt::Debug for BulkDeleteJob<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkDeleteJob")
            .field("id", &self.id)
            .field("records", &self.records.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("bulk delete panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("bulk delete panicked: {}", s)
    } else {
        "bulk delete panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn run_calls_action_once_with_captured_records() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let action: BulkDeleteFn<u32> = Arc::new(move |records: Vec<u32>| -> Result<(), BulkActionError> {
            seen.fetch_add(1, Ordering::SeqCst);
            assert_eq!(records, vec![4, 9]);
            Ok(())
        });

        let outcome = BulkDeleteJob::new(JobId(3), vec![4, 9], action).run();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.job, JobId(3));
        assert_eq!(outcome.requested, 2);
        assert!(outcome.is_success());
    }

    #[test]
    fn panics_become_failures() {
        let action: BulkDeleteFn<u32> = Arc::new(|_: Vec<u32>| -> Result<(), BulkActionError> {
            panic!("backend exploded")
        });
        let outcome = BulkDeleteJob::new(JobId(1), vec![1], action).run();
        let err = outcome.result.unwrap_err();
        assert!(err.message().contains("backend exploded"));
    }
}
