mod report;
mod stats;

pub use report::{ReportConfig, Reporter};

use std::time::{Duration, Instant};

/// One dispatched operation, timed from creation.
///
/// Create a record just before issuing a request, then complete it with the outcome once the
/// response has been received. The record is then handed to the [Reporter].
#[derive(Debug, Clone)]
pub struct OperationRecord {
    operation_id: String,
    /// Free-form kind for the operation, by convention the HTTP method. Ends up in the `Type`
    /// column of the run statistics file.
    kind: String,
    started: Instant,
    elapsed: Option<Duration>,
    is_error: bool,
}

impl OperationRecord {
    pub fn new(operation_id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            operation_id: operation_id.into(),
            kind: kind.into(),
            started: Instant::now(),
            elapsed: None,
            is_error: false,
        }
    }

    /// Stop the clock and mark the outcome.
    pub fn complete(mut self, is_error: bool) -> Self {
        self.elapsed = Some(self.started.elapsed());
        self.is_error = is_error;
        self
    }

    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Elapsed time for a completed record, or time since creation for one still in flight.
    pub fn duration(&self) -> Duration {
        self.elapsed.unwrap_or_else(|| self.started.elapsed())
    }
}
