/*! Error types for export operations. */

/// Errors that can occur while wiring up or running the export bridge.
///
/// Protocol queries never produce errors: unknown ids resolve to empty or
/// default answers by design, since the remote side may race with a reset.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
  #[error("no menu bus configured")]
  MissingBus,

  #[error("scheduler failed to start: {0}")]
  Scheduler(String),

  #[error("registrar call failed: {0}")]
  Registrar(String),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
