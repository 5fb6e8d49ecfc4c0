//! Error type for alert runs.

use stockmon_core::SheetError;
use stockmon_notify::NotifyError;

use crate::schema::SchemaError;

/// Errors that end an alert run.
///
/// `Sheet`, `Schema` and `Definition` are configuration failures raised
/// before any row is processed. `Delivery` means the rendered mail was
/// rejected by the notifier; it is never retried.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("invalid alert definition: {0}")]
    Definition(String),

    #[error("failed to render alert mail: {0}")]
    Render(#[source] NotifyError),

    #[error("failed to deliver alert mail: {0}")]
    Delivery(#[source] NotifyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for alert operations.
pub type Result<T> = std::result::Result<T, AlertError>;
