//! App error types

use thiserror::Error;

use crate::kv::StorageError;

/// Errors a user flow can propagate.
///
/// Gateway failures never appear here: they are written into the view's
/// error regions instead.
#[derive(Error, Debug)]
pub enum AppError {
    /// Session could not be persisted
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for app flows
pub type AppResult<T> = Result<T, AppError>;
