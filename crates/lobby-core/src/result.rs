//! Convenience result type alias for Lobby.

use crate::error::AppError;

/// A specialized `Result` type for Lobby operations.
pub type AppResult<T> = Result<T, AppError>;
