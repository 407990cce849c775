use thiserror::Error;

/// Errors related to the core functionality of the link shortener.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Failures reported by a [`Repository`](crate::Repository) backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// The short code is already taken by a live record.
    #[error("short code already exists: {0}")]
    Conflict(String),
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

/// Errors returned when creating a new short link.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("no free short code found after {attempts} attempts")]
    Exhausted { attempts: u32 },
    #[error("storage error: {0}")]
    Storage(
        #[from]
        #[source]
        StorageError,
    ),
}

/// Outcomes of resolving a short code that do not yield a target.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RedirectError {
    #[error("short code not found")]
    NotFound,
    #[error("short link has expired")]
    Expired,
    #[error("storage error: {0}")]
    Storage(
        #[from]
        #[source]
        StorageError,
    ),
}
