//! Core error types for the Sinkwell ledger.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ledger.
///
/// Every rejected operation maps to exactly one of these kinds and leaves no
/// ledger, balance, run, period, or audit mutation behind. Database-specific
/// errors are wrapped in string form to keep this type database-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing input, rejected before any state is read.
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced fund, period, rule, or record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation is well-formed but the current state forbids it.
    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    /// A partial commit was attempted or detected. Fatal to the operation;
    /// the storage layer must have rolled the unit back entirely.
    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),
}

impl Error {
    /// Stable machine-readable tag for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "VALIDATION",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Precondition(_) => "PRECONDITION",
            Error::Integrity(_) => "INTEGRITY",
            Error::Database(_) => "DATABASE",
        }
    }
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

/// Precondition failures. Each variant carries the current state so the
/// caller can decide what to do next.
#[derive(Error, Debug)]
pub enum PreconditionError {
    #[error("Insufficient balance in fund {fund_id}: {available_cents} available, {requested_cents} requested")]
    InsufficientBalance {
        fund_id: String,
        available_cents: i64,
        requested_cents: i64,
    },

    #[error("A period already exists for {year}-{month:02}")]
    DuplicatePeriod { year: i32, month: u32 },

    #[error("Period {period_id} is already closed")]
    PeriodAlreadyClosed { period_id: String },

    #[error("Period {period_id} is already open")]
    PeriodAlreadyOpen { period_id: String },

    #[error("No funds exist to allocate into")]
    NoFundsAvailable,
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

// === From implementations for common error types ===

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
