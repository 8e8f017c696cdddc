//! SQLite storage implementation for Sinkwell.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `sinkwell-core` and contains:
//! - Database connection pooling and the single-writer actor
//! - Diesel migrations
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `core` is database-agnostic and works with traits.
//!
//! ```text
//!          core (domain)
//!                │
//!                ▼
//!   storage-sqlite (this crate)
//!                │
//!                ▼
//!            SQLite DB
//! ```

pub mod context;
pub mod db;
pub mod errors;
pub mod schema;

mod utils;

// Repository implementations
pub mod allocation;
pub mod audit;
pub mod funds;
pub mod periods;
pub mod transactions;
pub mod transfers;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export the wiring entry point
pub use context::{initialize_context, ServiceContext};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from sinkwell-core for convenience
pub use sinkwell_core::errors::{DatabaseError, Error, Result};
