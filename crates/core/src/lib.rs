//! Sinkwell Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for Sinkwell: funds, the
//! transaction ledger, the allocation engine, transfers, the period state
//! machine, and the audit trail. It is database-agnostic and defines traits
//! that are implemented by the `storage-sqlite` crate.

pub mod allocation;
pub mod audit;
pub mod constants;
pub mod errors;
pub mod funds;
pub mod ids;
pub mod periods;
pub mod transactions;
pub mod transfers;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
