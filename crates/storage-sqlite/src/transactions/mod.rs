//! SQLite storage implementation for the transaction ledger.

mod model;
mod repository;

pub use model::TransactionDB;
pub use repository::TransactionRepository;

pub(crate) use repository::insert_row;
