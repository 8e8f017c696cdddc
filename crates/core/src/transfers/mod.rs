//! Transfers module - paired fund-to-fund movements.

mod transfers_model;
mod transfers_service;
mod transfers_traits;

// Re-export the public interface
pub use transfers_model::{NewTransfer, TransferExecution};
pub use transfers_service::TransferService;
pub use transfers_traits::{TransferRepositoryTrait, TransferServiceTrait};
