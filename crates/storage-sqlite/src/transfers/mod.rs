pub mod repository;

pub use repository::TransferRepository;
