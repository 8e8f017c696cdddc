//! SQLite storage implementation for funds.

mod model;
mod repository;

pub use model::{FundChangesDB, FundDB};
pub use repository::FundRepository;

pub(crate) use repository::{apply_balance_delta, load_fund};
