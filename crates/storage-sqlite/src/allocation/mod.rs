//! SQLite storage implementation for allocation rules and runs.

mod model;
mod repository;

pub use model::{AllocationRuleDB, AllocationRunDB};
pub use repository::{AllocationRuleRepository, AllocationRunRepository};

pub(crate) use repository::insert_commit;
