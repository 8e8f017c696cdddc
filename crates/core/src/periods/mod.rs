//! Periods module - the monthly budgeting state machine.

mod periods_model;
mod periods_service;
mod periods_traits;


// Re-export the public interface
pub use periods_model::{Period, PeriodStartRequest, PeriodStartResult, PeriodStatus};
pub use periods_service::PeriodService;
pub use periods_traits::{PeriodRepositoryTrait, PeriodServiceTrait};
