//! Allocation module - rules, the deposit-splitting engine, and run records.

mod allocation_engine;
mod allocation_model;
mod allocation_service;
mod allocation_traits;

#[cfg(test)]
mod allocation_service_tests;

// Re-export the public interface
pub use allocation_engine::allocate;
pub use allocation_model::{
    compute_run_hash, AllocationCommit, AllocationLine, AllocationPreview, AllocationResult,
    AllocationRule, AllocationRuleUpdate, AllocationRun, NewAllocationRule, RuleMode,
};
pub use allocation_service::AllocationService;
pub use allocation_traits::{
    AllocationRuleRepositoryTrait, AllocationRunRepositoryTrait, AllocationServiceTrait,
};
