//! Audit trail module - domain models, services, and traits.

mod audit_model;
mod audit_service;
mod audit_traits;

pub use audit_model::{
    actions, AuditLogEntry, AuditLogFilter, AuditLogResponse, AuditLogResponseMeta,
};
pub use audit_service::AuditService;
pub use audit_traits::{AuditRepositoryTrait, AuditServiceTrait};
