//! Service wiring: builds the repository and service graph over one database.

use std::sync::Arc;

use sinkwell_core::allocation::{AllocationService, AllocationServiceTrait};
use sinkwell_core::audit::{AuditService, AuditServiceTrait};
use sinkwell_core::errors::Result;
use sinkwell_core::funds::{FundService, FundServiceTrait};
use sinkwell_core::ids::{IdGenerator, UuidGenerator};
use sinkwell_core::periods::{PeriodService, PeriodServiceTrait};
use sinkwell_core::transactions::{TransactionService, TransactionServiceTrait};
use sinkwell_core::transfers::{TransferService, TransferServiceTrait};

use crate::allocation::{AllocationRuleRepository, AllocationRunRepository};
use crate::audit::AuditRepository;
use crate::db::{self, DbPool};
use crate::funds::FundRepository;
use crate::periods::PeriodRepository;
use crate::transactions::TransactionRepository;
use crate::transfers::TransferRepository;

pub struct ServiceContext {
    pub pool: Arc<DbPool>,

    // Services
    pub fund_service: Arc<dyn FundServiceTrait>,
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub allocation_service: Arc<dyn AllocationServiceTrait>,
    pub transfer_service: Arc<dyn TransferServiceTrait>,
    pub period_service: Arc<dyn PeriodServiceTrait>,
    pub audit_service: Arc<dyn AuditServiceTrait>,
}

impl ServiceContext {
    pub fn fund_service(&self) -> Arc<dyn FundServiceTrait> {
        Arc::clone(&self.fund_service)
    }

    pub fn transaction_service(&self) -> Arc<dyn TransactionServiceTrait> {
        Arc::clone(&self.transaction_service)
    }

    pub fn allocation_service(&self) -> Arc<dyn AllocationServiceTrait> {
        Arc::clone(&self.allocation_service)
    }

    pub fn transfer_service(&self) -> Arc<dyn TransferServiceTrait> {
        Arc::clone(&self.transfer_service)
    }

    pub fn period_service(&self) -> Arc<dyn PeriodServiceTrait> {
        Arc::clone(&self.period_service)
    }

    pub fn audit_service(&self) -> Arc<dyn AuditServiceTrait> {
        Arc::clone(&self.audit_service)
    }
}

/// Initializes the database and wires every repository and service.
pub async fn initialize_context(app_data_dir: &str) -> Result<ServiceContext> {
    let db_path = db::init(app_data_dir)?;
    let pool = db::create_pool(&db_path)?;

    db::run_migrations(&pool)?;

    // Single writer: every mutation in the process funnels through one actor
    // holding one connection.
    let writer = db::spawn_writer(pool.as_ref().clone());

    // Instantiate Repositories
    let fund_repository = Arc::new(FundRepository::new(pool.clone(), writer.clone()));
    let transaction_repository = Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let rule_repository = Arc::new(AllocationRuleRepository::new(pool.clone(), writer.clone()));
    let run_repository = Arc::new(AllocationRunRepository::new(pool.clone(), writer.clone()));
    let period_repository = Arc::new(PeriodRepository::new(pool.clone(), writer.clone()));
    let audit_repository = Arc::new(AuditRepository::new(pool.clone(), writer.clone()));
    let transfer_repository = Arc::new(TransferRepository::new(writer.clone()));

    let ids: Arc<dyn IdGenerator> = Arc::new(UuidGenerator);

    // Instantiate Services in dependency order
    let fund_service: Arc<dyn FundServiceTrait> =
        Arc::new(FundService::new(fund_repository.clone(), ids.clone()));

    let transaction_service: Arc<dyn TransactionServiceTrait> = Arc::new(TransactionService::new(
        transaction_repository.clone(),
        fund_repository.clone(),
        ids.clone(),
    ));

    let allocation_service: Arc<dyn AllocationServiceTrait> = Arc::new(AllocationService::new(
        rule_repository.clone(),
        run_repository.clone(),
        fund_repository.clone(),
        ids.clone(),
    ));

    let transfer_service: Arc<dyn TransferServiceTrait> = Arc::new(TransferService::new(
        transfer_repository.clone(),
        fund_repository.clone(),
        ids.clone(),
    ));

    let period_service: Arc<dyn PeriodServiceTrait> = Arc::new(PeriodService::new(
        period_repository.clone(),
        allocation_service.clone(),
        ids.clone(),
    ));

    let audit_service: Arc<dyn AuditServiceTrait> =
        Arc::new(AuditService::new(audit_repository.clone(), ids.clone()));

    Ok(ServiceContext {
        pool,
        fund_service,
        transaction_service,
        allocation_service,
        transfer_service,
        period_service,
        audit_service,
    })
}
