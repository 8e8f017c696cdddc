use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use serde_json::json;

use super::funds_model::{Fund, FundUpdate, NewFund};
use super::funds_traits::{FundRepositoryTrait, FundServiceTrait};
use crate::audit::{actions, AuditLogEntry};
use crate::errors::Result;
use crate::ids::IdGenerator;

/// Service for managing funds.
pub struct FundService {
    repository: Arc<dyn FundRepositoryTrait>,
    ids: Arc<dyn IdGenerator>,
}

impl FundService {
    /// Creates a new FundService instance.
    pub fn new(repository: Arc<dyn FundRepositoryTrait>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { repository, ids }
    }
}

#[async_trait]
impl FundServiceTrait for FundService {
    fn get_fund(&self, fund_id: &str) -> Result<Fund> {
        self.repository.get_by_id(fund_id)
    }

    fn list_funds(&self, is_active_filter: Option<bool>) -> Result<Vec<Fund>> {
        self.repository.list(is_active_filter)
    }

    async fn create_fund(&self, new_fund: NewFund) -> Result<Fund> {
        new_fund.validate()?;

        let id = new_fund
            .id
            .clone()
            .unwrap_or_else(|| self.ids.generate());
        let fund = new_fund.into_fund(id, Utc::now());
        debug!("Creating fund {} ({})", fund.name, fund.id);

        let audit = AuditLogEntry::new(
            self.ids.generate(),
            actions::FUND_CREATE,
            json!({
                "fundId": fund.id,
                "name": fund.name,
                "targetCents": fund.target_cents,
            }),
        );
        self.repository.insert(fund, audit).await
    }

    async fn update_fund(&self, fund_id: &str, update: FundUpdate) -> Result<Fund> {
        update.validate()?;

        let current = self.repository.get_by_id(fund_id)?;
        let updated = update.apply_to(current, Utc::now());
        debug!("Updating fund {}", fund_id);

        let audit = AuditLogEntry::new(
            self.ids.generate(),
            actions::FUND_UPDATE,
            json!({
                "fundId": updated.id,
                "name": updated.name,
            }),
        );
        self.repository.update(updated, audit).await
    }

    async fn delete_fund(&self, fund_id: &str) -> Result<()> {
        let fund = self.repository.get_by_id(fund_id)?;
        debug!("Deleting fund {} ({})", fund.name, fund.id);

        let audit = AuditLogEntry::new(
            self.ids.generate(),
            actions::FUND_DELETE,
            json!({
                "fundId": fund.id,
                "name": fund.name,
                "balanceCents": fund.balance_cents,
            }),
        );
        self.repository.delete(fund_id, audit).await
    }
}
