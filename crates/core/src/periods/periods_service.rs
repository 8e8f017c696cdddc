use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use log::info;
use serde_json::json;

use crate::allocation::AllocationServiceTrait;
use crate::audit::{actions, AuditLogEntry};
use crate::errors::{Error, PreconditionError, Result};
use crate::ids::IdGenerator;

use super::periods_model::{Period, PeriodStartRequest, PeriodStartResult, PeriodStatus};
use super::periods_traits::{PeriodRepositoryTrait, PeriodServiceTrait};

/// Service driving the period state machine.
pub struct PeriodService {
    repository: Arc<dyn PeriodRepositoryTrait>,
    allocation_service: Arc<dyn AllocationServiceTrait>,
    ids: Arc<dyn IdGenerator>,
}

impl PeriodService {
    pub fn new(
        repository: Arc<dyn PeriodRepositoryTrait>,
        allocation_service: Arc<dyn AllocationServiceTrait>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            repository,
            allocation_service,
            ids,
        }
    }

    fn new_open_period(&self, year: i32, month: u32, started_at: DateTime<Utc>) -> Period {
        Period {
            id: self.ids.generate(),
            year,
            month,
            status: PeriodStatus::Open,
            started_at,
            closed_at: None,
        }
    }
}

#[async_trait]
impl PeriodServiceTrait for PeriodService {
    fn get_period(&self, period_id: &str) -> Result<Period> {
        self.repository.get_by_id(period_id)
    }

    fn list_periods(&self, status_filter: Option<PeriodStatus>) -> Result<Vec<Period>> {
        self.repository.list(status_filter)
    }

    async fn start_period(&self, request: PeriodStartRequest) -> Result<PeriodStartResult> {
        let now = Utc::now();
        let year = now.year();
        let month = now.month();

        // Friendly pre-check; the unique (year, month) index re-verifies
        // inside the insert unit.
        if self.repository.find_by_month(year, month)?.is_some() {
            return Err(Error::Precondition(PreconditionError::DuplicatePeriod {
                year,
                month,
            }));
        }

        let period = self.new_open_period(year, month, now);

        let allocation = match request.deposit_cents {
            Some(deposit) if request.auto_allocate && deposit > 0 => Some(
                self.allocation_service
                    .prepare_commit(deposit, Some(&period.id))?,
            ),
            _ => None,
        };
        let allocation_run = allocation.as_ref().map(|commit| commit.run.clone());

        let audit = AuditLogEntry::new(
            self.ids.generate(),
            actions::PERIOD_START,
            json!({
                "periodId": period.id,
                "year": period.year,
                "month": period.month,
                "autoAllocate": request.auto_allocate,
                "depositCents": request.deposit_cents.unwrap_or(0),
                "allocationExecuted": allocation.is_some(),
            }),
        );

        info!(
            "Starting period {}-{:02}{}",
            year,
            month,
            if allocation.is_some() {
                " with automatic allocation"
            } else {
                ""
            }
        );

        let period = self.repository.insert(period, allocation, audit).await?;

        Ok(PeriodStartResult {
            period,
            allocation_run,
        })
    }

    async fn close_period(&self, period_id: &str, reason: Option<String>) -> Result<Period> {
        let period = self.repository.get_by_id(period_id)?;
        if period.status == PeriodStatus::Closed {
            return Err(Error::Precondition(PreconditionError::PeriodAlreadyClosed {
                period_id: period.id,
            }));
        }

        let closed_at = Utc::now();
        let audit = AuditLogEntry::new(
            self.ids.generate(),
            actions::PERIOD_CLOSE,
            json!({
                "periodId": period.id,
                "year": period.year,
                "month": period.month,
                "closedAt": closed_at,
                "reason": reason.unwrap_or_else(|| "Manual period closure".to_string()),
            }),
        );

        self.repository.close(&period.id, closed_at, audit).await
    }

    async fn reopen_period(&self, period_id: &str, reason: Option<String>) -> Result<Period> {
        let period = self.repository.get_by_id(period_id)?;
        if period.status == PeriodStatus::Open {
            return Err(Error::Precondition(PreconditionError::PeriodAlreadyOpen {
                period_id: period.id,
            }));
        }

        let audit = AuditLogEntry::new(
            self.ids.generate(),
            actions::PERIOD_REOPEN,
            json!({
                "periodId": period.id,
                "year": period.year,
                "month": period.month,
                "reopenedAt": Utc::now(),
                "originalClosedAt": period.closed_at,
                "reason": reason.unwrap_or_else(|| "Manual period reopening".to_string()),
            }),
        );

        self.repository.reopen(&period.id, audit).await
    }

    async fn get_current_period(&self) -> Result<Period> {
        let now = Utc::now();
        let year = now.year();
        let month = now.month();

        // Any record for the month wins, open or closed; (year, month)
        // uniqueness takes precedence over the OPEN qualifier.
        if let Some(period) = self.repository.find_by_month(year, month)? {
            return Ok(period);
        }

        let period = self.new_open_period(year, month, now);
        let audit = AuditLogEntry::new(
            self.ids.generate(),
            actions::PERIOD_START,
            json!({
                "periodId": period.id,
                "year": period.year,
                "month": period.month,
                "autoAllocate": false,
                "depositCents": 0,
                "allocationExecuted": false,
                "autoCreated": true,
            }),
        );

        match self.repository.insert(period, None, audit).await {
            Ok(created) => Ok(created),
            Err(Error::Precondition(PreconditionError::DuplicatePeriod { .. })) => {
                // Lost a creation race; the winner's row is current.
                self.repository.find_by_month(year, month)?.ok_or_else(|| {
                    Error::NotFound(format!("Period not found for {}-{:02}", year, month))
                })
            }
            Err(e) => Err(e),
        }
    }
}
