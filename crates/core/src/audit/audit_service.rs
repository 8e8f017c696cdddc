use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use super::audit_model::{AuditLogEntry, AuditLogFilter, AuditLogResponse};
use super::audit_traits::{AuditRepositoryTrait, AuditServiceTrait};
use crate::errors::Result;
use crate::ids::IdGenerator;

/// Service exposing the audit trail.
pub struct AuditService {
    repository: Arc<dyn AuditRepositoryTrait>,
    ids: Arc<dyn IdGenerator>,
}

impl AuditService {
    pub fn new(repository: Arc<dyn AuditRepositoryTrait>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { repository, ids }
    }
}

#[async_trait]
impl AuditServiceTrait for AuditService {
    fn list_audit_logs(&self, filter: AuditLogFilter) -> Result<AuditLogResponse> {
        self.repository.list(&filter)
    }

    async fn record(&self, action: &str, context: Value) -> Result<AuditLogEntry> {
        debug!("Recording audit action {}", action);
        let entry = AuditLogEntry::new(self.ids.generate(), action, context);
        self.repository.append(entry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct MockAuditRepository {
        entries: Arc<Mutex<Vec<AuditLogEntry>>>,
    }

    #[async_trait]
    impl AuditRepositoryTrait for MockAuditRepository {
        fn list(&self, filter: &AuditLogFilter) -> Result<AuditLogResponse> {
            let entries = self.entries.lock().unwrap();
            let matching: Vec<AuditLogEntry> = entries
                .iter()
                .filter(|e| filter.action.as_deref().map_or(true, |a| e.action == a))
                .cloned()
                .collect();
            let total = matching.len() as i64;
            Ok(AuditLogResponse {
                data: matching,
                meta: super::super::audit_model::AuditLogResponseMeta {
                    page: filter.page(),
                    limit: filter.limit(),
                    total_count: total,
                    total_pages: (total + filter.limit() - 1) / filter.limit(),
                },
            })
        }

        async fn append(&self, entry: AuditLogEntry) -> Result<AuditLogEntry> {
            self.entries.lock().unwrap().push(entry.clone());
            Ok(entry)
        }
    }

    fn make_service(entries: Arc<Mutex<Vec<AuditLogEntry>>>) -> AuditService {
        AuditService::new(
            Arc::new(MockAuditRepository { entries }),
            Arc::new(crate::ids::UuidGenerator),
        )
    }

    #[tokio::test]
    async fn test_record_appends_entry_with_fresh_id() {
        let entries = Arc::new(Mutex::new(Vec::new()));
        let service = make_service(entries.clone());

        let entry = service
            .record("PERIOD_CLOSE", serde_json::json!({ "periodId": "p-1" }))
            .await
            .unwrap();

        assert!(!entry.id.is_empty());
        assert_eq!(entry.action, "PERIOD_CLOSE");
        assert_eq!(entries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_filters_by_action() {
        let entries = Arc::new(Mutex::new(Vec::new()));
        let service = make_service(entries.clone());

        service
            .record("PERIOD_CLOSE", serde_json::json!({}))
            .await
            .unwrap();
        service
            .record("TRANSFER_FUNDS", serde_json::json!({}))
            .await
            .unwrap();

        let page = service
            .list_audit_logs(AuditLogFilter {
                action: Some("TRANSFER_FUNDS".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].action, "TRANSFER_FUNDS");
        assert_eq!(page.meta.total_count, 1);
    }
}
