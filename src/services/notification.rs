use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use crate::models::notification::{
    BulkItemOutcome, BulkNotificationItem, DeliveryStatus, DispatchOutcome, NotificationRecord,
    NotificationRequest, NotificationResult, NotificationType,
};

/// Outbound messaging provider. Implementations never fail past this
/// boundary; provider and transport problems are folded into the result.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn send_sms(&self, recipient: &str, message: &str) -> NotificationResult;
    async fn send_whatsapp(&self, recipient: &str, message: &str) -> NotificationResult;
}

/// Durable audit store for notification attempts.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn store_notification(&self, record: &NotificationRecord) -> anyhow::Result<()>;
}

/// Caller-input problems detected before any provider call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("{0} is required for the requested notification type")]
    MissingRecipient(&'static str),
    #[error("message must not be empty")]
    EmptyMessage,
}

pub struct NotificationService {
    gateway: Arc<dyn NotificationGateway>,
    store: Arc<dyn NotificationStore>,
}

impl NotificationService {
    pub fn new(gateway: Arc<dyn NotificationGateway>, store: Arc<dyn NotificationStore>) -> Self {
        Self { gateway, store }
    }

    /// Dispatches one notification over the requested channel(s), SMS first
    /// when both are selected, and records the aggregated outcome. Audit
    /// persistence is best-effort and never fails the dispatch.
    pub async fn send_notification(
        &self,
        request: &NotificationRequest,
    ) -> Result<DispatchOutcome, DispatchError> {
        if request.message.trim().is_empty() {
            return Err(DispatchError::EmptyMessage);
        }

        let sms_recipient = if request.notification_type.wants_sms() {
            Some(required(&request.parent_contact, "parent_contact")?)
        } else {
            None
        };
        let whatsapp_recipient = if request.notification_type.wants_whatsapp() {
            Some(required(&request.parent_whatsapp, "parent_whatsapp")?)
        } else {
            None
        };

        let mut results = Vec::new();
        if let Some(recipient) = sms_recipient {
            results.push(self.gateway.send_sms(recipient, &request.message).await);
        }
        if let Some(recipient) = whatsapp_recipient {
            results.push(self.gateway.send_whatsapp(recipient, &request.message).await);
        }

        let success = results.iter().all(|r| r.success);
        self.record_attempt(
            &request.student_id,
            recorded_contact(&request.parent_contact, &request.parent_whatsapp),
            &request.message,
            request.notification_type,
            success,
        )
        .await;

        Ok(DispatchOutcome {
            success,
            message: if success {
                "Notification sent successfully".to_string()
            } else {
                "One or more notification channels failed".to_string()
            },
            results,
        })
    }

    /// Dispatches a batch sequentially. Every item is attempted on both
    /// channels; a failing item is captured as its own outcome and never
    /// aborts the rest of the batch.
    pub async fn send_bulk(&self, items: &[BulkNotificationItem]) -> Vec<BulkItemOutcome> {
        let mut outcomes = Vec::with_capacity(items.len());
        for item in items {
            match self.dispatch_bulk_item(item).await {
                Ok((sms, whatsapp)) => outcomes.push(BulkItemOutcome::Dispatched {
                    student_id: item.student_id.clone(),
                    sms,
                    whatsapp,
                }),
                Err(err) => {
                    log::warn!(
                        "Bulk notification for student {} not dispatched: {}",
                        item.student_id,
                        err
                    );
                    outcomes.push(BulkItemOutcome::Failed {
                        student_id: item.student_id.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }
        outcomes
    }

    async fn dispatch_bulk_item(
        &self,
        item: &BulkNotificationItem,
    ) -> Result<(NotificationResult, NotificationResult), DispatchError> {
        if item.message.trim().is_empty() {
            return Err(DispatchError::EmptyMessage);
        }
        let contact = required(&item.parent_contact, "parent_contact")?;
        let whatsapp_number = required(&item.parent_whatsapp, "parent_whatsapp")?;

        let sms = self.gateway.send_sms(contact, &item.message).await;
        let whatsapp = self.gateway.send_whatsapp(whatsapp_number, &item.message).await;

        self.record_attempt(
            &item.student_id,
            contact.to_string(),
            &item.message,
            NotificationType::Both,
            sms.success && whatsapp.success,
        )
        .await;

        Ok((sms, whatsapp))
    }

    async fn record_attempt(
        &self,
        student_id: &str,
        parent_contact: String,
        message: &str,
        notification_type: NotificationType,
        success: bool,
    ) {
        let record = NotificationRecord {
            student_id: student_id.to_string(),
            parent_contact,
            message: message.to_string(),
            notification_type,
            status: if success {
                DeliveryStatus::Sent
            } else {
                DeliveryStatus::Failed
            },
            created_at: Utc::now(),
        };

        if let Err(err) = self.store.store_notification(&record).await {
            log::error!(
                "Failed to store notification record for student {}: {:#}",
                student_id,
                err
            );
        }
    }
}

fn required<'a>(
    value: &'a Option<String>,
    field: &'static str,
) -> Result<&'a str, DispatchError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DispatchError::MissingRecipient(field)),
    }
}

fn recorded_contact(parent_contact: &Option<String>, parent_whatsapp: &Option<String>) -> String {
    parent_contact
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .or(parent_whatsapp.as_deref())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct ScriptedGateway {
        sms_success: bool,
        whatsapp_success: bool,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedGateway {
        fn new(sms_success: bool, whatsapp_success: bool) -> Self {
            Self {
                sms_success,
                whatsapp_success,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn scripted_result(success: bool) -> NotificationResult {
        NotificationResult {
            success,
            status_code: Some(if success { 201 } else { 400 }),
            response: json!({}),
        }
    }

    #[async_trait]
    impl NotificationGateway for ScriptedGateway {
        async fn send_sms(&self, recipient: &str, _message: &str) -> NotificationResult {
            self.calls.lock().unwrap().push(format!("sms:{recipient}"));
            scripted_result(self.sms_success)
        }

        async fn send_whatsapp(&self, recipient: &str, _message: &str) -> NotificationResult {
            self.calls.lock().unwrap().push(format!("whatsapp:{recipient}"));
            scripted_result(self.whatsapp_success)
        }
    }

    struct RecordingStore {
        fail: bool,
        records: Mutex<Vec<NotificationRecord>>,
    }

    impl RecordingStore {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                records: Mutex::new(Vec::new()),
            }
        }

        fn records(&self) -> Vec<NotificationRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationStore for RecordingStore {
        async fn store_notification(&self, record: &NotificationRecord) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("storage offline");
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn request(notification_type: NotificationType) -> NotificationRequest {
        NotificationRequest {
            student_id: "1".to_string(),
            parent_contact: Some("+91 9876543210".to_string()),
            parent_whatsapp: Some("+91 9876543210".to_string()),
            message: "Parent-teacher meeting on Friday".to_string(),
            notification_type,
        }
    }

    fn bulk_item(student_id: &str, whatsapp: Option<&str>) -> BulkNotificationItem {
        BulkNotificationItem {
            student_id: student_id.to_string(),
            parent_contact: Some("+91 9876543210".to_string()),
            parent_whatsapp: whatsapp.map(str::to_string),
            message: "Fees due".to_string(),
        }
    }

    fn service(
        gateway: Arc<ScriptedGateway>,
        store: Arc<RecordingStore>,
    ) -> NotificationService {
        NotificationService::new(gateway, store)
    }

    #[tokio::test]
    async fn test_both_channels_with_one_failure_reports_overall_failure() {
        let gateway = Arc::new(ScriptedGateway::new(true, false));
        let store = Arc::new(RecordingStore::new(false));
        let svc = service(gateway.clone(), store.clone());

        let outcome = svc
            .send_notification(&request(NotificationType::Both))
            .await
            .unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.results.len(), 2);
        assert!(outcome.results[0].success);
        assert!(!outcome.results[1].success);
        assert_eq!(
            gateway.calls(),
            vec!["sms:+91 9876543210", "whatsapp:+91 9876543210"]
        );

        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, DeliveryStatus::Failed);
        assert_eq!(records[0].notification_type, NotificationType::Both);
    }

    #[tokio::test]
    async fn test_sms_only_makes_a_single_call() {
        let gateway = Arc::new(ScriptedGateway::new(true, true));
        let store = Arc::new(RecordingStore::new(false));
        let svc = service(gateway.clone(), store.clone());

        let outcome = svc
            .send_notification(&request(NotificationType::Sms))
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(gateway.calls().len(), 1);
        assert_eq!(store.records()[0].status, DeliveryStatus::Sent);
    }

    #[tokio::test]
    async fn test_whatsapp_only_skips_sms() {
        let gateway = Arc::new(ScriptedGateway::new(true, true));
        let store = Arc::new(RecordingStore::new(false));
        let svc = service(gateway.clone(), store);

        let outcome = svc
            .send_notification(&request(NotificationType::Whatsapp))
            .await
            .unwrap();

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(gateway.calls(), vec!["whatsapp:+91 9876543210"]);
    }

    #[tokio::test]
    async fn test_missing_contact_is_a_caller_error_before_any_send() {
        let gateway = Arc::new(ScriptedGateway::new(true, true));
        let store = Arc::new(RecordingStore::new(false));
        let svc = service(gateway.clone(), store.clone());

        let mut req = request(NotificationType::Both);
        req.parent_whatsapp = None;

        let err = svc.send_notification(&req).await.unwrap_err();
        assert_eq!(err, DispatchError::MissingRecipient("parent_whatsapp"));
        assert!(gateway.calls().is_empty());
        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_does_not_change_dispatch_outcome() {
        let gateway = Arc::new(ScriptedGateway::new(true, true));
        let store = Arc::new(RecordingStore::new(true));
        let svc = service(gateway, store);

        let outcome = svc
            .send_notification(&request(NotificationType::Both))
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.results.len(), 2);
    }

    #[tokio::test]
    async fn test_bulk_isolates_per_item_failures() {
        let gateway = Arc::new(ScriptedGateway::new(true, true));
        let store = Arc::new(RecordingStore::new(false));
        let svc = service(gateway.clone(), store.clone());

        let items = vec![
            bulk_item("1", Some("+91 9876543210")),
            bulk_item("2", None),
            bulk_item("3", Some("+91 9876543212")),
        ];

        let outcomes = svc.send_bulk(&items).await;
        assert_eq!(outcomes.len(), 3);

        match &outcomes[0] {
            BulkItemOutcome::Dispatched { student_id, sms, whatsapp } => {
                assert_eq!(student_id, "1");
                assert!(sms.success);
                assert!(whatsapp.success);
            }
            other => panic!("expected dispatched outcome, got {other:?}"),
        }
        match &outcomes[1] {
            BulkItemOutcome::Failed { student_id, error } => {
                assert_eq!(student_id, "2");
                assert!(error.contains("parent_whatsapp"));
            }
            other => panic!("expected failed outcome, got {other:?}"),
        }
        assert!(matches!(&outcomes[2], BulkItemOutcome::Dispatched { student_id, .. } if student_id == "3"));

        // items 1 and 3 each hit both channels; item 2 never reached the gateway
        assert_eq!(gateway.calls().len(), 4);
        assert_eq!(store.records().len(), 2);
    }

    #[tokio::test]
    async fn test_bulk_always_attempts_both_channels() {
        let gateway = Arc::new(ScriptedGateway::new(false, true));
        let store = Arc::new(RecordingStore::new(false));
        let svc = service(gateway.clone(), store.clone());

        let outcomes = svc.send_bulk(&[bulk_item("1", Some("+91 9876543210"))]).await;

        assert_eq!(gateway.calls().len(), 2);
        match &outcomes[0] {
            BulkItemOutcome::Dispatched { sms, whatsapp, .. } => {
                assert!(!sms.success);
                assert!(whatsapp.success);
            }
            other => panic!("expected dispatched outcome, got {other:?}"),
        }
        assert_eq!(store.records()[0].status, DeliveryStatus::Failed);
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let gateway = Arc::new(ScriptedGateway::new(true, true));
        let store = Arc::new(RecordingStore::new(false));
        let svc = service(gateway.clone(), store);

        let mut req = request(NotificationType::Sms);
        req.message = "   ".to_string();

        assert_eq!(
            svc.send_notification(&req).await.unwrap_err(),
            DispatchError::EmptyMessage
        );
        assert!(gateway.calls().is_empty());
    }
}
