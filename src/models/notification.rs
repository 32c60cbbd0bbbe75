use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Channel selector for a single notification request. Unknown values are
/// rejected at deserialization, so handlers never see an unrecognized type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Sms,
    Whatsapp,
    Both,
}

impl NotificationType {
    pub fn wants_sms(self) -> bool {
        matches!(self, NotificationType::Sms | NotificationType::Both)
    }

    pub fn wants_whatsapp(self) -> bool {
        matches!(self, NotificationType::Whatsapp | NotificationType::Both)
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::Sms => write!(f, "sms"),
            NotificationType::Whatsapp => write!(f, "whatsapp"),
            NotificationType::Both => write!(f, "both"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NotificationRequest {
    #[validate(length(min = 1, message = "student_id is required"))]
    pub student_id: String,
    #[serde(default)]
    pub parent_contact: Option<String>,
    #[serde(default)]
    pub parent_whatsapp: Option<String>,
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub message: String,
    pub notification_type: NotificationType,
}

/// Per-channel outcome as reported back to the caller and folded into the
/// audit record. `status_code` is null when the transport itself failed and
/// the provider never produced a status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationResult {
    pub success: bool,
    pub status_code: Option<u16>,
    pub response: Value,
}

#[derive(Debug, Serialize)]
pub struct DispatchOutcome {
    pub success: bool,
    pub message: String,
    pub results: Vec<NotificationResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

/// Durable audit row, one per notification attempt. Never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub student_id: String,
    pub parent_contact: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub status: DeliveryStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct BulkNotificationRequest {
    pub students: Vec<BulkNotificationItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkNotificationItem {
    pub student_id: String,
    #[serde(default)]
    pub parent_contact: Option<String>,
    #[serde(default)]
    pub parent_whatsapp: Option<String>,
    pub message: String,
}

/// Outcome of one bulk item. Serializes untagged so the response carries
/// either `{student_id, sms, whatsapp}` or `{student_id, error}`.
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum BulkItemOutcome {
    Dispatched {
        student_id: String,
        sms: NotificationResult,
        whatsapp: NotificationResult,
    },
    Failed {
        student_id: String,
        error: String,
    },
}

#[derive(Debug, Serialize)]
pub struct BulkDispatchResponse {
    pub success: bool,
    pub results: Vec<BulkItemOutcome>,
}
