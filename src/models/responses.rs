use serde::{Deserialize, Serialize};

/// Response for an accepted inbound event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventAccepted {
    pub accepted: bool,
    pub partition: usize,
    #[serde(rename = "eventId")]
    pub event_id: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
