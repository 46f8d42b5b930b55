use serde::{Deserialize, Serialize};

pub const INGESTION_COMPLETED: &str = "Ingestion Completed";

/// Body of the ingestion webhook, sent and received in the same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestionNotification {
    pub region: Option<String>,
    pub datasource: Option<String>,
    pub status: Option<String>,
}

impl IngestionNotification {
    pub fn completed(region: &str, datasource: &str) -> Self {
        Self {
            region: Some(region.to_string()),
            datasource: Some(datasource.to_string()),
            status: Some(INGESTION_COMPLETED.to_string()),
        }
    }
}

/// Result of one outbound delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Delivered,
    Failed(String),
}
