use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{info, warn};
use url::Url;

use crate::{
    error::AppError,
    models::notification::{IngestionNotification, NotificationOutcome},
};

/// Reports finished ingestions to an external listener. Delivery is best effort:
/// implementations report failure through the outcome and never error.
#[async_trait]
pub trait IngestionNotifier: Send + Sync {
    async fn notify(&self, notification: &IngestionNotification) -> NotificationOutcome;
}

/// Posts the notification as JSON; only a 200 answer counts as delivered.
#[derive(Clone)]
pub struct HttpNotifier {
    client: Client,
    endpoint: Url,
}

impl HttpNotifier {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Other(err.into()))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl IngestionNotifier for HttpNotifier {
    async fn notify(&self, notification: &IngestionNotification) -> NotificationOutcome {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(notification)
            .send()
            .await;

        match response {
            Ok(response) if response.status() == StatusCode::OK => {
                info!(endpoint = %self.endpoint, "ingestion state notified");
                NotificationOutcome::Delivered
            }
            Ok(response) => {
                let status = response.status();
                warn!(endpoint = %self.endpoint, %status, "ingestion notification rejected");
                NotificationOutcome::Failed(format!("unexpected status {status}"))
            }
            Err(err) => {
                warn!(endpoint = %self.endpoint, error = %err, "ingestion notification failed");
                NotificationOutcome::Failed(err.to_string())
            }
        }
    }
}
