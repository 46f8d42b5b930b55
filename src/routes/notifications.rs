use axum::{body::Bytes, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::{models::notification::IngestionNotification, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/notifications", post(receive_notification))
}

async fn receive_notification(body: Bytes) -> (StatusCode, Json<Value>) {
    match serde_json::from_slice::<IngestionNotification>(&body) {
        Ok(notification) => {
            info!(
                region = ?notification.region,
                datasource = ?notification.datasource,
                status = ?notification.status,
                "received ingestion notification"
            );
            (
                StatusCode::OK,
                Json(json!({ "message": "Notification received successfully" })),
            )
        }
        Err(err) => {
            warn!(error = %err, "could not handle notification");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Error handling notification" })),
            )
        }
    }
}
