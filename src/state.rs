use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::DbPool,
    services::{notifier::IngestionNotifier, trip_store::TripStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub trips: TripStore,
    pub notifier: Arc<dyn IngestionNotifier>,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool, notifier: Arc<dyn IngestionNotifier>) -> Self {
        Self {
            config,
            trips: TripStore::new(db),
            notifier,
        }
    }
}
