pub mod importer;
pub mod notifier;
pub mod trip_store;
