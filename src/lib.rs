pub mod config;
pub mod db;
pub mod error;
pub mod geometry;
pub mod ingest;
pub mod models;
pub mod reporting;
pub mod routes;
pub mod services;
pub mod state;
