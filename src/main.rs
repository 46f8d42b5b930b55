use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use trip_ledger::config::AppConfig;
use trip_ledger::db::{init_pool, run_migrations};
use trip_ledger::error::AppError;
use trip_ledger::routes::create_router;
use trip_ledger::services::notifier::HttpNotifier;
use trip_ledger::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let db = init_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    let notifier = HttpNotifier::new(
        config.notification_url.clone(),
        config.notification_timeout,
    )?;
    info!(endpoint = %notifier.endpoint(), "ingestion notifications enabled");

    let state = AppState::new(config.clone(), db, Arc::new(notifier));
    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,trip_ledger=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
