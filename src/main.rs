use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::prelude::*;

use ledger_reversal::adapters::postgres::{PostgresAuditStore, PostgresLedgerStore};
use ledger_reversal::adapters::redis_channel::RedisNotificationChannel;
use ledger_reversal::config::Config;
use ledger_reversal::ports::{AuditStore, LedgerStore, NotificationChannel};
use ledger_reversal::services::{AuditRecorder, ReversalService, VoidPreview};
use ledger_reversal::{AppState, create_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Setup logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database pool
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    // Run migrations
    let migrator = Migrator::new(Path::new("./migrations")).await?;
    migrator.run(&pool).await?;
    tracing::info!("Database migrations completed");

    // Stores and notification channel are injected here; nothing
    // downstream holds process-wide handles.
    let ledger: Arc<dyn LedgerStore> = Arc::new(PostgresLedgerStore::new(pool.clone()));
    let audit: Arc<dyn AuditStore> = Arc::new(PostgresAuditStore::new(pool.clone()));
    let channel: Arc<dyn NotificationChannel> = Arc::new(RedisNotificationChannel::new(
        &config.redis_url,
        config.notification_stream.clone(),
    )?);
    tracing::info!(
        "Notification channel initialized with stream prefix: {}",
        config.notification_stream
    );

    let state = AppState {
        reversals: Arc::new(ReversalService::new(
            ledger.clone(),
            AuditRecorder::new(audit),
            channel,
        )),
        void_preview: Arc::new(VoidPreview::new(ledger)),
    };
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
