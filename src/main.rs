use std::sync::{Arc, Mutex};

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use fixly::config::AppConfig;
use fixly::db;
use fixly::services::notify::store::StoreSink;
use fixly::services::notify::webhook::WebhookSink;
use fixly::services::notify::{NotificationSink, Notifier};
use fixly::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let db = Arc::new(Mutex::new(conn));

    let mut sinks: Vec<Box<dyn NotificationSink>> =
        vec![Box::new(StoreSink::new(Arc::clone(&db)))];
    if !config.notify_webhook_url.is_empty() {
        tracing::info!(url = %config.notify_webhook_url, "forwarding notifications to webhook");
        sinks.push(Box::new(WebhookSink::new(
            config.notify_webhook_url.clone(),
            config.notify_webhook_secret.clone(),
        )));
    }

    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        notifier: Notifier::new(sinks),
    });

    let app = fixly::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
