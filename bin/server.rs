// Expense Tracker - Web Server
// REST API with Axum

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use expense_tracker::{api, Config, ExpenseStore, ExpenseTracker};

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    expense_tracker::init_tracing();

    let config = Config::from_env()?;

    let store = ExpenseStore::open(&config.db_path)
        .with_context(|| format!("Failed to open database {:?}", config.db_path))?;
    info!("Database opened: {:?}", config.db_path);
    info!("Categories: {}", config.categories.labels().join(", "));

    let tracker = Arc::new(ExpenseTracker::new(config.categories, store));
    let app = api::router(tracker);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!("Server running on http://{}", config.bind_addr);
    info!("API: http://{}/api/expenses", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
    }
}
