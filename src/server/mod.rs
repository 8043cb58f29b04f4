//! HTTP server support (standalone + embeddable).
//!
//! - **Standalone**: `localmart-server` binary calls `run()`
//! - **Embedded**: host Axum app calls `router(state)` (and may nest it)
//!
//! `run()` also starts the daily expiry sweep alongside the listener.

mod http;
mod http_errors;
mod state;

pub use http::router;
pub use state::{build_state_from_env, build_state_with_pool, AppState};

use crate::infrastructure::AppConfig;
use anyhow::Context;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::info;

/// Standalone entrypoint for the `localmart-server` binary.
pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("load config")?;
    let state = build_state_from_env(config.clone()).await?;

    start_sweep_scheduler(&state, &config.sweep_cron).await?;

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port)
        .parse()
        .context("parse listen address")?;
    let listener = TcpListener::bind(addr).await.context("bind listener")?;

    info!(
        host = %config.server_host,
        port = config.server_port,
        "Server running"
    );
    info!(
        docs = %format!("http://{}:{}/docs", config.server_host, config.server_port),
        "API docs"
    );

    let app = router(state);
    axum::serve(listener, app).await.context("serve")?;
    Ok(())
}

/// Schedules the expiry sweep. The sweep itself never errors; per-kind
/// failures are logged inside `run_once` and retried naturally on the next
/// tick, so the scheduler always completes and reschedules.
async fn start_sweep_scheduler(state: &AppState, cron: &str) -> anyhow::Result<()> {
    let scheduler = JobScheduler::new().await.context("init job scheduler")?;

    let sweep = state.sweep.clone();
    let job = Job::new_async(cron, move |_id, _lock| {
        let sweep = sweep.clone();
        Box::pin(async move {
            let report = sweep.run_once().await;
            info!(
                lapsed_accounts = report.lapsed_accounts,
                hidden = report.total_hidden(),
                "Expiry sweep completed"
            );
        })
    })
    .context("build sweep job")?;

    scheduler.add(job).await.context("add sweep job")?;
    scheduler.start().await.context("start scheduler")?;

    info!(%cron, "Expiry sweep scheduled");
    Ok(())
}
