use crate::application::{DiscoveryService, DiscoverySettings, ExpirySweep, MembershipService};
use crate::infrastructure::{
    AppConfig, PostgresAccountRepository, PostgresListingRepository,
    PostgresSubscriptionLogRepository, RazorpayClient,
};
use anyhow::Context;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

pub type DiscoveryServiceType =
    DiscoveryService<PostgresAccountRepository, PostgresListingRepository>;

pub type MembershipServiceType = MembershipService<
    PostgresAccountRepository,
    PostgresListingRepository,
    PostgresSubscriptionLogRepository,
>;

pub type ExpirySweepType = ExpirySweep<PostgresAccountRepository, PostgresListingRepository>;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: AppConfig,
    pub account_repo: Arc<PostgresAccountRepository>,
    pub listing_repo: Arc<PostgresListingRepository>,
    pub discovery: Arc<DiscoveryServiceType>,
    pub membership: Arc<MembershipServiceType>,
    pub sweep: Arc<ExpirySweepType>,
}

/// Build full state from config + an existing pool.
///
/// Intended for embedding into a larger service that already manages a `PgPool`.
pub async fn build_state_with_pool(
    config: AppConfig,
    pool: PgPool,
    run_migrations: bool,
) -> anyhow::Result<AppState> {
    if run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("run migrations")?;
    }

    let razorpay = Arc::new(
        RazorpayClient::new(
            config.razorpay_key_id.clone(),
            config.razorpay_key_secret.clone(),
        )
        .context("init Razorpay client")?,
    );

    let account_repo = Arc::new(PostgresAccountRepository::new(pool.clone()));
    let listing_repo = Arc::new(PostgresListingRepository::new(pool.clone()));
    let subscription_repo = Arc::new(PostgresSubscriptionLogRepository::new(pool.clone()));

    let discovery = Arc::new(DiscoveryService::new(
        account_repo.clone(),
        listing_repo.clone(),
        DiscoverySettings {
            radius_ladder_km: config.radius_ladder_km.clone(),
            min_results: config.min_search_results,
            scan_cap: config.search_scan_cap,
            step_timeout: Duration::from_millis(config.search_step_timeout_ms),
        },
    ));

    let membership = Arc::new(MembershipService::new(
        account_repo.clone(),
        listing_repo.clone(),
        subscription_repo.clone(),
        razorpay,
        chrono::Duration::days(config.trial_days),
    ));

    let sweep = Arc::new(ExpirySweep::new(account_repo.clone(), listing_repo.clone()));

    Ok(AppState {
        pool,
        config,
        account_repo,
        listing_repo,
        discovery,
        membership,
        sweep,
    })
}

/// Build state for the standalone server.
///
/// Creates the `PgPool`, runs migrations, and wires repositories/services.
pub async fn build_state_from_env(config: AppConfig) -> anyhow::Result<AppState> {
    let pool = PgPool::connect(&config.database_url)
        .await
        .context("connect database")?;
    build_state_with_pool(config, pool, true).await
}
