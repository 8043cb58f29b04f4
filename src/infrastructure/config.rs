use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,

    /// One-time trial length granted at business-role adoption.
    pub trial_days: i64,

    // Discovery tuning
    pub radius_ladder_km: Vec<f64>,
    pub min_search_results: usize,
    pub search_scan_cap: i64,
    pub search_step_timeout_ms: u64,

    /// 6-field cron expression for the expiry sweep (seconds first).
    pub sweep_cron: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("MART"))
            .set_default("server_host", "0.0.0.0")?
            .set_default("server_port", 8080)?
            .set_default("trial_days", 90)?
            .set_default("radius_ladder_km", vec![2.0, 5.0, 10.0, 20.0, 50.0])?
            .set_default("min_search_results", 20)?
            .set_default("search_scan_cap", 100)?
            .set_default("search_step_timeout_ms", 2000)?
            .set_default("sweep_cron", "0 0 0 * * *")?
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.radius_ladder_km.is_empty() {
            return Err(ConfigError::Message(
                "radius_ladder_km must not be empty".to_string(),
            ));
        }
        // The ladder is walked in order; a shrinking step would re-query a
        // subset and can never add results.
        if self.radius_ladder_km.windows(2).any(|w| w[1] < w[0]) {
            return Err(ConfigError::Message(
                "radius_ladder_km must be non-decreasing".to_string(),
            ));
        }
        if self.radius_ladder_km.iter().any(|r| *r <= 0.0) {
            return Err(ConfigError::Message(
                "radius_ladder_km entries must be positive".to_string(),
            ));
        }
        if self.trial_days <= 0 {
            return Err(ConfigError::Message(
                "trial_days must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
