use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub providers: ProvidersConfig,
    pub redis: RedisConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProvidersConfig {
    pub flight_base_url: String,
    pub hotel_base_url: String,
    pub api_key: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Fixed per session kind; never extended by activity.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,
    /// Probability that a synthetic revalidation simulates a price change.
    #[serde(default = "default_price_change_probability")]
    pub price_change_probability: f64,
}

fn default_session_ttl() -> u64 {
    1800
}

fn default_price_change_probability() -> f64 {
    0.25
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `WAYFARE__REDIS__URL=redis://...`
            .add_source(config::Environment::with_prefix("WAYFARE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
