use anyhow::{Context, Result};
use oss_core::{load_env_config, StoreConfig, StoreSettings};

/// Environment prefix for store settings, e.g. `OSS365__STORE__PATH`.
pub const ENV_PREFIX: &str = "OSS365__";

/// Load `.env`, then the prefixed environment, into typed settings.
pub fn load_settings() -> Result<StoreSettings> {
    dotenvy::dotenv().ok();

    let mut config = StoreConfig::new();
    load_env_config(&mut config, ENV_PREFIX);

    StoreSettings::from_snapshot(&config.snapshot()).context("invalid store configuration")
}

/// Tenants to sign in as, from the command line or `DEMO_TENANTS`.
pub fn tenants() -> Vec<String> {
    let from_args: Vec<String> = std::env::args().skip(1).collect();
    if !from_args.is_empty() {
        return from_args;
    }
    std::env::var("DEMO_TENANTS")
        .unwrap_or_else(|_| "academy-1,academy-2".to_string())
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
