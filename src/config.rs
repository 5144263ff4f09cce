use std::env;
use std::num::NonZeroU32;

use nonzero_ext::nonzero;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub riot_api_key: String,
    /// Base URL of the upstream API, overridable so tests can point the
    /// client at a local mock server.
    pub riot_api_base: String,
    pub database_url: String,
    pub bind_addr: String,
    pub request_timeout_secs: u64,
    /// TTL of the upstream response cache. 0 disables caching.
    pub riot_cache_ttl_secs: u64,
    pub riot_rate_limit_per_second: NonZeroU32,
    pub ddragon_version: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        const DEFAULT_RIOT_API_BASE: &str = "https://na1.api.riotgames.com";
        const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
        const DEFAULT_RIOT_CACHE_TTL_SECS: u64 = 120;
        const DEFAULT_DDRAGON_VERSION: &str = "16.1.1";

        let riot_api_key = env::var("RIOT_API_KEY")
            .map_err(|_| AppError::Config("RIOT_API_KEY must be set".into()))?;

        let riot_api_base =
            env::var("RIOT_API_BASE").unwrap_or_else(|_| DEFAULT_RIOT_API_BASE.into());

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:riftcache.db".into());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let riot_cache_ttl_secs = env::var("RIOT_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RIOT_CACHE_TTL_SECS);

        let riot_rate_limit_per_second = env::var("RIOT_RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|v| v.parse().ok())
            .and_then(NonZeroU32::new)
            .unwrap_or(nonzero!(20u32));

        let ddragon_version =
            env::var("DDRAGON_VERSION").unwrap_or_else(|_| DEFAULT_DDRAGON_VERSION.into());

        Ok(Self {
            riot_api_key,
            riot_api_base,
            database_url,
            bind_addr,
            request_timeout_secs,
            riot_cache_ttl_secs,
            riot_rate_limit_per_second,
            ddragon_version,
        })
    }
}
