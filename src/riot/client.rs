use std::collections::HashMap;
use std::time::{Duration, Instant};

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::AppError;

/// Upstream API client: shared reqwest client, a direct rate limiter and a
/// small TTL cache over successful responses. Constructed once from the
/// configuration and injected wherever upstream access is needed.
#[derive(Debug)]
pub struct RiotClient {
    client: reqwest::Client,
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    /// Riot API Key
    key: String,
    base_url: String,
    cache: ResponseCache,
}

impl RiotClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let quota = Quota::per_second(config.riot_rate_limit_per_second);

        Ok(Self {
            client,
            limiter: RateLimiter::direct(quota),
            key: config.riot_api_key.clone(),
            base_url: config.riot_api_base.trim_end_matches('/').to_string(),
            cache: ResponseCache::new(Duration::from_secs(config.riot_cache_ttl_secs)),
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, path);

        if let Some(cached) = self.cache.lookup(&url).await {
            return Ok(serde_json::from_value(cached)?);
        }

        // Stay inside the upstream rate limits before doing any request
        self.limiter.until_ready().await;

        let res = self
            .client
            .get(&url)
            .header("X-Riot-Token", &self.key)
            .send()
            .await?;
        match res.status() {
            StatusCode::OK => {
                let body: serde_json::Value = res.json().await?;
                self.cache.store(&url, body.clone()).await;
                Ok(serde_json::from_value(body)?)
            }
            status => Err(AppError::RiotApi {
                status: status.as_u16(),
                message: res.text().await.unwrap_or_default(),
            }),
        }
    }
}

/// TTL cache over raw JSON responses, keyed by full request URL. A zero TTL
/// disables it entirely.
#[derive(Debug)]
struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, serde_json::Value)>>,
}

impl ResponseCache {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    async fn lookup(&self, url: &str) -> Option<serde_json::Value> {
        if self.ttl.is_zero() {
            return None;
        }
        let mut entries = self.entries.lock().await;
        match entries.get(url) {
            Some((stored_at, body)) if stored_at.elapsed() < self.ttl => Some(body.clone()),
            Some(_) => {
                entries.remove(url);
                None
            }
            None => None,
        }
    }

    async fn store(&self, url: &str, body: serde_json::Value) {
        if self.ttl.is_zero() {
            return;
        }
        self.entries
            .lock()
            .await
            .insert(url.to_string(), (Instant::now(), body));
    }
}
