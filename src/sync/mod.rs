//! Synchronization engine: staleness evaluation, upstream refresh and
//! read-side assembly of enriched summoner records.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::db::{ChampionMastery, StoreFull, Summoner, SummonerMatch};
use crate::error::AppError;
use crate::riot::RiotClient;

mod mastery;
mod matches;
pub mod stats;

pub use stats::{ChampionStats, MasteryWithStats};

/// Cached profiles older than this are refreshed from upstream.
pub const STALE_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

/// A summoner assembled for serving: profile, masteries with their derived
/// statistics, and the cached recent-match window, newest first.
#[derive(Debug)]
pub struct EnrichedSummoner {
    pub summoner: Summoner,
    pub masteries: Vec<MasteryWithStats>,
    pub matches: Vec<SummonerMatch>,
}

impl EnrichedSummoner {
    fn assemble(
        summoner: Summoner,
        masteries: Vec<ChampionMastery>,
        matches: Vec<SummonerMatch>,
    ) -> Self {
        let masteries = stats::annotate(masteries, &matches);
        Self {
            summoner,
            masteries,
            matches,
        }
    }
}

/// Canonical lookup key for a display name: spaces removed, trimmed,
/// lowercased. Idempotent.
pub fn normalize_name(name: &str) -> String {
    name.replace(' ', "").trim().to_lowercase()
}

pub(crate) fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as i64
}

/// A record is trusted only when it exists, carries a revision stamp and was
/// refreshed within the staleness window.
fn is_stale(summoner: &Summoner, now_ms: i64) -> bool {
    summoner.revision_date.is_none() || now_ms - summoner.updated_at > STALE_WINDOW_MS
}

/// One refresh in flight per normalized name; later callers for the same key
/// wait and then observe the refreshed cache.
#[derive(Debug, Default)]
struct RefreshGuard {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RefreshGuard {
    async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(key.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

/// Entry point of the engine. Generic over the storage port so the core
/// logic stays independent of the SQLite repository.
#[derive(Debug)]
pub struct SyncService<S> {
    pub(crate) store: S,
    pub(crate) riot: Arc<RiotClient>,
    refresh_guard: RefreshGuard,
}

impl<S: StoreFull> SyncService<S> {
    pub fn new(store: S, riot: Arc<RiotClient>) -> Self {
        Self {
            store,
            riot,
            refresh_guard: RefreshGuard::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve a summoner by display name, refreshing from upstream when the
    /// cached record is stale, and return it enriched with masteries,
    /// matches and per-champion statistics.
    pub async fn resolve_summoner(&self, name: &str) -> Result<EnrichedSummoner, AppError> {
        let normalized = normalize_name(name);
        let _in_flight = self.refresh_guard.acquire(&normalized).await;

        let cached = self.store.summoner_by_normalized_name(&normalized).await?;
        let now = now_ms();

        if let Some(summoner) = &cached {
            if !is_stale(summoner, now) {
                debug!(summoner_id = summoner.id, "cache hit, serving from store");
                let masteries = self.store.masteries_for_summoner(summoner.id).await?;
                let matches = self.store.matches_for_summoner(summoner.id).await?;
                return Ok(EnrichedSummoner::assemble(
                    summoner.clone(),
                    masteries,
                    matches,
                ));
            }
        }

        let profile = match self.riot.get_summoner_by_name(&normalized).await {
            Ok(profile) => profile,
            Err(e) if e.is_upstream_not_found() => {
                return Err(AppError::NotFound("Summoner not found".into()));
            }
            Err(e) => {
                warn!(error = ?e, name = %normalized, "🔄 ❌ profile fetch failed");
                return Err(AppError::Retrieval("Error retrieving summoner".into()));
            }
        };

        let summoner = self.store.upsert_summoner(&profile, now).await?;

        // The revision stamp is upstream's cheap change signal: skip the
        // expensive mastery/match refresh when nothing moved since the last
        // local update.
        let full_refresh = match &cached {
            None => true,
            Some(previous) => profile.revision_date > previous.updated_at,
        };

        let (masteries, matches) = if full_refresh {
            info!(summoner_id = summoner.id, "🔄 full refresh from upstream");
            tokio::try_join!(
                self.sync_top_masteries(&summoner),
                self.sync_recent_matches(&summoner)
            )
            .map_err(|e| match e {
                e @ (AppError::NotFound(_) | AppError::Database(_)) => e,
                other => {
                    warn!(error = ?other, summoner_id = summoner.id, "🔄 ❌ refresh failed");
                    AppError::Retrieval("Error retrieving summoner".into())
                }
            })?
        } else {
            debug!(summoner_id = summoner.id, "no newer revision, reading from store");
            (
                self.store.masteries_for_summoner(summoner.id).await?,
                self.store.matches_for_summoner(summoner.id).await?,
            )
        };

        Ok(EnrichedSummoner::assemble(summoner, masteries, matches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_spaces_and_case() {
        assert_eq!(normalize_name("Fa Ker"), "faker");
        assert_eq!(normalize_name("faker"), "faker");
        assert_eq!(normalize_name(" FAKER "), "faker");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_name("  Hide On Bush ");
        assert_eq!(normalize_name(&once), once);
    }

    fn summoner(revision_date: Option<i64>, updated_at: i64) -> Summoner {
        Summoner {
            id: 1,
            account_id: Some(2),
            name: "Faker".into(),
            profile_icon_id: Some(10),
            summoner_level: Some(300),
            revision_date,
            updated_at,
        }
    }

    #[test]
    fn stale_just_past_the_window() {
        let now = 1_700_000_000_000;
        let s = summoner(Some(1), now - STALE_WINDOW_MS - 1);
        assert!(is_stale(&s, now));
    }

    #[test]
    fn fresh_just_inside_the_window() {
        let now = 1_700_000_000_000;
        let one_minute_ms = 60 * 1000;
        let s = summoner(Some(1), now - STALE_WINDOW_MS + one_minute_ms);
        assert!(!is_stale(&s, now));
    }

    #[test]
    fn missing_revision_date_is_always_stale() {
        let now = 1_700_000_000_000;
        let s = summoner(None, now);
        assert!(is_stale(&s, now));
    }
}
