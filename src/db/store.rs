//! Storage port consumed by the sync engine.
//!
//! The traits describe the typed operations the engine needs from a store,
//! keeping the core logic independent of the SQLite implementation in
//! [`super::Repository`].

use std::collections::HashSet;

use async_trait::async_trait;

use crate::db::models::{ChampionMastery, MatchBatch, Summoner, SummonerMatch};
use crate::error::AppError;
use crate::riot::types::{ChampionMasteryDto, SummonerDto};

#[async_trait]
pub trait SummonerStore {
    /// Look a summoner up by its normalized name. The store applies the same
    /// transform (strip spaces, lowercase) to stored names at query time, so
    /// names differing only in case or spacing resolve to the same row.
    async fn summoner_by_normalized_name(
        &self,
        normalized: &str,
    ) -> Result<Option<Summoner>, AppError>;

    /// Insert or update the profile row keyed by upstream id, stamping
    /// `updated_at` with `now_ms`. Returns the stored row.
    async fn upsert_summoner(
        &self,
        profile: &SummonerDto,
        now_ms: i64,
    ) -> Result<Summoner, AppError>;

    /// Page of summoners with a non-null level, ordered by level descending
    /// then by their top mastery points descending. Pages are 1-indexed.
    async fn summoners_page(&self, page: u32, per_page: u32) -> Result<Vec<Summoner>, AppError>;
}

#[async_trait]
pub trait MatchStore {
    /// Which of the given match ids already exist in the store.
    async fn known_match_ids(&self, ids: &[i64]) -> Result<HashSet<i64>, AppError>;

    /// Which of the given summoner ids already exist in the store.
    async fn known_summoner_ids(&self, ids: &[i64]) -> Result<HashSet<i64>, AppError>;

    /// Apply one synchronization batch atomically: match metadata first, then
    /// summoner stubs, then participation rows.
    async fn insert_match_batch(&self, batch: &MatchBatch) -> Result<(), AppError>;

    /// All participation rows for a summoner, newest first.
    async fn matches_for_summoner(&self, summoner_id: i64)
        -> Result<Vec<SummonerMatch>, AppError>;
}

#[async_trait]
pub trait MasteryStore {
    /// Replace all mastery rows of a summoner with the given entries, as one
    /// atomic unit. Returns the rows now stored.
    async fn replace_masteries(
        &self,
        summoner_id: i64,
        entries: &[ChampionMasteryDto],
    ) -> Result<Vec<ChampionMastery>, AppError>;

    /// Mastery rows for a summoner, ordered by points descending.
    async fn masteries_for_summoner(
        &self,
        summoner_id: i64,
    ) -> Result<Vec<ChampionMastery>, AppError>;
}

/// Super-trait bundling everything the sync engine requires from a store.
pub trait StoreFull: SummonerStore + MatchStore + MasteryStore + Send + Sync {}
