use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::models::{ChampionMastery, MatchBatch, Summoner, SummonerMatch};
use super::store::{MasteryStore, MatchStore, StoreFull, SummonerStore};
use crate::error::AppError;
use crate::riot::types::{ChampionMasteryDto, SummonerDto};

const SUMMONER_COLUMN_NAMES: [&str; 7] = [
    "id",
    "account_id",
    "name",
    "profile_icon_id",
    "summoner_level",
    "revision_date",
    "updated_at",
];

fn summoner_columns(alias: Option<&str>) -> String {
    let prefix = alias.map(|a| format!("{a}.")).unwrap_or_default();
    SUMMONER_COLUMN_NAMES
        .iter()
        .map(|col| format!("{prefix}{col}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as i64
}

#[derive(Clone, Debug)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn ids_present(&self, table: &str, ids: &[i64]) -> Result<HashSet<i64>, AppError> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }

        let query = format!(
            "SELECT id FROM {table} WHERE id IN ({})",
            placeholders(ids.len())
        );
        let mut stmt = sqlx::query_scalar::<_, i64>(&query);
        for id in ids {
            stmt = stmt.bind(id);
        }
        let found = stmt.fetch_all(&self.pool).await?;
        Ok(found.into_iter().collect())
    }
}

#[async_trait]
impl SummonerStore for Repository {
    async fn summoner_by_normalized_name(
        &self,
        normalized: &str,
    ) -> Result<Option<Summoner>, AppError> {
        let columns = summoner_columns(None);
        let summoner = sqlx::query_as::<_, Summoner>(&format!(
            "SELECT {columns} FROM summoners WHERE REPLACE(LOWER(name), ' ', '') = ?"
        ))
        .bind(normalized)
        .fetch_optional(&self.pool)
        .await?;
        Ok(summoner)
    }

    async fn upsert_summoner(
        &self,
        profile: &SummonerDto,
        now_ms: i64,
    ) -> Result<Summoner, AppError> {
        let columns = summoner_columns(None);
        let query = format!(
            r#"
            INSERT INTO summoners
                (id, account_id, name, profile_icon_id, summoner_level, revision_date, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                account_id = excluded.account_id,
                name = excluded.name,
                profile_icon_id = excluded.profile_icon_id,
                summoner_level = excluded.summoner_level,
                revision_date = excluded.revision_date,
                updated_at = excluded.updated_at
            RETURNING {columns}
            "#
        );

        let summoner = sqlx::query_as::<_, Summoner>(&query)
            .bind(profile.id)
            .bind(profile.account_id)
            .bind(&profile.name)
            .bind(profile.profile_icon_id)
            .bind(profile.summoner_level)
            .bind(profile.revision_date)
            .bind(now_ms)
            .fetch_one(&self.pool)
            .await?;
        Ok(summoner)
    }

    async fn summoners_page(&self, page: u32, per_page: u32) -> Result<Vec<Summoner>, AppError> {
        let columns = summoner_columns(Some("s"));
        let offset = (page.saturating_sub(1)) * per_page;
        let summoners = sqlx::query_as::<_, Summoner>(&format!(
            r#"
            SELECT {columns}
            FROM summoners s
            WHERE s.summoner_level IS NOT NULL
            ORDER BY
                s.summoner_level DESC,
                (SELECT MAX(cm.champion_points)
                 FROM champion_masteries cm
                 WHERE cm.summoner_id = s.id) DESC
            LIMIT ? OFFSET ?
            "#
        ))
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(summoners)
    }
}

#[async_trait]
impl MatchStore for Repository {
    async fn known_match_ids(&self, ids: &[i64]) -> Result<HashSet<i64>, AppError> {
        self.ids_present("matches", ids).await
    }

    async fn known_summoner_ids(&self, ids: &[i64]) -> Result<HashSet<i64>, AppError> {
        self.ids_present("summoners", ids).await
    }

    async fn insert_match_batch(&self, batch: &MatchBatch) -> Result<(), AppError> {
        if batch.is_empty() {
            return Ok(());
        }

        // One stamp for the whole batch keeps newest-first ordering stable
        // across rows inserted together.
        let created_at = now_ms();

        let mut tx = self.pool.begin().await?;

        for m in &batch.matches {
            sqlx::query(
                "INSERT OR IGNORE INTO matches (id, timestamp, season, queue) VALUES (?, ?, ?, ?)",
            )
            .bind(m.id)
            .bind(m.timestamp)
            .bind(m.season)
            .bind(m.queue)
            .execute(&mut *tx)
            .await?;
        }

        for stub in &batch.stubs {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO summoners (id, account_id, name, profile_icon_id, updated_at)
                VALUES (?, ?, ?, ?, 0)
                "#,
            )
            .bind(stub.id)
            .bind(stub.account_id)
            .bind(&stub.name)
            .bind(stub.profile_icon_id)
            .execute(&mut *tx)
            .await?;
        }

        for p in &batch.participations {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO summoner_matches
                    (game_id, summoner_id, champion_id, kills, deaths, assists,
                     wards_placed, gold_earned, win, role, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(p.game_id)
            .bind(p.summoner_id)
            .bind(p.champion_id)
            .bind(p.kills)
            .bind(p.deaths)
            .bind(p.assists)
            .bind(p.wards_placed)
            .bind(p.gold_earned)
            .bind(p.win)
            .bind(&p.role)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn matches_for_summoner(
        &self,
        summoner_id: i64,
    ) -> Result<Vec<SummonerMatch>, AppError> {
        let matches = sqlx::query_as::<_, SummonerMatch>(
            r#"
            SELECT game_id, summoner_id, champion_id, kills, deaths, assists,
                   wards_placed, gold_earned, win, role, created_at
            FROM summoner_matches
            WHERE summoner_id = ?
            ORDER BY created_at DESC, game_id DESC
            "#,
        )
        .bind(summoner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(matches)
    }
}

#[async_trait]
impl MasteryStore for Repository {
    async fn replace_masteries(
        &self,
        summoner_id: i64,
        entries: &[ChampionMasteryDto],
    ) -> Result<Vec<ChampionMastery>, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM champion_masteries WHERE summoner_id = ?")
            .bind(summoner_id)
            .execute(&mut *tx)
            .await?;

        let mut inserted = Vec::with_capacity(entries.len());
        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO champion_masteries
                    (summoner_id, champion_id, champion_points,
                     champion_points_until_next_level, champion_level)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(summoner_id)
            .bind(entry.champion_id)
            .bind(entry.champion_points)
            .bind(entry.champion_points_until_next_level)
            .bind(entry.champion_level)
            .execute(&mut *tx)
            .await?;

            inserted.push(ChampionMastery {
                summoner_id,
                champion_id: entry.champion_id,
                champion_points: entry.champion_points,
                champion_points_until_next_level: entry.champion_points_until_next_level,
                champion_level: entry.champion_level,
            });
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn masteries_for_summoner(
        &self,
        summoner_id: i64,
    ) -> Result<Vec<ChampionMastery>, AppError> {
        let masteries = sqlx::query_as::<_, ChampionMastery>(
            r#"
            SELECT summoner_id, champion_id, champion_points,
                   champion_points_until_next_level, champion_level
            FROM champion_masteries
            WHERE summoner_id = ?
            ORDER BY champion_points DESC
            "#,
        )
        .bind(summoner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(masteries)
    }
}

impl StoreFull for Repository {}
