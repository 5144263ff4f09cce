use sqlx::SqlitePool;
use tracing::info;

use crate::error::AppError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS summoners (
    id INTEGER PRIMARY KEY,
    account_id INTEGER,
    name TEXT NOT NULL,
    profile_icon_id INTEGER,
    summoner_level INTEGER,
    revision_date INTEGER,
    updated_at INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS matches (
    id INTEGER PRIMARY KEY,
    timestamp INTEGER NOT NULL,
    season INTEGER NOT NULL,
    queue INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS summoner_matches (
    game_id INTEGER NOT NULL,
    summoner_id INTEGER NOT NULL,
    champion_id INTEGER NOT NULL,
    kills INTEGER NOT NULL,
    deaths INTEGER NOT NULL,
    assists INTEGER NOT NULL,
    wards_placed INTEGER NOT NULL,
    gold_earned INTEGER NOT NULL,
    win INTEGER NOT NULL,
    role TEXT,
    created_at INTEGER NOT NULL DEFAULT (unixepoch()),
    PRIMARY KEY (game_id, summoner_id),
    FOREIGN KEY (game_id) REFERENCES matches(id),
    FOREIGN KEY (summoner_id) REFERENCES summoners(id)
);

CREATE TABLE IF NOT EXISTS champion_masteries (
    summoner_id INTEGER NOT NULL,
    champion_id INTEGER NOT NULL,
    champion_points INTEGER NOT NULL,
    champion_points_until_next_level INTEGER NOT NULL,
    champion_level INTEGER NOT NULL,
    PRIMARY KEY (summoner_id, champion_id),
    FOREIGN KEY (summoner_id) REFERENCES summoners(id)
);

CREATE INDEX IF NOT EXISTS idx_summoners_normalized_name
    ON summoners(REPLACE(LOWER(name), ' ', ''));
CREATE INDEX IF NOT EXISTS idx_summoner_matches_summoner ON summoner_matches(summoner_id);
CREATE INDEX IF NOT EXISTS idx_champion_masteries_summoner ON champion_masteries(summoner_id);
"#;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    info!("🗄️ Database migrations completed");
    Ok(())
}
