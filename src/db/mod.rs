//! SQLite-backed storage layer.
//!
//! [`Repository`] implements the storage-port traits of [`store`] on top of
//! a sqlx connection pool; the schema lives in [`migrations`].

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::AppError;

mod migrations;
mod models;
mod repository;
mod store;

pub use migrations::run_migrations;
pub use models::{
    ChampionMastery, Match, MatchBatch, NewSummonerMatch, Summoner, SummonerMatch, SummonerStub,
};
pub use repository::Repository;
pub use store::{MasteryStore, MatchStore, StoreFull, SummonerStore};

/// Open (creating if missing) the database behind `database_url`.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    Ok(pool)
}
