//! Caching synchronization layer between a rate-limited game-statistics API
//! and a local summoner store.
//!
//! Reads are served from SQLite; upstream is consulted only when a cached
//! profile is stale. The [`sync`] module holds the engine, [`db`] the store,
//! [`riot`] the upstream client and [`api`] the HTTP boundary.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod riot;
pub mod sync;
