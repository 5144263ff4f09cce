//! Typed client for the upstream game-statistics API.
//!
//! [`RiotClient`] owns the HTTP client, rate limiter and response cache; the
//! endpoint wrappers live in [`endpoints`], one file per API family.

mod client;
mod endpoints;

pub mod ddragon;
pub mod types;

pub use client::RiotClient;
