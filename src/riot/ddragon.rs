//! Static champion catalog from the Data Dragon CDN.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::info;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Champion {
    /// Numeric champion key, the id used by mastery and match data.
    pub key: i64,
    /// Short identifier slug, e.g. "Aatrox".
    pub id: String,
    pub name: String,
}

/// Champion metadata indexed by numeric key, loaded once at startup.
#[derive(Debug, Default)]
pub struct ChampionCatalog {
    by_key: HashMap<i64, Champion>,
}

#[derive(Debug, Deserialize)]
struct ChampionIndexDto {
    data: HashMap<String, ChampionDto>,
}

#[derive(Debug, Deserialize)]
struct ChampionDto {
    id: String,
    key: String,
    name: String,
}

impl ChampionCatalog {
    pub async fn fetch(version: &str) -> Result<Self, AppError> {
        let url = format!(
            "https://ddragon.leagueoflegends.com/cdn/{version}/data/en_US/champion.json"
        );
        let index: ChampionIndexDto = reqwest::Client::new()
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let catalog = Self::from_index(index);
        info!(
            champions = catalog.by_key.len(),
            "🛰️ champion catalog loaded (ddragon v{version})"
        );
        Ok(catalog)
    }

    fn from_index(index: ChampionIndexDto) -> Self {
        let by_key = index
            .data
            .into_values()
            .filter_map(|c| {
                let key = c.key.parse::<i64>().ok()?;
                Some((
                    key,
                    Champion {
                        key,
                        id: c.id,
                        name: c.name,
                    },
                ))
            })
            .collect();
        Self { by_key }
    }

    pub fn by_key(&self, key: i64) -> Option<&Champion> {
        self.by_key.get(&key)
    }

    /// Catalog with no entries, used when the CDN fetch fails at startup.
    pub fn empty() -> Self {
        Self::default()
    }
}
