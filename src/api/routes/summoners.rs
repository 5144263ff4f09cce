use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, AppState};
use crate::db::{ChampionMastery, MasteryStore, Summoner, SummonerStore};
use crate::riot::ddragon::ChampionCatalog;
use crate::sync::{ChampionStats, EnrichedSummoner};

const PAGE_SIZE: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerResponse {
    pub summoner_id: String,
    pub name: String,
    pub level: Option<i64>,
    pub profile_icon_id: Option<i64>,
    pub champion_masteries: Vec<MasteryResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryResponse {
    pub mastery: MasteryBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<ChampionStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub champion: Option<ChampionBody>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryBody {
    pub summoner_id: i64,
    pub champion_id: i64,
    pub champion_points: i64,
    pub champion_level: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionBody {
    pub name: String,
    pub key: String,
    pub id: i64,
}

fn mastery_response(
    mastery: &ChampionMastery,
    statistics: Option<ChampionStats>,
    champions: &ChampionCatalog,
) -> MasteryResponse {
    let champion = champions.by_key(mastery.champion_id).map(|c| ChampionBody {
        name: c.name.clone(),
        key: c.id.clone(),
        id: c.key,
    });
    MasteryResponse {
        mastery: MasteryBody {
            summoner_id: mastery.summoner_id,
            champion_id: mastery.champion_id,
            champion_points: mastery.champion_points,
            champion_level: mastery.champion_level,
        },
        statistics,
        champion,
    }
}

fn summoner_response(
    summoner: &Summoner,
    masteries: Vec<MasteryResponse>,
) -> SummonerResponse {
    SummonerResponse {
        summoner_id: summoner.id.to_string(),
        name: summoner.name.clone(),
        level: summoner.summoner_level,
        profile_icon_id: summoner.profile_icon_id,
        champion_masteries: masteries,
    }
}

fn enriched_response(enriched: &EnrichedSummoner, champions: &ChampionCatalog) -> SummonerResponse {
    let masteries = enriched
        .masteries
        .iter()
        .map(|m| mastery_response(&m.mastery, Some(m.statistics.clone()), champions))
        .collect();
    summoner_response(&enriched.summoner, masteries)
}

/// `GET /summoners?page=N`: page through cached summoners with a known
/// level, most advanced first.
pub async fn list_summoners(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<SummonerResponse>>, ApiError> {
    let page = params.page.unwrap_or(1).max(1);

    let summoners = state.store.summoners_page(page, PAGE_SIZE).await?;
    if summoners.is_empty() {
        return Err(ApiError::NotFound("No more summoners available.".into()));
    }

    let mut body = Vec::with_capacity(summoners.len());
    for summoner in &summoners {
        let masteries = state
            .store
            .masteries_for_summoner(summoner.id)
            .await?
            .iter()
            .map(|m| mastery_response(m, None, &state.champions))
            .collect();
        body.push(summoner_response(summoner, masteries));
    }

    Ok(Json(body))
}

/// `GET /summoners/:name`: resolve one summoner through the sync engine and
/// return it enriched with masteries and statistics.
pub async fn get_summoner(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SummonerResponse>, ApiError> {
    let enriched = state.sync.resolve_summoner(&name).await?;
    Ok(Json(enriched_response(&enriched, &state.champions)))
}
