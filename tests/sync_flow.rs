//! End-to-end tests of the synchronization engine against a mock upstream
//! API and an in-memory SQLite store.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use httpmock::prelude::*;
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use riftcache::config::Config;
use riftcache::db::{self, MasteryStore, Repository, SummonerStore};
use riftcache::error::AppError;
use riftcache::riot::types::{ChampionMasteryDto, SummonerDto};
use riftcache::riot::RiotClient;
use riftcache::sync::{SyncService, STALE_WINDOW_MS};

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

fn test_config(base_url: String) -> Config {
    Config {
        riot_api_key: "TEST_KEY".into(),
        riot_api_base: base_url,
        database_url: "sqlite::memory:".into(),
        bind_addr: "127.0.0.1:0".into(),
        request_timeout_secs: 5,
        // Client-side response caching off so every upstream interaction is
        // observable on the mocks.
        riot_cache_ttl_secs: 0,
        riot_rate_limit_per_second: NonZeroU32::new(100).unwrap(),
        ddragon_version: "16.1.1".into(),
    }
}

async fn service_with(server: &MockServer) -> (SyncService<Repository>, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::run_migrations(&pool).await.unwrap();

    let config = test_config(server.base_url());
    let riot = Arc::new(RiotClient::new(&config).unwrap());
    let service = SyncService::new(Repository::new(pool.clone()), riot);
    (service, pool)
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn age_summoner(pool: &SqlitePool, id: i64, updated_at: i64) {
    sqlx::query("UPDATE summoners SET updated_at = ? WHERE id = ?")
        .bind(updated_at)
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
}

fn profile_body(revision_date: i64) -> serde_json::Value {
    json!({
        "id": 1,
        "accountId": 100,
        "name": "Faker",
        "profileIconId": 10,
        "summonerLevel": 300,
        "revisionDate": revision_date
    })
}

fn participant(
    slot: i64,
    champion_id: i64,
    kills: i64,
    deaths: i64,
    assists: i64,
    wards: i64,
    gold: i64,
    win: bool,
) -> serde_json::Value {
    json!({
        "participantId": slot,
        "championId": champion_id,
        "stats": {
            "kills": kills,
            "deaths": deaths,
            "assists": assists,
            "wardsPlaced": wards,
            "goldEarned": gold,
            "win": win
        },
        "timeline": {"role": "SOLO"}
    })
}

fn identity(slot: i64, summoner_id: i64, name: &str) -> serde_json::Value {
    json!({
        "participantId": slot,
        "player": {
            "summonerId": summoner_id,
            "accountId": summoner_id + 1000,
            "summonerName": name,
            "profileIcon": 1
        }
    })
}

struct UpstreamMocks<'a> {
    profile: httpmock::Mock<'a>,
    matchlist: httpmock::Mock<'a>,
    details: Vec<httpmock::Mock<'a>>,
    masteries: httpmock::Mock<'a>,
}

/// A summoner ("Faker", id 1) with two recent matches, both shared with the
/// previously-unseen summoner 999, and five mastery entries upstream.
async fn mock_upstream(server: &MockServer, revision_date: i64) -> UpstreamMocks<'_> {
    let profile = server
        .mock_async(|when, then| {
            when.method(GET).path("/lol/summoner/v4/summoners/by-name/faker");
            then.status(200).json_body(profile_body(revision_date));
        })
        .await;

    let matchlist = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/lol/match/v4/matchlists/by-account/100")
                .query_param("endIndex", "20");
            then.status(200).json_body(json!({
                "matches": [
                    {"gameId": 1002, "timestamp": 1_650_000_100_000i64, "season": 13, "queue": 420},
                    {"gameId": 1001, "timestamp": 1_650_000_000_000i64, "season": 13, "queue": 420}
                ]
            }));
        })
        .await;

    let detail_1001 = server
        .mock_async(|when, then| {
            when.method(GET).path("/lol/match/v4/matches/1001");
            then.status(200).json_body(json!({
                "gameId": 1001,
                "participants": [
                    participant(1, 10, 4, 2, 6, 10, 12_000, true),
                    participant(2, 20, 1, 1, 1, 2, 9_000, false)
                ],
                "participantIdentities": [
                    identity(1, 1, "Faker"),
                    identity(2, 999, "Shadow")
                ]
            }));
        })
        .await;

    let detail_1002 = server
        .mock_async(|when, then| {
            when.method(GET).path("/lol/match/v4/matches/1002");
            then.status(200).json_body(json!({
                "gameId": 1002,
                "participants": [
                    participant(1, 10, 2, 0, 3, 5, 8_000, false),
                    participant(2, 21, 3, 3, 3, 4, 10_000, true)
                ],
                "participantIdentities": [
                    identity(1, 1, "Faker"),
                    identity(2, 999, "Shadow")
                ]
            }));
        })
        .await;

    let masteries = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/lol/champion-mastery/v4/champion-masteries/by-summoner/1");
            then.status(200).json_body(json!([
                {"playerId": 1, "championId": 10, "championLevel": 7,
                 "championPoints": 50_000, "championPointsUntilNextLevel": 0},
                {"playerId": 1, "championId": 11, "championLevel": 6,
                 "championPoints": 40_000, "championPointsUntilNextLevel": 10_000},
                {"playerId": 1, "championId": 12, "championLevel": 5,
                 "championPoints": 30_000, "championPointsUntilNextLevel": 20_000},
                {"playerId": 1, "championId": 13, "championLevel": 5,
                 "championPoints": 20_000, "championPointsUntilNextLevel": 30_000},
                {"playerId": 1, "championId": 14, "championLevel": 4,
                 "championPoints": 10_000, "championPointsUntilNextLevel": 40_000}
            ]));
        })
        .await;

    UpstreamMocks {
        profile,
        matchlist,
        details: vec![detail_1001, detail_1002],
        masteries,
    }
}

#[tokio::test]
async fn first_resolution_runs_a_full_refresh() {
    let server = MockServer::start_async().await;
    let mocks = mock_upstream(&server, 1_600_000_000_000).await;
    let (service, pool) = service_with(&server).await;

    let enriched = service.resolve_summoner("Fa Ker").await.unwrap();

    assert_eq!(enriched.summoner.id, 1);
    assert_eq!(enriched.summoner.name, "Faker");
    assert_eq!(enriched.summoner.summoner_level, Some(300));

    // Top 4 of the five upstream entries, points descending.
    let champion_ids: Vec<i64> = enriched
        .masteries
        .iter()
        .map(|m| m.mastery.champion_id)
        .collect();
    assert_eq!(champion_ids, vec![10, 11, 12, 13]);

    // Only the requested summoner's participation rows come back.
    let game_ids: Vec<i64> = enriched.matches.iter().map(|m| m.game_id).collect();
    assert_eq!(game_ids, vec![1002, 1001]);

    // Statistics accumulated over both games on champion 10.
    let top = &enriched.masteries[0];
    assert_eq!(top.statistics.num_games, 2);
    assert_eq!(top.statistics.kills, 6);
    assert_eq!(top.statistics.deaths, 2);
    assert_eq!(top.statistics.assists, 9);
    assert_eq!(top.statistics.wins, 1);
    assert_eq!(top.statistics.wards_placed, 15);
    assert_eq!(top.statistics.gold_earned, 20_000);
    assert_eq!(top.statistics.kda, 10.0);

    assert_eq!(count(&pool, "matches").await, 2);
    assert_eq!(count(&pool, "summoner_matches").await, 4);
    assert_eq!(count(&pool, "champion_masteries").await, 4);
    // Faker plus exactly one stub for the shadow participant seen in both
    // matches of the batch.
    assert_eq!(count(&pool, "summoners").await, 2);

    assert_eq!(mocks.profile.hits_async().await, 1);
    assert_eq!(mocks.matchlist.hits_async().await, 1);
    for detail in &mocks.details {
        assert_eq!(detail.hits_async().await, 1);
    }
    assert_eq!(mocks.masteries.hits_async().await, 1);
}

#[tokio::test]
async fn fresh_cache_serves_without_touching_upstream() {
    let server = MockServer::start_async().await;
    let mocks = mock_upstream(&server, 1_600_000_000_000).await;
    let (service, _pool) = service_with(&server).await;

    service.resolve_summoner("faker").await.unwrap();
    // Different spelling, same normalized key, cache still fresh.
    let enriched = service.resolve_summoner(" FA KER ").await.unwrap();

    assert_eq!(enriched.summoner.id, 1);
    assert_eq!(enriched.masteries.len(), 4);
    assert_eq!(enriched.matches.len(), 2);
    assert_eq!(mocks.profile.hits_async().await, 1);
    assert_eq!(mocks.matchlist.hits_async().await, 1);
    assert_eq!(mocks.masteries.hits_async().await, 1);
}

#[tokio::test]
async fn stale_record_without_newer_revision_reads_from_store() {
    let server = MockServer::start_async().await;
    // Upstream revision stamp far in the past.
    let mocks = mock_upstream(&server, 1_600_000_000_000).await;
    let (service, pool) = service_with(&server).await;

    service.resolve_summoner("faker").await.unwrap();
    age_summoner(&pool, 1, now_ms() - STALE_WINDOW_MS - 60_000).await;

    let enriched = service.resolve_summoner("faker").await.unwrap();

    // Profile was re-fetched, but the revision stamp is older than the local
    // update so masteries and matches come from the store.
    assert_eq!(mocks.profile.hits_async().await, 2);
    assert_eq!(mocks.matchlist.hits_async().await, 1);
    assert_eq!(mocks.masteries.hits_async().await, 1);
    assert_eq!(enriched.masteries.len(), 4);
    assert_eq!(enriched.matches.len(), 2);
}

#[tokio::test]
async fn newer_revision_triggers_full_refresh_and_reingestion_is_idempotent() {
    let server = MockServer::start_async().await;
    // Upstream revision stamp ahead of any aged local update.
    let mocks = mock_upstream(&server, now_ms()).await;
    let (service, pool) = service_with(&server).await;

    service.resolve_summoner("faker").await.unwrap();
    age_summoner(&pool, 1, now_ms() - STALE_WINDOW_MS - 60_000).await;

    service.resolve_summoner("faker").await.unwrap();

    assert_eq!(mocks.profile.hits_async().await, 2);
    assert_eq!(mocks.matchlist.hits_async().await, 2);
    assert_eq!(mocks.masteries.hits_async().await, 2);
    // The unchanged match list produced no new detail fetches and no new
    // rows.
    for detail in &mocks.details {
        assert_eq!(detail.hits_async().await, 1);
    }
    assert_eq!(count(&pool, "matches").await, 2);
    assert_eq!(count(&pool, "summoner_matches").await, 4);
    assert_eq!(count(&pool, "summoners").await, 2);
}

#[tokio::test]
async fn match_sync_is_idempotent_when_called_directly() {
    let server = MockServer::start_async().await;
    let mocks = mock_upstream(&server, 1_600_000_000_000).await;
    let (service, pool) = service_with(&server).await;

    let profile = SummonerDto {
        id: 1,
        account_id: 100,
        name: "Faker".into(),
        profile_icon_id: 10,
        summoner_level: 300,
        revision_date: 1_600_000_000_000,
    };
    let summoner = service
        .store()
        .upsert_summoner(&profile, now_ms())
        .await
        .unwrap();

    let first = service.sync_recent_matches(&summoner).await.unwrap();
    let second = service.sync_recent_matches(&summoner).await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert_eq!(count(&pool, "matches").await, 2);
    assert_eq!(count(&pool, "summoner_matches").await, 4);
    for detail in &mocks.details {
        assert_eq!(detail.hits_async().await, 1);
    }
}

#[tokio::test]
async fn shared_shadow_participant_gets_a_single_stub() {
    let server = MockServer::start_async().await;
    mock_upstream(&server, 1_600_000_000_000).await;
    let (service, pool) = service_with(&server).await;

    service.resolve_summoner("faker").await.unwrap();

    let shadow_rows =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM summoners WHERE id = 999")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(shadow_rows, 1);

    let shadow_name = sqlx::query_scalar::<_, String>("SELECT name FROM summoners WHERE id = 999")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(shadow_name, "Shadow");

    // Stubs are discoverable but stale by construction.
    let updated_at =
        sqlx::query_scalar::<_, i64>("SELECT updated_at FROM summoners WHERE id = 999")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(updated_at, 0);
}

#[tokio::test]
async fn mastery_refresh_fully_replaces_previous_rows() {
    let server = MockServer::start_async().await;
    mock_upstream(&server, 1_600_000_000_000).await;
    let (service, pool) = service_with(&server).await;

    // Leftover mastery from an earlier snapshot that upstream no longer
    // reports.
    sqlx::query(
        r#"
        INSERT INTO champion_masteries
            (summoner_id, champion_id, champion_points,
             champion_points_until_next_level, champion_level)
        VALUES (1, 555, 99999, 0, 7)
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    service.resolve_summoner("faker").await.unwrap();

    let masteries = service.store().masteries_for_summoner(1).await.unwrap();
    assert_eq!(masteries.len(), 4);
    assert!(masteries.iter().all(|m| m.champion_id != 555));
    let points: Vec<i64> = masteries.iter().map(|m| m.champion_points).collect();
    assert_eq!(points, vec![50_000, 40_000, 30_000, 20_000]);
}

#[tokio::test]
async fn unknown_summoner_maps_to_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/lol/summoner/v4/summoners/by-name/ghost");
            then.status(404).body("summoner not found");
        })
        .await;
    let (service, _pool) = service_with(&server).await;

    let err = service.resolve_summoner("Ghost").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(m) if m == "Summoner not found"));
}

#[tokio::test]
async fn upstream_outage_maps_to_retrieval_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/lol/summoner/v4/summoners/by-name/faker");
            then.status(503).body("unavailable");
        })
        .await;
    let (service, _pool) = service_with(&server).await;

    let err = service.resolve_summoner("faker").await.unwrap_err();
    assert!(matches!(err, AppError::Retrieval(m) if m == "Error retrieving summoner"));
}

#[tokio::test]
async fn matchlist_failure_maps_to_no_recent_matches() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/lol/summoner/v4/summoners/by-name/faker");
            then.status(200).json_body(profile_body(1_600_000_000_000));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/lol/champion-mastery/v4/champion-masteries/by-summoner/1");
            then.status(200).json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/lol/match/v4/matchlists/by-account/100");
            then.status(500).body("boom");
        })
        .await;
    let (service, _pool) = service_with(&server).await;

    let err = service.resolve_summoner("faker").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(m) if m == "No recent matches for this summoner"));
}

#[tokio::test]
async fn mastery_failure_maps_to_no_masteries() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/lol/summoner/v4/summoners/by-name/faker");
            then.status(200).json_body(profile_body(1_600_000_000_000));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/lol/match/v4/matchlists/by-account/100");
            then.status(200).json_body(json!({"matches": []}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/lol/champion-mastery/v4/champion-masteries/by-summoner/1");
            then.status(500).body("boom");
        })
        .await;
    let (service, _pool) = service_with(&server).await;

    let err = service.resolve_summoner("faker").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(m) if m == "This summoner has no champion masteries"));
}

#[tokio::test]
async fn summoner_pages_order_by_level_then_top_mastery() {
    let server = MockServer::start_async().await;
    let (service, _pool) = service_with(&server).await;
    let store = service.store();

    for i in 1..=10i64 {
        let profile = SummonerDto {
            id: i,
            account_id: 1000 + i,
            name: format!("Player{i}"),
            profile_icon_id: 1,
            summoner_level: 100 + i,
            revision_date: 1_600_000_000_000,
        };
        store.upsert_summoner(&profile, now_ms()).await.unwrap();
    }

    // Two summoners sharing the highest level, separated by mastery points.
    for (id, points) in [(11i64, 100i64), (12i64, 500i64)] {
        let profile = SummonerDto {
            id,
            account_id: 1000 + id,
            name: format!("Player{id}"),
            profile_icon_id: 1,
            summoner_level: 400,
            revision_date: 1_600_000_000_000,
        };
        store.upsert_summoner(&profile, now_ms()).await.unwrap();
        store
            .replace_masteries(
                id,
                &[ChampionMasteryDto {
                    player_id: id,
                    champion_id: 10,
                    champion_level: 5,
                    champion_points: points,
                    champion_points_until_next_level: 0,
                }],
            )
            .await
            .unwrap();
    }

    let first_page = store.summoners_page(1, 10).await.unwrap();
    assert_eq!(first_page.len(), 10);
    assert_eq!(first_page[0].id, 12);
    assert_eq!(first_page[1].id, 11);
    // Then strictly descending by level.
    assert_eq!(first_page[2].id, 10);

    let second_page = store.summoners_page(2, 10).await.unwrap();
    assert_eq!(second_page.len(), 2);

    let third_page = store.summoners_page(3, 10).await.unwrap();
    assert!(third_page.is_empty());
}

#[tokio::test]
async fn page_beyond_the_data_yields_not_found() {
    use axum::extract::{Query, State};

    use riftcache::api::routes::summoners::{list_summoners, PageParams};
    use riftcache::api::{ApiError, AppState};
    use riftcache::riot::ddragon::ChampionCatalog;

    let server = MockServer::start_async().await;
    let (service, _pool) = service_with(&server).await;
    let store = service.store().clone();

    let state = AppState {
        sync: Arc::new(service),
        store,
        champions: Arc::new(ChampionCatalog::empty()),
    };

    let res = list_summoners(State(state), Query(PageParams { page: Some(1) })).await;
    assert!(matches!(
        res,
        Err(ApiError::NotFound(m)) if m == "No more summoners available."
    ));
}
