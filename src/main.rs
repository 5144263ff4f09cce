use std::sync::Arc;

use tracing::{info, warn};

use riftcache::api::{self, AppState};
use riftcache::config::Config;
use riftcache::db::{self, Repository};
use riftcache::error::AppError;
use riftcache::logging;
use riftcache::riot::ddragon::ChampionCatalog;
use riftcache::riot::RiotClient;
use riftcache::sync::SyncService;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    logging::init();
    let config = Config::from_env()?;

    let pool = db::connect(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    let store = Repository::new(pool);

    let riot = Arc::new(RiotClient::new(&config)?);

    let champions = match ChampionCatalog::fetch(&config.ddragon_version).await {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!(error = ?e, "champion catalog unavailable, serving without metadata");
            ChampionCatalog::empty()
        }
    };

    let state = AppState {
        sync: Arc::new(SyncService::new(store.clone(), riot)),
        store,
        champions: Arc::new(champions),
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("🛰️ listening on {}", config.bind_addr);
    axum::serve(listener, api::router(state)).await?;

    Ok(())
}
