//! Top-N champion-mastery snapshot refresh.

use tracing::{info, warn};

use crate::db::{ChampionMastery, StoreFull, Summoner};
use crate::error::AppError;
use crate::sync::SyncService;

/// How many mastery rows are retained per summoner.
pub const TOP_MASTERY_COUNT: usize = 4;

impl<S: StoreFull> SyncService<S> {
    /// Replace the summoner's stored masteries with the current top entries
    /// from upstream. Full replace: entries that fell out of the top are
    /// gone after a successful run.
    pub async fn sync_top_masteries(
        &self,
        summoner: &Summoner,
    ) -> Result<Vec<ChampionMastery>, AppError> {
        let entries = match self.riot.get_champion_masteries(summoner.id).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = ?e, summoner_id = summoner.id, "🔄 ❌ mastery fetch failed");
                return Err(AppError::NotFound(
                    "This summoner has no champion masteries".into(),
                ));
            }
        };

        let top = &entries[..entries.len().min(TOP_MASTERY_COUNT)];
        let inserted = self.store.replace_masteries(summoner.id, top).await?;
        info!(
            summoner_id = summoner.id,
            masteries = inserted.len(),
            "🔄 masteries replaced"
        );
        Ok(inserted)
    }
}
