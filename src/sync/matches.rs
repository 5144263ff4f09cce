//! Incremental ingestion of a summoner's recent match history.

use std::collections::{HashMap, HashSet};

use futures::future::try_join_all;
use tracing::{debug, info, warn};

use crate::db::{
    Match, MatchBatch, NewSummonerMatch, StoreFull, Summoner, SummonerMatch, SummonerStub,
};
use crate::error::AppError;
use crate::riot::types::{MatchDto, MatchReferenceDto, PlayerDto};
use crate::sync::SyncService;

/// Size of the recent-match window fetched from upstream.
pub const RECENT_MATCH_COUNT: u32 = 20;

impl<S: StoreFull> SyncService<S> {
    /// Ingest the summoner's recent matches that the store has not seen yet,
    /// then return its full cached participation history, newest first.
    /// Re-running against an unchanged upstream list writes nothing.
    pub async fn sync_recent_matches(
        &self,
        summoner: &Summoner,
    ) -> Result<Vec<SummonerMatch>, AppError> {
        let account_id = summoner.account_id.ok_or_else(|| {
            AppError::NotFound("No recent matches for this summoner".into())
        })?;

        let recents = match self
            .riot
            .get_recent_matches(account_id, RECENT_MATCH_COUNT)
            .await
        {
            Ok(list) => list,
            Err(e) => {
                warn!(error = ?e, summoner_id = summoner.id, "🔄 ❌ matchlist fetch failed");
                return Err(AppError::NotFound(
                    "No recent matches for this summoner".into(),
                ));
            }
        };

        let fetched_ids: Vec<i64> = recents.matches.iter().map(|m| m.game_id).collect();
        let known = self.store.known_match_ids(&fetched_ids).await?;
        let new_refs: Vec<_> = recents
            .matches
            .iter()
            .filter(|m| !known.contains(&m.game_id))
            .collect();

        if !new_refs.is_empty() {
            info!(
                summoner_id = summoner.id,
                new_matches = new_refs.len(),
                "🔄 ingesting new matches"
            );

            // Details are fetched before the batch transaction opens so no
            // database lock spans an upstream call. Any failed fetch fails
            // the whole run; nothing is written and the ids stay new for the
            // next attempt.
            let details =
                try_join_all(new_refs.iter().map(|r| self.riot.get_match(r.game_id))).await?;

            let batch = self.build_batch(&new_refs, &details).await?;
            self.store.insert_match_batch(&batch).await?;
        }

        self.store.matches_for_summoner(summoner.id).await
    }

    async fn build_batch(
        &self,
        new_refs: &[&MatchReferenceDto],
        details: &[MatchDto],
    ) -> Result<MatchBatch, AppError> {
        let matches = new_refs
            .iter()
            .map(|r| Match {
                id: r.game_id,
                timestamp: r.timestamp,
                season: r.season,
                queue: r.queue,
            })
            .collect();

        let mut stub_candidates: Vec<SummonerStub> = Vec::new();
        let mut participations: Vec<NewSummonerMatch> = Vec::new();

        for detail in details {
            // Participant identities are keyed by in-match slot; stats and
            // identity arrive as separate arrays.
            let identities: HashMap<i64, &PlayerDto> = detail
                .participant_identities
                .iter()
                .map(|pi| (pi.participant_id, &pi.player))
                .collect();

            for participant in &detail.participants {
                let Some(player) = identities.get(&participant.participant_id) else {
                    debug!(
                        game_id = detail.game_id,
                        slot = participant.participant_id,
                        "participant without identity, skipping"
                    );
                    continue;
                };
                // Bots carry no summoner id; they get neither a stub nor a
                // participation row.
                let Some(summoner_id) = player.summoner_id else {
                    continue;
                };

                stub_candidates.push(SummonerStub {
                    id: summoner_id,
                    account_id: player.account_id,
                    name: player.summoner_name.clone(),
                    profile_icon_id: player.profile_icon,
                });
                participations.push(NewSummonerMatch {
                    game_id: detail.game_id,
                    summoner_id,
                    champion_id: participant.champion_id,
                    kills: participant.stats.kills,
                    deaths: participant.stats.deaths,
                    assists: participant.stats.assists,
                    wards_placed: participant.stats.wards_placed,
                    gold_earned: participant.stats.gold_earned,
                    win: participant.stats.win,
                    role: participant.timeline.role.clone(),
                });
            }
        }

        let candidate_ids: Vec<i64> = stub_candidates.iter().map(|s| s.id).collect();
        let known_summoners = self.store.known_summoner_ids(&candidate_ids).await?;

        // The same summoner can show up in several new matches of one batch;
        // key the dedup on its id.
        let mut seen: HashSet<i64> = HashSet::new();
        let stubs = stub_candidates
            .into_iter()
            .filter(|s| !known_summoners.contains(&s.id) && seen.insert(s.id))
            .collect();

        Ok(MatchBatch {
            matches,
            stubs,
            participations,
        })
    }
}
