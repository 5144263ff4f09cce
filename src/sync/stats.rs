//! Per-champion statistics over a summoner's cached match history.

use serde::Serialize;

use crate::db::{ChampionMastery, SummonerMatch};

/// Aggregate performance on one champion, derived at read time and never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionStats {
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    /// Accumulated per game as (kills + assists) / max(deaths, 1), so this is
    /// a sum of per-game ratios rather than a ratio of the summed totals.
    pub kda: f64,
    pub wins: i64,
    pub wards_placed: i64,
    pub gold_earned: i64,
    pub num_games: i64,
}

#[derive(Debug, Clone)]
pub struct MasteryWithStats {
    pub mastery: ChampionMastery,
    pub statistics: ChampionStats,
}

/// Pair each mastery with the statistics accumulated over the matches played
/// on its champion. Bounded work: at most 4 masteries against a 20-match
/// window.
pub fn annotate(
    masteries: Vec<ChampionMastery>,
    matches: &[SummonerMatch],
) -> Vec<MasteryWithStats> {
    masteries
        .into_iter()
        .map(|mastery| {
            let statistics = stats_for(mastery.champion_id, matches);
            MasteryWithStats {
                mastery,
                statistics,
            }
        })
        .collect()
}

fn stats_for(champion_id: i64, matches: &[SummonerMatch]) -> ChampionStats {
    let mut stats = ChampionStats::default();
    for m in matches.iter().filter(|m| m.champion_id == champion_id) {
        stats.num_games += 1;
        stats.kills += m.kills;
        stats.deaths += m.deaths;
        stats.assists += m.assists;
        stats.kda += (m.kills + m.assists) as f64 / m.deaths.max(1) as f64;
        if m.win {
            stats.wins += 1;
        }
        stats.wards_placed += m.wards_placed;
        stats.gold_earned += m.gold_earned;
    }
    stats
}
