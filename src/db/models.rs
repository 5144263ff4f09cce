use sqlx::FromRow;

/// A player profile as tracked by the store. Shadow summoners discovered via
/// co-play carry identity fields only; `summoner_level` and `revision_date`
/// stay NULL until the summoner is looked up directly.
#[derive(Debug, Clone, FromRow)]
pub struct Summoner {
    pub id: i64,
    pub account_id: Option<i64>,
    pub name: String,
    pub profile_icon_id: Option<i64>,
    pub summoner_level: Option<i64>,
    pub revision_date: Option<i64>,
    /// Unix milliseconds of the last upstream refresh. 0 for stubs.
    pub updated_at: i64,
}

/// Global match metadata, one row per upstream match id. Write-once.
#[derive(Debug, Clone, FromRow)]
pub struct Match {
    pub id: i64,
    pub timestamp: i64,
    pub season: i64,
    pub queue: i64,
}

/// One summoner's performance inside one match. Write-once history.
#[derive(Debug, Clone, FromRow)]
pub struct SummonerMatch {
    pub game_id: i64,
    pub summoner_id: i64,
    pub champion_id: i64,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub wards_placed: i64,
    pub gold_earned: i64,
    pub win: bool,
    pub role: Option<String>,
    pub created_at: i64,
}

/// A summoner's standing on one champion. Bounded top-N snapshot.
#[derive(Debug, Clone, FromRow)]
pub struct ChampionMastery {
    pub summoner_id: i64,
    pub champion_id: i64,
    pub champion_points: i64,
    pub champion_points_until_next_level: i64,
    pub champion_level: i64,
}

/// Minimal identity of a participant discovered in a match detail, inserted
/// as a shadow summoner row when not already known.
#[derive(Debug, Clone)]
pub struct SummonerStub {
    pub id: i64,
    pub account_id: Option<i64>,
    pub name: String,
    pub profile_icon_id: Option<i64>,
}

/// Participation row to insert; `created_at` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewSummonerMatch {
    pub game_id: i64,
    pub summoner_id: i64,
    pub champion_id: i64,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub wards_placed: i64,
    pub gold_earned: i64,
    pub win: bool,
    pub role: Option<String>,
}

/// Everything one match synchronization run writes, applied atomically.
/// Matches are inserted before stubs, stubs before participation rows.
#[derive(Debug, Clone, Default)]
pub struct MatchBatch {
    pub matches: Vec<Match>,
    pub stubs: Vec<SummonerStub>,
    pub participations: Vec<NewSummonerMatch>,
}

impl MatchBatch {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.stubs.is_empty() && self.participations.is_empty()
    }
}
