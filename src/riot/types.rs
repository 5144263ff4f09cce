use serde::Deserialize;

// ============================================================================
// Summoner-v4
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerDto {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    pub profile_icon_id: i64,
    pub summoner_level: i64,
    /// Upstream version stamp, unix milliseconds. Moves whenever the profile
    /// changed on the upstream side.
    pub revision_date: i64,
}

// ============================================================================
// Match-v4
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchlistDto {
    pub matches: Vec<MatchReferenceDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReferenceDto {
    pub game_id: i64,
    pub timestamp: i64,
    pub season: i64,
    pub queue: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDto {
    pub game_id: i64,
    pub participants: Vec<ParticipantDto>,
    pub participant_identities: Vec<ParticipantIdentityDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub participant_id: i64,
    pub champion_id: i64,
    pub stats: ParticipantStatsDto,
    #[serde(default)]
    pub timeline: ParticipantTimelineDto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStatsDto {
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    #[serde(default)]
    pub wards_placed: i64,
    pub gold_earned: i64,
    pub win: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantTimelineDto {
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantIdentityDto {
    pub participant_id: i64,
    pub player: PlayerDto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    /// Missing for bot participants; those are never persisted.
    pub summoner_id: Option<i64>,
    pub account_id: Option<i64>,
    pub summoner_name: String,
    pub profile_icon: Option<i64>,
}

// ============================================================================
// Champion-Mastery-v4
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionMasteryDto {
    pub player_id: i64,
    pub champion_id: i64,
    pub champion_level: i64,
    pub champion_points: i64,
    pub champion_points_until_next_level: i64,
}
