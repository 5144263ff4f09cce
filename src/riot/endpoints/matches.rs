use crate::error::AppError;
use crate::riot::client::RiotClient;
use crate::riot::types::{MatchDto, MatchlistDto};

impl RiotClient {
    /// Get the most recent match references for an account, newest first
    pub async fn get_recent_matches(
        &self,
        account_id: i64,
        count: u32,
    ) -> Result<MatchlistDto, AppError> {
        self.get(&format!(
            "/lol/match/v4/matchlists/by-account/{account_id}?endIndex={count}"
        ))
        .await
    }

    /// Get full match detail by match ID
    pub async fn get_match(&self, game_id: i64) -> Result<MatchDto, AppError> {
        self.get(&format!("/lol/match/v4/matches/{game_id}")).await
    }
}
