use crate::error::AppError;
use crate::riot::client::RiotClient;
use crate::riot::types::ChampionMasteryDto;

impl RiotClient {
    /// Get all champion-mastery entries for a summoner, sorted by points
    /// descending per the upstream contract
    pub async fn get_champion_masteries(
        &self,
        summoner_id: i64,
    ) -> Result<Vec<ChampionMasteryDto>, AppError> {
        self.get(&format!(
            "/lol/champion-mastery/v4/champion-masteries/by-summoner/{summoner_id}"
        ))
        .await
    }
}
