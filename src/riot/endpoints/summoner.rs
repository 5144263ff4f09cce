use crate::error::AppError;
use crate::riot::client::RiotClient;
use crate::riot::types::SummonerDto;

impl RiotClient {
    /// Get a summoner profile by (normalized) name
    pub async fn get_summoner_by_name(&self, name: &str) -> Result<SummonerDto, AppError> {
        self.get(&format!("/lol/summoner/v4/summoners/by-name/{name}"))
            .await
    }
}
