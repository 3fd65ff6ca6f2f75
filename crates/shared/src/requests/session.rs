use serde::{Deserialize, Serialize};
use stampalooza_domain::Player;

/// Body of `POST /session/create`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreateRequest {
    pub players: Vec<Player>,
    #[serde(default)]
    pub game_metadata: serde_json::Value,
}

impl SessionCreateRequest {
    pub fn new(players: Vec<Player>, game_version: &str) -> Self {
        let total_players = players.len();
        Self {
            players,
            game_metadata: serde_json::json!({
                "gameVersion": game_version,
                "totalPlayers": total_players,
            }),
        }
    }
}
