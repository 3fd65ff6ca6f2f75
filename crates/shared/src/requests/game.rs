use serde::{Deserialize, Serialize};
use stampalooza_domain::{Player, Selection};

/// Body of `POST /final-reveal`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalRevealRequest {
    pub player_name: String,
    /// Personality name shown at the reveal
    pub character: String,
    pub ice_cream_data: serde_json::Value,
    pub ingredients_used: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
}

/// Body of `POST /game-results`, the same shape as the downloadable summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResultsRequest {
    pub game_date: String,
    pub players: Vec<Player>,
    pub total_players: usize,
    pub game_version: String,
}

/// Per-request switches for `POST /process-player-game`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingConfig {
    pub generate_image: bool,
    pub verbose: bool,
    pub quality_level: String,
    #[serde(rename = "session_id", default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            generate_image: false,
            verbose: true,
            quality_level: "standard".to_string(),
            session_id: None,
        }
    }
}

/// Body of `POST /process-player-game`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerGameRequest {
    pub player_data: Player,
    pub processing_config: ProcessingConfig,
}

/// Body of `POST /get-ice-cream-suggestions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionsRequest {
    pub selections: Vec<Selection>,
}
