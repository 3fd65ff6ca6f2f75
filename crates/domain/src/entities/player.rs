//! Player entity and the AI interactions recorded during play

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;
use crate::value_objects::{FlavorTag, PlayerName, Selection};

/// One ingredient line of the backend's cost breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientCostBreakdown {
    pub ingredient: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_cost: f64,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub category: String,
}

/// Structured reasoning the backend attaches to a processed selection.
///
/// Every field is optional on the wire; the backend fills what its agents
/// produced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnhancedAiResponse {
    #[serde(default)]
    pub reasoning_steps: Vec<String>,
    #[serde(default)]
    pub ingredient_mappings: Vec<IngredientCostBreakdown>,
    #[serde(default)]
    pub similar_flavors: Vec<String>,
    #[serde(default)]
    pub probable_ice_cream: String,
    #[serde(default)]
    pub cost_breakdown: BTreeMap<String, f64>,
    #[serde(default)]
    pub confidence_score: f64,
}

/// Commentary recorded for one round. Appended once, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInteraction {
    pub selection: Selection,
    pub ai_thought: String,
    pub ai_emoji: String,
    pub ai_steps: Vec<String>,
    /// 1-based round number
    pub round: u8,
    pub timestamp: DateTime<Utc>,
    #[serde(
        rename = "enhanced_ai_response",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub enhanced_ai_response: Option<EnhancedAiResponse>,
}

/// A participant in one playthrough
///
/// # ADR-008 Tier 4: Simple Data Struct
///
/// Fields are public; the `Game` aggregate is the only writer and keeps
/// `selections.len() <= rounds_per_player`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,
    pub selections: Vec<Selection>,
    pub total_cost: f64,
    pub ai_interactions: Vec<AiInteraction>,
    #[serde(default)]
    pub generated_image_url: Option<String>,
}

impl Player {
    pub fn new(name: PlayerName) -> Self {
        Self {
            id: PlayerId::new(),
            name,
            selections: Vec::new(),
            total_cost: 0.0,
            ai_interactions: Vec::new(),
            generated_image_url: None,
        }
    }

    pub fn skip_count(&self) -> usize {
        self.selections.iter().filter(|s| s.is_skip()).count()
    }

    /// Non-skip selections in play order
    pub fn chosen_flavors(&self) -> impl Iterator<Item = FlavorTag> + '_ {
        self.selections.iter().filter_map(|s| s.flavor())
    }

    pub fn last_interaction(&self) -> Option<&AiInteraction> {
        self.ai_interactions.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amy() -> Player {
        Player::new(PlayerName::new("Amy").expect("valid name"))
    }

    #[test]
    fn new_player_starts_empty() {
        let player = amy();
        assert!(player.selections.is_empty());
        assert_eq!(player.total_cost, 0.0);
        assert!(player.generated_image_url.is_none());
    }

    #[test]
    fn counts_skips_and_flavors() {
        let mut player = amy();
        player.selections = vec![
            Selection::Flavor(FlavorTag::Adventure),
            Selection::Skip,
            Selection::Flavor(FlavorTag::Smooth),
        ];
        assert_eq!(player.skip_count(), 1);
        assert_eq!(
            player.chosen_flavors().collect::<Vec<_>>(),
            vec![FlavorTag::Adventure, FlavorTag::Smooth]
        );
    }

    #[test]
    fn wire_form_is_camel_case() {
        let mut player = amy();
        player.ai_interactions.push(AiInteraction {
            selection: Selection::Skip,
            ai_thought: "Hmm".into(),
            ai_emoji: "🤔".into(),
            ai_steps: vec![],
            round: 1,
            timestamp: Utc::now(),
            enhanced_ai_response: Some(EnhancedAiResponse::default()),
        });
        let json = serde_json::to_value(&player).expect("serialize");
        assert!(json.get("totalCost").is_some());
        assert!(json.get("generatedImageUrl").is_some());
        let interaction = &json["aiInteractions"][0];
        assert_eq!(interaction["aiThought"], "Hmm");
        assert!(interaction.get("enhanced_ai_response").is_some());
    }
}
