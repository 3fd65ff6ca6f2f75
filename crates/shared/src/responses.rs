//! Response bodies returned by the backend
//!
//! The backend is lenient about which fields it fills, so most fields carry
//! `#[serde(default)]` and a missing field decodes to its empty value rather
//! than failing the whole call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stampalooza_domain::{EnhancedAiResponse, IngredientCostBreakdown};

// =============================================================================
// Inventory
// =============================================================================

/// One row of `GET /ingredients`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientRow {
    pub ingredient: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub used_on: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    /// Free-text unit quantity, e.g. "1 oz"
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub cost_min: Option<f64>,
    #[serde(default)]
    pub cost_max: Option<f64>,
    /// Units in stock
    #[serde(default)]
    pub inventory: i64,
}

impl IngredientRow {
    /// Unit price: midpoint of the cost range, or whichever bound is known
    pub fn price(&self) -> Option<f64> {
        match (self.cost_min, self.cost_max) {
            (Some(min), Some(max)) => Some((min + max) / 2.0),
            (Some(cost), None) | (None, Some(cost)) => Some(cost),
            (None, None) => None,
        }
    }

    /// Stock count clamped to zero
    pub fn available(&self) -> u32 {
        u32::try_from(self.inventory.max(0)).unwrap_or(u32::MAX)
    }
}

/// One row of `GET /selection-mappings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionMapping {
    pub frontend_choice: String,
    pub backend_ingredient: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

/// `POST /update-inventory`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUpdateResponse {
    pub success: bool,
    #[serde(default)]
    pub ingredient: String,
    #[serde(default)]
    pub previous_quantity: i64,
    #[serde(default)]
    pub new_quantity: i64,
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// Health and acknowledgements
// =============================================================================

/// `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub components: Option<serde_json::Value>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

/// Generic acknowledgement used by `/final-reveal`, `/game-results` and
/// `/session/:id/complete`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AckResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

// =============================================================================
// AI processing
// =============================================================================

/// `processedResults` of `/process-player-game`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProcessedResults {
    #[serde(default)]
    pub enhanced_ai_response: Option<EnhancedAiResponse>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedGameData {
    #[serde(default)]
    pub processed_results: ProcessedResults,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub estimated_cost: Option<f64>,
    #[serde(default)]
    pub ingredients_used: Vec<String>,
    #[serde(default)]
    pub ai_reasoning_steps: Vec<String>,
}

/// `POST /process-player-game`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerGameResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<ProcessedGameData>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PlayerGameResponse {
    /// The enhanced response, when the backend succeeded and produced one
    pub fn enhanced(&self) -> Option<&EnhancedAiResponse> {
        if !self.success {
            return None;
        }
        self.data
            .as_ref()
            .and_then(|d| d.processed_results.enhanced_ai_response.as_ref())
    }
}

/// `POST /get-ice-cream-suggestions`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsResponse {
    pub success: bool,
    #[serde(default)]
    pub probable_ice_cream: Option<String>,
    #[serde(default)]
    pub alternative_names: Vec<String>,
    #[serde(default)]
    pub suggested_ingredients: Vec<String>,
    #[serde(default)]
    pub selections_processed: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// Image generation
// =============================================================================

/// Generation state reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    Pending,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

/// `GET|POST /generate-ice-cream-image`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub status: Option<ImageStatus>,
    #[serde(default)]
    pub cached: bool,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /image-generation-status/:taskId`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStatusResponse {
    pub status: ImageStatus,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// Pricing
// =============================================================================

/// `POST /real-time-pricing`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealTimePricingResponse {
    pub success: bool,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub itemized_costs: BTreeMap<String, f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub breakdown: serde_json::Value,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub ai_ingredient_mappings: Vec<IngredientCostBreakdown>,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// `POST /validate-cost`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostValidationResponse {
    pub success: bool,
    #[serde(default)]
    pub is_valid: bool,
    #[serde(default)]
    pub frontend_cost: f64,
    #[serde(default)]
    pub backend_cost: f64,
    #[serde(default)]
    pub discrepancy: f64,
    #[serde(default)]
    pub tolerance: f64,
    #[serde(default)]
    pub details: serde_json::Value,
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// Sessions
// =============================================================================

/// `POST /session/create`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCreateResponse {
    pub success: bool,
    pub session_id: String,
    #[serde(default)]
    pub message: String,
}

/// `GET /session/:id/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    pub players_count: usize,
    pub expires_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResults {
    pub session_id: String,
    pub status: String,
    pub created_at: String,
    /// Player records as the backend stores them
    #[serde(default)]
    pub players: Vec<serde_json::Value>,
}

/// `GET /session/:id/results`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResultsResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<SessionResults>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ingredient_row_price_and_stock() {
        let row: IngredientRow = serde_json::from_value(json!({
            "ingredient": "Vanilla extract",
            "description": "Pure",
            "used_on": ["Classic Vanilla"],
            "allergies": [],
            "quantity": "1 tsp",
            "cost_min": 2.0,
            "cost_max": 3.0,
            "inventory": -2
        }))
        .expect("decode");
        assert_eq!(row.price(), Some(2.5));
        assert_eq!(row.available(), 0);
    }

    #[test]
    fn processed_game_exposes_enhanced_response() {
        let response: PlayerGameResponse = serde_json::from_value(json!({
            "success": true,
            "data": {
                "processedResults": {
                    "player_name": "Amy",
                    "enhanced_ai_response": {
                        "reasoning_steps": ["mapped Adventure"],
                        "ingredient_mappings": [{
                            "ingredient": "Rum flavoring (extract)",
                            "quantity": 1.0,
                            "unit_cost": 3.5,
                            "total_cost": 3.5,
                            "category": "flavor"
                        }],
                        "similar_flavors": [],
                        "probable_ice_cream": "Rum Raisin",
                        "cost_breakdown": {"Rum flavoring (extract)": 3.5},
                        "confidence_score": 0.9
                    }
                },
                "estimatedCost": 3.5,
                "ingredientsUsed": ["Rum flavoring (extract)"],
                "aiReasoningSteps": []
            }
        }))
        .expect("decode");
        let enhanced = response.enhanced().expect("enhanced present");
        assert_eq!(enhanced.probable_ice_cream, "Rum Raisin");
        assert_eq!(enhanced.ingredient_mappings.len(), 1);
        let data = response.data.as_ref().expect("data");
        assert!(data.processed_results.extra.contains_key("player_name"));
    }

    #[test]
    fn failed_processing_has_no_enhanced_response() {
        let response: PlayerGameResponse =
            serde_json::from_value(json!({"success": false, "data": {}, "error": "boom"}))
                .expect("decode");
        assert!(response.enhanced().is_none());
    }

    #[test]
    fn unknown_image_status_decodes() {
        let response: ImageGenerationResponse =
            serde_json::from_value(json!({"success": false, "status": "queued"}))
                .expect("decode");
        assert_eq!(response.status, Some(ImageStatus::Unknown));
        assert!(response.task_id.is_none());
    }

    #[test]
    fn pricing_defaults_to_usd() {
        let response: RealTimePricingResponse =
            serde_json::from_value(json!({"success": true, "totalCost": 7.5})).expect("decode");
        assert_eq!(response.currency, "USD");
        assert_eq!(response.total_cost, 7.5);
    }
}
