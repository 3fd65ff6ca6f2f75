use serde::{Deserialize, Serialize};
use stampalooza_domain::Selection;

/// Body of `POST /real-time-pricing`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealTimePricingRequest {
    pub selections: Vec<Selection>,
    pub player_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// How `/update-inventory` applies `quantity`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryOperation {
    Decrease,
    Increase,
    Set,
}

/// Body of `POST /update-inventory`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryUpdateRequest {
    /// Backend ingredient name, not the flavor tag
    pub ingredient: String,
    pub quantity: u32,
    pub operation: InventoryOperation,
}

impl InventoryUpdateRequest {
    pub fn decrease(ingredient: impl Into<String>, quantity: u32) -> Self {
        Self {
            ingredient: ingredient.into(),
            quantity,
            operation: InventoryOperation::Decrease,
        }
    }
}

/// Body of `POST /validate-cost`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostValidationRequest {
    pub selections: Vec<Selection>,
    pub frontend_total_cost: f64,
    pub player_name: String,
}
