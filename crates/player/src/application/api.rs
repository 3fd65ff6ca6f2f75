//! Typed backend API
//!
//! Thin wrapper over `RawApiPort`: serializes request bodies, builds paths,
//! and decodes responses into the wire types from `stampalooza-shared`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use stampalooza_shared::{
    AckResponse, CostValidationRequest, CostValidationResponse, FinalRevealRequest,
    GameResultsRequest, HealthResponse, ImageGenerationQuery, ImageGenerationRequest,
    ImageGenerationResponse, ImageStatusResponse, IngredientRow, InventoryUpdateRequest,
    InventoryUpdateResponse, PlayerGameRequest, PlayerGameResponse, RealTimePricingRequest,
    RealTimePricingResponse, SelectionMapping, SessionCreateRequest, SessionCreateResponse,
    SessionResultsResponse, SessionStatusResponse, SuggestionsRequest, SuggestionsResponse,
};

use crate::ports::outbound::{ApiError, RawApiPort};

#[derive(Clone)]
pub struct Api {
    raw: Arc<dyn RawApiPort>,
}

impl Api {
    pub fn new(raw: Arc<dyn RawApiPort>) -> Self {
        Self { raw }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.raw.get_json(path).await?;
        decode(value)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Parse(e.to_string()))?;
        let value = self.raw.post_json(path, &body).await?;
        decode(value)
    }

    // =========================================================================
    // Inventory and health
    // =========================================================================

    pub async fn ingredients(&self) -> Result<Vec<IngredientRow>, ApiError> {
        self.get("/ingredients").await
    }

    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.get("/health").await
    }

    pub async fn selection_mappings(&self) -> Result<Vec<SelectionMapping>, ApiError> {
        self.get("/selection-mappings").await
    }

    pub async fn update_inventory(
        &self,
        request: &InventoryUpdateRequest,
    ) -> Result<InventoryUpdateResponse, ApiError> {
        self.post("/update-inventory", request).await
    }

    // =========================================================================
    // Game results and AI processing
    // =========================================================================

    pub async fn final_reveal(&self, request: &FinalRevealRequest) -> Result<AckResponse, ApiError> {
        self.post("/final-reveal", request).await
    }

    pub async fn game_results(&self, request: &GameResultsRequest) -> Result<AckResponse, ApiError> {
        self.post("/game-results", request).await
    }

    pub async fn process_player_game(
        &self,
        request: &PlayerGameRequest,
    ) -> Result<PlayerGameResponse, ApiError> {
        self.post("/process-player-game", request).await
    }

    pub async fn ice_cream_suggestions(
        &self,
        request: &SuggestionsRequest,
    ) -> Result<SuggestionsResponse, ApiError> {
        self.post("/get-ice-cream-suggestions", request).await
    }

    // =========================================================================
    // Image generation
    // =========================================================================

    /// On-demand `GET` variant. The backend may answer with a finished image,
    /// a task id to poll, or a bare pending status.
    pub async fn trigger_image_generation(
        &self,
        query: &ImageGenerationQuery,
    ) -> Result<ImageGenerationResponse, ApiError> {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query.pairs())
            .finish();
        self.get(&format!("/generate-ice-cream-image?{}", encoded))
            .await
    }

    pub async fn generate_image_direct(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, ApiError> {
        self.post("/generate-ice-cream-image", request).await
    }

    pub async fn image_generation_status(
        &self,
        task_id: &str,
    ) -> Result<ImageStatusResponse, ApiError> {
        self.get(&format!("/image-generation-status/{}", path_segment(task_id)))
            .await
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    pub async fn real_time_pricing(
        &self,
        request: &RealTimePricingRequest,
    ) -> Result<RealTimePricingResponse, ApiError> {
        self.post("/real-time-pricing", request).await
    }

    pub async fn validate_cost(
        &self,
        request: &CostValidationRequest,
    ) -> Result<CostValidationResponse, ApiError> {
        self.post("/validate-cost", request).await
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    pub async fn create_session(
        &self,
        request: &SessionCreateRequest,
    ) -> Result<SessionCreateResponse, ApiError> {
        self.post("/session/create", request).await
    }

    pub async fn session_status(&self, session_id: &str) -> Result<SessionStatusResponse, ApiError> {
        self.get(&format!("/session/{}/status", path_segment(session_id)))
            .await
    }

    pub async fn session_results(
        &self,
        session_id: &str,
    ) -> Result<SessionResultsResponse, ApiError> {
        self.get(&format!("/session/{}/results", path_segment(session_id)))
            .await
    }

    pub async fn complete_session(&self, session_id: &str) -> Result<AckResponse, ApiError> {
        let value = self
            .raw
            .post_empty(&format!("/session/{}/complete", path_segment(session_id)))
            .await?;
        decode(value)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Percent-encode an id for use as a single path segment
fn path_segment(id: &str) -> String {
    url::form_urlencoded::byte_serialize(id.as_bytes()).collect()
}
