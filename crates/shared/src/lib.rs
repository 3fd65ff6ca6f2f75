//! STAMPalooza wire contracts - request and response bodies for every backend
//! endpoint the player client calls.
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - serde, serde_json and the domain vocabulary
//! 2. **No business logic** - pure data types and serialization
//! 3. **Lenient decoding** - optional backend fields default instead of failing

pub mod requests;
pub mod responses;

pub use requests::{
    CostValidationRequest, FinalRevealRequest, GameResultsRequest, ImageGenerationQuery,
    ImageGenerationRequest, InventoryOperation, InventoryUpdateRequest, PlayerGameRequest,
    ProcessingConfig, RealTimePricingRequest, SessionCreateRequest, SuggestionsRequest,
};
pub use responses::{
    AckResponse, CostValidationResponse, HealthResponse, ImageGenerationResponse, ImageStatus,
    ImageStatusResponse, IngredientRow, InventoryUpdateResponse, PlayerGameResponse,
    ProcessedGameData, ProcessedResults, RealTimePricingResponse, SelectionMapping,
    SessionCreateResponse, SessionResults, SessionResultsResponse, SessionStatusResponse,
    SuggestionsResponse,
};

/// Version string reported to the backend with game results
pub const GAME_VERSION: &str = "1.0.0";
