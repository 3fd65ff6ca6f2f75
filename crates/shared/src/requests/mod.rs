//! Request bodies sent to the backend, grouped by concern

mod game;
mod image;
mod pricing;
mod session;

pub use game::{
    FinalRevealRequest, GameResultsRequest, PlayerGameRequest, ProcessingConfig,
    SuggestionsRequest,
};
pub use image::{ImageGenerationQuery, ImageGenerationRequest};
pub use pricing::{
    CostValidationRequest, InventoryOperation, InventoryUpdateRequest, RealTimePricingRequest,
};
pub use session::SessionCreateRequest;
