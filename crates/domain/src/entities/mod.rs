//! Domain entities - Core business objects with identity

mod inventory;
mod player;
mod round;

pub use inventory::{Inventory, InventoryEntry};
pub use player::{AiInteraction, EnhancedAiResponse, IngredientCostBreakdown, Player};
pub use round::{ImageChoice, Round};
