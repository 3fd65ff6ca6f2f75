//! STAMPalooza domain - flavor tags, players, personalities and the game
//! state machine.
//!
//! Pure types and rules only. No I/O and no async. Generators draw from an
//! injected `RandomSource` and transitions take the current time. Player ids
//! are the exception: `PlayerId::new` uses a random v4 uuid.

pub mod aggregates;
pub mod conversation;
pub mod entities;
pub mod error;
pub mod ids;
pub mod personality;
pub mod random;
pub mod value_objects;

pub use aggregates::{Game, GamePhase, GameRules, GameSnapshot};
pub use conversation::{generate_thinking, ThinkingContext, ThinkingScript};
pub use entities::{
    AiInteraction, EnhancedAiResponse, ImageChoice, IngredientCostBreakdown, Inventory,
    InventoryEntry, Player, Round,
};
pub use error::DomainError;
pub use ids::{PlayerId, SessionId};
pub use personality::{combination_key, resolve_personality, IceCreamPersonality};
pub use random::{pick, RandomSource};
pub use value_objects::{FlavorTag, PlayerName, RoundStage, Selection, SKIP};
