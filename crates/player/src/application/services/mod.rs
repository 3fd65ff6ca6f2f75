//! Application services
//!
//! Use cases for the STAMPalooza player. Services depend on port traits,
//! not concrete infrastructure implementations.

pub mod game_service;
pub mod image_generation;
pub mod inventory_service;

pub use game_service::{GameService, GameSettings, PlayerReveal, Toast, ToastLevel};
pub use image_generation::{
    GenerationState, ImageGenerationPoller, ImageTrigger, PollPolicy, RetryOn,
};
pub use inventory_service::{load_inventory, InventoryCatalog, InventorySource};
