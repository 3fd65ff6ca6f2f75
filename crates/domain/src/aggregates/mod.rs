//! Aggregate roots - domain objects that own their related data
//!
//! The game is the only aggregate. It owns the roster, the round cursors and
//! the inventory projection, and exposes behavior through methods rather than
//! public fields.

pub mod game;

pub use game::{Game, GamePhase, GameRules, GameSnapshot};
