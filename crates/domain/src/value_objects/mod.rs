//! Value objects - Immutable objects defined by their attributes

mod flavor;
mod names;

pub use flavor::{FlavorTag, RoundStage, Selection, SKIP};
pub use names::PlayerName;
