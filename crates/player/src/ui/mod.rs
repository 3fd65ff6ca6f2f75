//! Terminal presentation layer

pub mod render;
pub mod terminal;

pub use terminal::{parse_command, Command, TerminalUi};
