//! Application layer - typed API and the services that run a game

pub mod api;
pub mod services;
