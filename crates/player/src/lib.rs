//! STAMPalooza player crate.
//!
//! This crate contains the terminal UI, application logic, and
//! infrastructure adapters for the backend and local persistence.

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod ports;
pub mod ui;
