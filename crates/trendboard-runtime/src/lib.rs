//! Runtime layer for Trendboard.
//!
//! Owns the loaded record sequence and drives view recomputation on filter
//! and reload commands.

pub mod data_manager;
pub mod orchestrator;

pub use trendboard_core as core;
pub use trendboard_data as data;
