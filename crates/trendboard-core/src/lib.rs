//! Shared building blocks for Trendboard.
//!
//! Record and group models, the error type, CLI settings, data-source
//! configuration, cell parsers, the city → region table and number
//! formatting helpers.

pub mod config;
pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod regions;
pub mod settings;
