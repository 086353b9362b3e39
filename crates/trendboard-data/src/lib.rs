//! Data layer for Trendboard.
//!
//! Fetches and parses the layoff CSV, groups and ranks records, computes the
//! dashboard views and serialises filtered records for export.

pub mod aggregator;
pub mod analysis;
pub mod export;
pub mod ranker;
pub mod reader;
pub mod table;

pub use trendboard_core as core;
