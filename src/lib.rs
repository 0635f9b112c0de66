//! Personal habit coach: log daily habit values to a flat CSV file, compare
//! the recent window against fixed targets, plot per-habit progress, and
//! optionally ask a hosted model for motivational feedback.
//!

pub mod ai;
pub mod cli;
pub mod registry;
pub mod report;
pub mod store;
pub mod utils;
pub mod web;
