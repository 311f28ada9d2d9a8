//! Utility functions and helpers
//!
//! Application directories and log setup.

pub mod app_paths;
pub mod logging;
