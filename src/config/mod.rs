//! Configuration module
//!
//! TOML settings for display, paging behavior, the CSV loader and charts.

pub mod config;
