pub mod app;
pub mod command;
pub mod config;
pub mod data;
pub mod help_text;
pub mod input;
pub mod navigator;
pub mod output;
pub mod ui;
pub mod utils;
