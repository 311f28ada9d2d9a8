//! Presentation layer
//!
//! Turns navigator output into terminal text: tables, notices and charts.

pub mod chart_renderer;
pub mod presenter;
pub mod table_renderer;
pub mod typewriter;
