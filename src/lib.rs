//! Survey preview and local scoring for SigmaQ surveys.
//!
//! A survey document is loaded, shown in a terminal UI (or scored headless
//! from an answers file) and scored on the spot. Nothing is ever sent back to
//! the survey service.

pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod navigation;
pub mod renderer;
pub mod report;
pub mod scoring;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod timer;
pub mod tui;
pub mod ui;
