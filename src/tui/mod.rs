//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens:
//! - Dashboard with risk gauges, alerts and progress
//! - Coach chat
//! - Digital-twin simulation
//! - Audit log with chain verification

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::HealthTheme;
