//! Terminal UI layer for Ride Insights.
//!
//! Provides themes, the dashboard header and KPI card components, chart and
//! table views, and the interactive application event loop built on top of
//! [`ratatui`] for rendering ride analytics in the terminal.

pub mod app;
pub mod components;
pub mod dashboard;
pub mod table_view;
pub mod themes;

pub use insights_core as core;
pub use insights_data as data;
