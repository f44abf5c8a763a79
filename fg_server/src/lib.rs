//! HTTP server hosting two-player forest games.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
