//! Heat pump performance advisor.
//!
//! Prices monthly electricity use against tiered (block) tariffs and derives
//! efficiency metrics, heating-curve diagnostics and seasonal projections from
//! a table of monthly heat pump readings.

pub mod advisor;
pub mod analysis;
pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod telemetry;
