//! HTTP API for WonderPay capital loan calculations.
//!
//! Exposes the amortization engine at `POST /api/capital/calculate` alongside
//! health and readiness probes.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
