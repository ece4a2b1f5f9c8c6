//! Mulescope daemon library.
//!
//! Exposes the router and lifecycle for integration testing.
//! In production, `mulescope-daemon` is used as a binary (main.rs).

pub mod api;
pub mod cli;
pub mod logging;
pub mod metrics_server;
pub mod server;
