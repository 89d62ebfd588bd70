//! cvedash - data-orchestration core and terminal client for a CVE
//! change-event dashboard.
//!
//! The library owns the session, the filter/page state, the backend
//! gateway and the `list`/`stats` state machines. The `cvedash` binary is
//! one host for it; integration tests are another.

pub mod adapters;
pub mod auth;
pub mod charts;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod gateway;
pub mod models;
pub mod orchestrator;
pub mod state;
pub mod traits;
