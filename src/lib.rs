//! `macrowatch` library crate.
//!
//! The binary (`mw`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes or hitting the network
//! - the normalizers can be exercised directly against captured payloads
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod plot;
pub mod report;
pub mod transform;
