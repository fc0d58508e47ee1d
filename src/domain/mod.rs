//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the normalized observation series (`Series`)
//! - the fixed country table (`Country`)
//! - dataset identities and cache naming (`Dataset`)
//! - the resolved run configuration (`RunConfig`)

pub mod types;

pub use types::*;
