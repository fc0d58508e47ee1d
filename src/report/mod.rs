//! Formatted terminal output.
//!
//! Formatting stays in one place so:
//! - the acquisition/transform code stays clean and testable
//! - output changes are localized

pub mod format;

pub use format::*;
