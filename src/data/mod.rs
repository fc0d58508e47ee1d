//! Upstream data clients.
//!
//! - ECB Statistical Data Warehouse REST API (`ecb`)
//! - KSH stadat static CSV export (`ksh`)

pub mod ecb;
pub mod ksh;

pub use ecb::EcbClient;
