//! CSV normalization: heterogeneous upstream payloads into clean `Series`.
//!
//! The upstream feeds carry no schema guarantee across runs, so every parse
//! re-resolves which columns hold the period and the value (`resolve`), then
//! reconstructs calendar dates from string period labels. Nothing in this
//! module returns an error: a payload that cannot be understood yields an
//! empty series and the run continues.

pub mod cpi;
pub mod debt;
pub mod hicp;
mod resolve;
mod table;

pub use cpi::parse_cpi;
pub use debt::parse_debt_gdp;
pub use hicp::parse_hicp;
