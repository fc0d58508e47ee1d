//! SVG chart rendering.
//!
//! All functions draw into fixed-size SVG files and return whether a file
//! was actually drawn. Empty input is never an error: a chart with nothing
//! to show is skipped entirely, and a grid with some data draws a "no data"
//! note in the affected panels.

pub mod charts;

pub use charts::*;
