//! Export of calculation results.
//!
//! Renders a [`DosingReport`] as JSON, CSV or plain text.

mod report;

pub use report::*;
