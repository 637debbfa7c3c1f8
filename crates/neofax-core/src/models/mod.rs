//! Domain models for the neonatal dosing calculator.

mod antibiotic;
mod dosage;
mod patient;

pub use antibiotic::*;
pub use dosage::*;
pub use patient::*;
