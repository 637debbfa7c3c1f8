//! Dose, interval and outcome models.

use serde::{Deserialize, Serialize};

use crate::dosing::format_mg;

/// Per-kilogram dose for a single administration.
///
/// The label is the exact display text; `mg_per_kg` is the value used in
/// arithmetic. The catalog self-check keeps the two in agreement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DoseRule {
    /// Milligrams per kilogram per dose
    pub mg_per_kg: f64,
    /// Display text (e.g., "100 mg/kg/dose de piperacilina")
    pub label: &'static str,
}

impl DoseRule {
    pub const fn new(mg_per_kg: f64, label: &'static str) -> Self {
        Self { mg_per_kg, label }
    }

    /// Dose in mg for a single administration.
    pub fn per_dose_mg(&self, weight_kg: f64) -> f64 {
        self.mg_per_kg * weight_kg
    }
}

/// Hours between administrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    /// Hours between doses, never zero
    pub hours: u32,
    /// Display text (e.g., "12 horas")
    pub label: &'static str,
}

impl Interval {
    /// # Panics
    ///
    /// Panics if `hours` is zero. Intervals are declared as constants, so the
    /// check happens at compile time.
    pub const fn new(hours: u32, label: &'static str) -> Self {
        assert!(hours > 0, "dosing interval must be positive");
        Self { hours, label }
    }

    /// Number of administrations in 24 hours (may be fractional).
    pub fn doses_per_day(&self) -> f64 {
        24.0 / self.hours as f64
    }
}

/// A leaf of a dosage rule table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DosageLeaf {
    pub dose: DoseRule,
    pub interval: Interval,
}

impl DosageLeaf {
    pub const fn new(dose: DoseRule, interval: Interval) -> Self {
        Self { dose, interval }
    }

    /// mg/kg/dose × weight × 24 / interval.
    pub fn total_daily_dose_mg(&self, weight_kg: f64) -> f64 {
        self.dose.mg_per_kg * weight_kg * 24.0 / self.interval.hours as f64
    }
}

/// Result of evaluating one antibiotic's rule table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DosageOutcome {
    /// Dose display text (e.g., "50 mg/kg/dose")
    pub dose_rule: String,
    /// Dose value used in arithmetic
    pub dose_mg_per_kg: f64,
    /// Interval display text (e.g., "12 horas")
    pub interval: String,
    /// Interval value used in arithmetic
    pub interval_hours: u32,
    /// Total daily dose for the evaluated weight
    pub total_daily_dose_mg: f64,
    /// Clinical notes, including the total daily dose line
    pub notes: Option<String>,
}

impl DosageOutcome {
    /// Dose in mg for a single administration.
    pub fn per_dose_mg(&self, weight_kg: f64) -> f64 {
        self.dose_mg_per_kg * weight_kg
    }

    /// Single administration formatted as "<mg> mg/dose".
    pub fn per_dose_display(&self, weight_kg: f64) -> String {
        format!("{} mg/dose", format_mg(self.per_dose_mg(weight_kg)))
    }
}

/// Calculation result for one catalog entry, as handed to renderers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AntibioticDosing {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Page in the reference document
    pub reference_page: u32,
    pub outcome: DosageOutcome,
    /// Formatted single administration (e.g., "75.0 mg/dose")
    pub dose_per_administration: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q8H: Interval = Interval::new(8, "8 horas");
    const Q36H: Interval = Interval::new(36, "36 horas");

    #[test]
    fn test_total_daily_dose() {
        let leaf = DosageLeaf::new(DoseRule::new(50.0, "50 mg/kg/dose"), Q8H);
        assert!((leaf.total_daily_dose_mg(1.5) - 225.0).abs() < 1e-9);
    }

    #[test]
    fn test_long_interval_gives_fractional_doses_per_day() {
        assert!((Q36H.doses_per_day() - 2.0 / 3.0).abs() < 1e-12);

        let leaf = DosageLeaf::new(DoseRule::new(4.0, "4 mg/kg/dose"), Q36H);
        // 4 × 1.2 × 24 / 36
        assert!((leaf.total_daily_dose_mg(1.2) - 3.2).abs() < 1e-9);
    }

    #[test]
    fn test_outcome_per_dose_display() {
        let outcome = DosageOutcome {
            dose_rule: "15 mg/kg/dose".into(),
            dose_mg_per_kg: 15.0,
            interval: "8 horas".into(),
            interval_hours: 8,
            total_daily_dose_mg: 0.0,
            notes: None,
        };
        assert_eq!(outcome.per_dose_display(2.5), "37.5 mg/dose");
    }
}
