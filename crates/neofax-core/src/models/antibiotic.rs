//! Antibiotic catalog models.

use serde::Serialize;

use crate::dosing::RuleTable;
use crate::models::{DosageOutcome, PatientMetrics};

/// A single antibiotic in the catalog, owning its dosage rule table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Antibiotic {
    /// Unique key (e.g., "piperacillin_tazobactam")
    pub id: String,
    /// Display name
    pub name: String,
    /// Page in the reference document
    pub reference_page: u32,
    /// One-line description
    pub description: String,
    /// Decision table mapping patient metrics to a dose
    pub rules: RuleTable,
}

impl Antibiotic {
    /// Create a new catalog entry.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        reference_page: u32,
        description: impl Into<String>,
        rules: RuleTable,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            reference_page,
            description: description.into(),
            rules,
        }
    }

    /// Evaluate the rule table. Total over all numeric inputs.
    pub fn evaluate(
        &self,
        weight_kg: f64,
        gestational_age_weeks: f64,
        postnatal_age_days: u32,
    ) -> DosageOutcome {
        self.rules
            .evaluate(weight_kg, gestational_age_weeks, postnatal_age_days)
    }

    /// Evaluate against derived patient metrics.
    pub fn evaluate_for(&self, metrics: &PatientMetrics) -> DosageOutcome {
        self.evaluate(
            metrics.weight_kg,
            metrics.gestational_age_weeks,
            metrics.postnatal_age_days,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dosing::{Bound, Criteria, NoteTemplate};
    use crate::models::{DosageLeaf, DoseRule, Interval};

    const DOSE: DoseRule = DoseRule::new(10.0, "10 mg/kg/dose");
    const Q12H: Interval = Interval::new(12, "12 horas");
    const Q24H: Interval = Interval::new(24, "24 horas");

    fn test_drug() -> Antibiotic {
        let rules = RuleTable::builder(NoteTemplate::total_only("Dose total diária"))
            .when(
                Criteria::pna(Bound::AtMost(7.0)),
                DosageLeaf::new(DOSE, Q24H),
            )
            .otherwise(DosageLeaf::new(DOSE, Q12H));
        Antibiotic::new("test", "Teste", 1, "Test drug", rules)
    }

    #[test]
    fn test_evaluate() {
        let drug = test_drug();

        let early = drug.evaluate(2.0, 38.0, 3);
        assert_eq!(early.interval, "24 horas");
        assert_eq!(early.notes.as_deref(), Some("Dose total diária: 20.0 mg/dia"));

        let late = drug.evaluate(2.0, 38.0, 8);
        assert_eq!(late.interval, "12 horas");
        assert_eq!(late.total_daily_dose_mg, 40.0);
    }
}
