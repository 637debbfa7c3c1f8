//! Dosage rule evaluation.
//!
//! Pipeline: Patient Metrics → Rule Table (per antibiotic) → Dose Arithmetic

mod arithmetic;
mod table;

pub use arithmetic::*;
pub use table::*;

use thiserror::Error;
use tracing::debug;

use crate::catalog::{Catalog, Category};
use crate::export::DosingReport;
use crate::models::{Antibiotic, AntibioticDosing, PatientMetrics};

/// Dose arithmetic errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DosingError {
    #[error("No numeric token in rule text: {0:?}")]
    UnparsableRuleToken(String),

    #[error("Dosing interval must be positive: {0:?}")]
    ZeroInterval(String),
}

pub type DosingResult<T> = Result<T, DosingError>;

/// Evaluates catalog entries against one patient's metrics.
pub struct Calculator<'a> {
    catalog: &'a Catalog,
}

impl<'a> Calculator<'a> {
    /// Create a new calculator over an immutable catalog.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Dosing for a single antibiotic.
    pub fn dosing_for(
        &self,
        antibiotic: &Antibiotic,
        metrics: &PatientMetrics,
    ) -> AntibioticDosing {
        let outcome = antibiotic.evaluate_for(metrics);
        debug!(
            antibiotic = %antibiotic.id,
            dose = %outcome.dose_rule,
            interval = %outcome.interval,
            "evaluated rule table"
        );

        AntibioticDosing {
            id: antibiotic.id.clone(),
            name: antibiotic.name.clone(),
            description: antibiotic.description.clone(),
            reference_page: antibiotic.reference_page,
            dose_per_administration: outcome.per_dose_display(metrics.weight_kg),
            outcome,
        }
    }

    /// Dosing for every antibiotic in a category, in catalog order.
    pub fn calculate(
        &self,
        metrics: &PatientMetrics,
        category: Category,
    ) -> Vec<AntibioticDosing> {
        debug!(
            category = %category,
            weight_kg = metrics.weight_kg,
            gestational_age_weeks = metrics.gestational_age_weeks,
            postnatal_age_days = metrics.postnatal_age_days,
            "calculating dosing"
        );

        self.catalog
            .filter(category)
            .into_iter()
            .map(|antibiotic| self.dosing_for(antibiotic, metrics))
            .collect()
    }

    /// Full report for a category.
    pub fn report(
        &self,
        metrics: &PatientMetrics,
        category: Category,
        reference_document: Option<String>,
    ) -> DosingReport {
        let antibiotics = self.calculate(metrics, category);
        DosingReport::new(metrics, category, reference_document, antibiotics)
    }

    /// Get the catalog for direct access.
    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn metrics(weeks: u32, days: u32, weight_kg: f64, postnatal_days: i64) -> PatientMetrics {
        let birth = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let now = (birth + chrono::Duration::days(postnatal_days))
            .and_hms_opt(9, 30, 0)
            .unwrap();
        PatientMetrics::from_parts(birth, weeks, days, weight_kg, now)
    }

    #[test]
    fn test_calculate_all() {
        let catalog = Catalog::standard().unwrap();
        let calculator = Calculator::new(&catalog);

        let results = calculator.calculate(&metrics(30, 0, 1.5, 10), Category::All);
        assert_eq!(results.len(), catalog.len());

        let ampicillin = &results[0];
        assert_eq!(ampicillin.id, "ampicillin");
        assert_eq!(ampicillin.outcome.dose_rule, "50 mg/kg/dose");
        // GA 30 and PNA 10 fall in the GA ≤ 36, PNA ≤ 14 band
        assert_eq!(ampicillin.outcome.interval, "12 horas");
        assert_eq!(ampicillin.dose_per_administration, "75.0 mg/dose");
        assert_eq!(ampicillin.outcome.total_daily_dose_mg, 150.0);
    }

    #[test]
    fn test_calculate_category() {
        let catalog = Catalog::standard().unwrap();
        let calculator = Calculator::new(&catalog);

        let ids: Vec<String> = calculator
            .calculate(&metrics(38, 0, 3.2, 2), Category::Aminoglycosides)
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["gentamicin", "amikacin"]);
    }

    #[test]
    fn test_piperacillin_per_dose() {
        let catalog = Catalog::standard().unwrap();
        let calculator = Calculator::new(&catalog);
        let antibiotic = catalog.get("piperacillin_tazobactam").unwrap();

        let dosing = calculator.dosing_for(antibiotic, &metrics(34, 0, 3.0, 3));
        assert_eq!(dosing.dose_per_administration, "300.0 mg/dose");
        assert_eq!(dosing.outcome.interval, "8 horas");
    }
}
