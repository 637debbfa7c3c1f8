//! Neofax Core Library
//!
//! Neonatal antibiotic dosing from the Neofax reference tables.
//!
//! # Architecture
//!
//! ```text
//! Form input (birth date, GA weeks + days, weight)
//!                     │
//!             [PatientMetrics::derive]
//!                     │
//!     weight_kg, gestational_age_weeks, postnatal_age_days
//!                     │
//!         ┌───────────▼───────────┐
//!         │   Category filter     │
//!         │   (catalog order)     │
//!         └───────────┬───────────┘
//!                     │
//!         ┌───────────▼───────────┐
//!         │  Rule table per drug  │
//!         │  first match wins     │
//!         └───────────┬───────────┘
//!                     │
//!             Dose arithmetic
//!                     │
//!         ┌───────────┼───────────┐
//!         ▼           ▼           ▼
//!       Text        JSON         CSV
//! ```
//!
//! # Core Principle
//!
//! **Every antibiotic yields a dosage for every patient.** Rule tables end in a
//! mandatory fallback, so there is no "no match" state.
//!
//! # Modules
//!
//! - [`models`]: Domain types (PatientMetrics, Antibiotic, DosageOutcome, etc.)
//! - [`dosing`]: Rule tables, dose arithmetic and the calculator
//! - [`catalog`]: Antibiotic catalog, categories and reference pages
//! - [`export`]: Report rendering

pub mod catalog;
pub mod dosing;
pub mod export;
pub mod models;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError, Category, DocumentRef, ReferenceIndex};
pub use dosing::{absolute_dose_mg, Calculator, DosingError, RuleTable};
pub use export::DosingReport;
pub use models::{
    Antibiotic, AntibioticDosing, DosageOutcome, InputError, PatientInput, PatientMetrics,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::warn;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum NeofaxError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Out of range: {0}")]
    OutOfDomain(String),

    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error("Dosing error: {0}")]
    DosingError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<InputError> for NeofaxError {
    fn from(e: InputError) -> Self {
        match e {
            InputError::OutOfDomain { .. } => NeofaxError::OutOfDomain(e.to_string()),
            _ => NeofaxError::InvalidInput(e.to_string()),
        }
    }
}

impl From<CatalogError> for NeofaxError {
    fn from(e: CatalogError) -> Self {
        NeofaxError::CatalogError(e.to_string())
    }
}

impl From<DosingError> for NeofaxError {
    fn from(e: DosingError) -> Self {
        NeofaxError::DosingError(e.to_string())
    }
}

impl From<catalog::UnknownCategory> for NeofaxError {
    fn from(e: catalog::UnknownCategory) -> Self {
        NeofaxError::InvalidInput(e.to_string())
    }
}

impl From<serde_json::Error> for NeofaxError {
    fn from(e: serde_json::Error) -> Self {
        NeofaxError::SerializationError(e.to_string())
    }
}

/// Parse a calculation instant: RFC 3339, `YYYY-MM-DDTHH:MM:SS`, or a bare
/// date (midnight).
pub fn parse_instant(value: &str) -> Result<NaiveDateTime, NeofaxError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::default()))
        .map_err(|_| NeofaxError::InvalidInput(format!("Unparsable instant: {:?}", value)))
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Load the built-in catalog, running its self-check.
#[uniffi::export]
pub fn open_calculator() -> Result<Arc<NeofaxCalculator>, NeofaxError> {
    Ok(Arc::new(NeofaxCalculator {
        catalog: Catalog::standard()?,
    }))
}

/// Single administration for a dose text and weight (e.g. "75.0 mg/dose").
#[uniffi::export]
pub fn absolute_dose(dose_rule: String, weight_kg: f64) -> String {
    absolute_dose_mg(&dose_rule, weight_kg)
}

/// Total daily dose in mg for a dose text, interval text and weight.
#[uniffi::export]
pub fn total_daily_dose(
    dose_rule: String,
    interval: String,
    weight_kg: f64,
) -> Result<f64, NeofaxError> {
    Ok(dosing::total_daily_dose_from_labels(&dose_rule, &interval, weight_kg)?)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Immutable catalog wrapper for FFI. Safe to share between threads.
#[derive(uniffi::Object)]
pub struct NeofaxCalculator {
    catalog: Catalog,
}

#[uniffi::export]
impl NeofaxCalculator {
    // =========================================================================
    // Calculation
    // =========================================================================

    /// Calculate dosing for every antibiotic in a category.
    ///
    /// `now` is the submission instant. Range violations are returned as
    /// warnings, or as an error when `strict_domain` is set.
    pub fn calculate(
        &self,
        input: FfiPatientInput,
        now: String,
        category: String,
        strict_domain: bool,
    ) -> Result<FfiDosingReport, NeofaxError> {
        let now = parse_instant(&now)?;
        let category: Category = category.parse()?;
        let metrics = PatientMetrics::derive(&input.into(), now)?;

        let violations = metrics.domain_violations();
        if strict_domain {
            if let Some(violation) = violations.first() {
                return Err(violation.clone().into());
            }
        }
        let warnings: Vec<String> = violations.iter().map(ToString::to_string).collect();
        for warning in &warnings {
            warn!(%warning, "patient data outside reference range");
        }

        let report = Calculator::new(&self.catalog).report(&metrics, category, None);
        Ok(FfiDosingReport::new(report, warnings))
    }

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Antibiotics in a category, in catalog order.
    pub fn list_antibiotics(&self, category: String) -> Result<Vec<FfiAntibiotic>, NeofaxError> {
        let category: Category = category.parse()?;
        Ok(self
            .catalog
            .filter(category)
            .into_iter()
            .map(FfiAntibiotic::from)
            .collect())
    }

    /// Reference page for a display name (page 1 if unknown).
    pub fn reference_page(&self, name: String) -> u32 {
        self.catalog.reference_page_for_name(&name)
    }

    /// Closest antibiotic name for a misspelled query.
    pub fn suggest(&self, query: String) -> Option<String> {
        self.catalog.suggest(&query).map(|a| a.name.clone())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient form input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientInput {
    pub birth_date: String,
    pub gestational_weeks: String,
    pub gestational_days: String,
    pub weight_kg: String,
}

impl From<FfiPatientInput> for PatientInput {
    fn from(input: FfiPatientInput) -> Self {
        PatientInput::new(
            input.birth_date,
            input.gestational_weeks,
            input.gestational_days,
            input.weight_kg,
        )
    }
}

/// FFI-safe catalog entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAntibiotic {
    pub id: String,
    pub name: String,
    pub description: String,
    pub reference_page: u32,
}

impl From<&Antibiotic> for FfiAntibiotic {
    fn from(antibiotic: &Antibiotic) -> Self {
        Self {
            id: antibiotic.id.clone(),
            name: antibiotic.name.clone(),
            description: antibiotic.description.clone(),
            reference_page: antibiotic.reference_page,
        }
    }
}

/// FFI-safe dosing result for one antibiotic.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDosing {
    pub id: String,
    pub name: String,
    pub description: String,
    pub dose_rule: String,
    pub interval: String,
    pub dose_per_administration: String,
    pub total_daily_dose_mg: f64,
    pub notes: Option<String>,
    pub reference_page: u32,
}

impl From<AntibioticDosing> for FfiDosing {
    fn from(dosing: AntibioticDosing) -> Self {
        Self {
            id: dosing.id,
            name: dosing.name,
            description: dosing.description,
            dose_rule: dosing.outcome.dose_rule,
            interval: dosing.outcome.interval,
            dose_per_administration: dosing.dose_per_administration,
            total_daily_dose_mg: dosing.outcome.total_daily_dose_mg,
            notes: dosing.outcome.notes,
            reference_page: dosing.reference_page,
        }
    }
}

/// FFI-safe calculation report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDosingReport {
    pub category: String,
    pub postnatal_age_days: u32,
    pub gestational_age_weeks: f64,
    pub corrected_age_weeks: f64,
    pub weight_kg: f64,
    pub antibiotics: Vec<FfiDosing>,
    pub domain_warnings: Vec<String>,
    /// Plain-text rendering of the whole report
    pub text: String,
}

impl FfiDosingReport {
    fn new(report: DosingReport, domain_warnings: Vec<String>) -> Self {
        let text = report.to_text();
        Self {
            category: report.metadata.category.key().to_string(),
            postnatal_age_days: report.patient.postnatal_age_days,
            gestational_age_weeks: report.patient.gestational_age_weeks,
            corrected_age_weeks: report.patient.corrected_age_weeks,
            weight_kg: report.patient.weight_kg,
            antibiotics: report.antibiotics.into_iter().map(FfiDosing::from).collect(),
            domain_warnings,
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(birth: &str, weeks: &str, days: &str, weight: &str) -> FfiPatientInput {
        FfiPatientInput {
            birth_date: birth.into(),
            gestational_weeks: weeks.into(),
            gestational_days: days.into(),
            weight_kg: weight.into(),
        }
    }

    #[test]
    fn test_parse_instant() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 11)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(parse_instant("2024-06-11T08:30:00").unwrap(), expected);
        assert_eq!(parse_instant("2024-06-11T08:30:00-03:00").unwrap(), expected);
        assert_eq!(
            parse_instant("2024-06-11").unwrap(),
            expected.date().and_time(NaiveTime::default())
        );
        assert!(parse_instant("11/06/2024").is_err());
    }

    #[test]
    fn test_calculate_through_ffi() {
        let calc = open_calculator().unwrap();
        let report = calc
            .calculate(
                input("2024-06-01", "30", "0", "1.5"),
                "2024-06-11T08:00:00".into(),
                "common".into(),
                false,
            )
            .unwrap();

        assert_eq!(report.category, "common");
        assert_eq!(report.postnatal_age_days, 10);
        assert_eq!(report.antibiotics.len(), 3);
        assert_eq!(report.antibiotics[0].dose_per_administration, "75.0 mg/dose");
        assert!(report.domain_warnings.is_empty());
        assert!(report.text.contains("Ampicilina"));
    }

    #[test]
    fn test_strict_domain() {
        let calc = open_calculator().unwrap();
        let lenient = calc
            .calculate(
                input("2024-06-01", "20", "0", "1.5"),
                "2024-06-11".into(),
                "all".into(),
                false,
            )
            .unwrap();
        assert_eq!(lenient.domain_warnings.len(), 1);
        assert_eq!(lenient.antibiotics.len(), 7);

        let strict = calc.calculate(
            input("2024-06-01", "20", "0", "1.5"),
            "2024-06-11".into(),
            "all".into(),
            true,
        );
        assert!(matches!(strict, Err(NeofaxError::OutOfDomain(_))));
    }

    #[test]
    fn test_invalid_input_errors() {
        let calc = open_calculator().unwrap();
        let missing = calc.calculate(
            input("", "30", "0", "1.5"),
            "2024-06-11".into(),
            "all".into(),
            false,
        );
        assert!(matches!(missing, Err(NeofaxError::InvalidInput(_))));

        let category = calc.list_antibiotics("betalactams".into());
        assert!(matches!(category, Err(NeofaxError::InvalidInput(_))));
    }

    #[test]
    fn test_catalog_operations() {
        let calc = open_calculator().unwrap();
        let aminoglycosides = calc.list_antibiotics("aminoglycosides".into()).unwrap();
        let ids: Vec<&str> = aminoglycosides.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["gentamicin", "amikacin"]);

        assert_eq!(calc.reference_page("Meropenem".into()), 603);
        assert_eq!(calc.reference_page("Desconhecido".into()), 1);
        assert_eq!(calc.suggest("meropenen".into()).as_deref(), Some("Meropenem"));
        assert_eq!(absolute_dose("15 mg/kg/dose".into(), 2.0), "30.0 mg/dose");
    }
}
