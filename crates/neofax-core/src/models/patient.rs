//! Patient models.
//!
//! Raw form input is turned into [`PatientMetrics`] once per calculation. The
//! derivation never reads the clock: the caller passes the submission instant.

use std::fmt;
use std::ops::RangeInclusive;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SECONDS_PER_DAY: i64 = 86_400;

/// Gestational age at term, in weeks.
const TERM_WEEKS: f64 = 40.0;

/// Accepted gestational weeks at birth.
pub const GESTATIONAL_WEEKS_RANGE: RangeInclusive<u32> = 23..=42;

/// Accepted extra gestational days at birth.
pub const GESTATIONAL_DAYS_RANGE: RangeInclusive<u32> = 0..=6;

/// Accepted current weight in kilograms.
pub const WEIGHT_KG_RANGE: RangeInclusive<f64> = 0.5..=10.0;

/// Patient input field, used for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientField {
    BirthDate,
    GestationalWeeks,
    GestationalDays,
    WeightKg,
}

impl fmt::Display for PatientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatientField::BirthDate => "birth_date",
            PatientField::GestationalWeeks => "gestational_weeks",
            PatientField::GestationalDays => "gestational_days",
            PatientField::WeightKg => "weight_kg",
        };
        f.write_str(name)
    }
}

/// Patient input errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Missing required field: {0}")]
    MissingInput(PatientField),

    #[error("Invalid value for {field}: {value:?}")]
    InvalidInput { field: PatientField, value: String },

    #[error("Value for {field} out of range: {detail}")]
    OutOfDomain { field: PatientField, detail: String },
}

pub type InputResult<T> = Result<T, InputError>;

/// Raw patient data as entered in the form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientInput {
    /// Birth date (YYYY-MM-DD)
    pub birth_date: String,
    /// Completed gestational weeks at birth
    pub gestational_weeks: String,
    /// Extra gestational days at birth (0-6)
    pub gestational_days: String,
    /// Current weight in kg
    pub weight_kg: String,
}

impl PatientInput {
    /// Create an input record from the four form fields.
    pub fn new(
        birth_date: impl Into<String>,
        gestational_weeks: impl Into<String>,
        gestational_days: impl Into<String>,
        weight_kg: impl Into<String>,
    ) -> Self {
        Self {
            birth_date: birth_date.into(),
            gestational_weeks: gestational_weeks.into(),
            gestational_days: gestational_days.into(),
            weight_kg: weight_kg.into(),
        }
    }
}

/// Normalized metrics consumed by the dosage rule tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientMetrics {
    /// Birth date
    pub birth_date: NaiveDate,
    /// Instant the calculation was requested
    pub calculated_at: NaiveDateTime,
    /// Completed gestational weeks at birth
    pub gestational_weeks: u32,
    /// Extra gestational days at birth
    pub gestational_days: u32,
    /// weeks + days / 7, never rounded
    pub gestational_age_weeks: f64,
    /// Whole days between birth and `calculated_at`
    pub postnatal_age_days: u32,
    /// Current weight in kg
    pub weight_kg: f64,
}

impl PatientMetrics {
    /// Derive metrics from raw input.
    ///
    /// Every field is required. The postnatal age uses the absolute difference
    /// between the two instants, so a birth date after `now` still yields a
    /// positive age; [`PatientMetrics::check_domain`] reports that case.
    pub fn derive(input: &PatientInput, now: NaiveDateTime) -> InputResult<Self> {
        let birth_date = required(&input.birth_date, PatientField::BirthDate)?;
        let weeks = required(&input.gestational_weeks, PatientField::GestationalWeeks)?;
        let days = required(&input.gestational_days, PatientField::GestationalDays)?;
        let weight = required(&input.weight_kg, PatientField::WeightKg)?;

        let birth_date = NaiveDate::parse_from_str(birth_date, "%Y-%m-%d")
            .map_err(|_| invalid(PatientField::BirthDate, birth_date))?;
        let gestational_weeks = parse_count(weeks, PatientField::GestationalWeeks)?;
        let gestational_days = parse_count(days, PatientField::GestationalDays)?;
        let weight_kg = parse_weight(weight)?;

        Ok(Self::from_parts(
            birth_date,
            gestational_weeks,
            gestational_days,
            weight_kg,
            now,
        ))
    }

    /// Build metrics from already-parsed values.
    pub fn from_parts(
        birth_date: NaiveDate,
        gestational_weeks: u32,
        gestational_days: u32,
        weight_kg: f64,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            birth_date,
            calculated_at: now,
            gestational_weeks,
            gestational_days,
            gestational_age_weeks: gestational_weeks as f64 + gestational_days as f64 / 7.0,
            postnatal_age_days: postnatal_age_days(birth_date, now),
            weight_kg,
        }
    }

    /// Total gestational age rounded to one decimal, for display only.
    pub fn gestational_age_display(&self) -> String {
        format!("{:.1}", self.gestational_age_weeks)
    }

    /// Corrected age in weeks (postnatal weeks + gestational age - 40).
    pub fn corrected_age_weeks(&self) -> f64 {
        self.postnatal_age_days as f64 / 7.0 + self.gestational_age_weeks - TERM_WEEKS
    }

    /// Check whether the birth date lies after the calculation instant.
    pub fn is_birth_in_future(&self) -> bool {
        self.birth_date.and_time(NaiveTime::default()) > self.calculated_at
    }

    /// All range violations, in field order.
    pub fn domain_violations(&self) -> Vec<InputError> {
        let mut violations = Vec::new();

        if self.is_birth_in_future() {
            violations.push(InputError::OutOfDomain {
                field: PatientField::BirthDate,
                detail: format!(
                    "{} is after the calculation date {}",
                    self.birth_date,
                    self.calculated_at.date()
                ),
            });
        }
        if !GESTATIONAL_WEEKS_RANGE.contains(&self.gestational_weeks) {
            violations.push(InputError::OutOfDomain {
                field: PatientField::GestationalWeeks,
                detail: format!(
                    "{} not in {}-{}",
                    self.gestational_weeks,
                    GESTATIONAL_WEEKS_RANGE.start(),
                    GESTATIONAL_WEEKS_RANGE.end()
                ),
            });
        }
        if !GESTATIONAL_DAYS_RANGE.contains(&self.gestational_days) {
            violations.push(InputError::OutOfDomain {
                field: PatientField::GestationalDays,
                detail: format!(
                    "{} not in {}-{}",
                    self.gestational_days,
                    GESTATIONAL_DAYS_RANGE.start(),
                    GESTATIONAL_DAYS_RANGE.end()
                ),
            });
        }
        if !WEIGHT_KG_RANGE.contains(&self.weight_kg) {
            violations.push(InputError::OutOfDomain {
                field: PatientField::WeightKg,
                detail: format!(
                    "{} kg not in {}-{} kg",
                    self.weight_kg,
                    WEIGHT_KG_RANGE.start(),
                    WEIGHT_KG_RANGE.end()
                ),
            });
        }

        violations
    }

    /// Fail with the first range violation, if any.
    pub fn check_domain(&self) -> InputResult<()> {
        match self.domain_violations().into_iter().next() {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }
}

/// Whole days between a birth date (midnight) and `now`, in either direction.
pub fn postnatal_age_days(birth_date: NaiveDate, now: NaiveDateTime) -> u32 {
    let birth = birth_date.and_time(NaiveTime::default());
    let seconds = now.signed_duration_since(birth).num_seconds().abs();
    u32::try_from(seconds / SECONDS_PER_DAY).unwrap_or(u32::MAX)
}

fn required(value: &str, field: PatientField) -> InputResult<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InputError::MissingInput(field));
    }
    Ok(trimmed)
}

fn invalid(field: PatientField, value: &str) -> InputError {
    InputError::InvalidInput {
        field,
        value: value.to_string(),
    }
}

fn parse_count(value: &str, field: PatientField) -> InputResult<u32> {
    value.parse::<u32>().map_err(|_| invalid(field, value))
}

fn parse_weight(value: &str) -> InputResult<f64> {
    // pt-BR entry uses a decimal comma
    let weight = value
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| invalid(PatientField::WeightKg, value))?;
    if !weight.is_finite() {
        return Err(invalid(PatientField::WeightKg, value));
    }
    Ok(weight)
}
