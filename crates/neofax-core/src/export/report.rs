//! Dosing report for one patient calculation.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::catalog::Category;
use crate::dosing::format_mg;
use crate::models::{AntibioticDosing, PatientMetrics};

/// Full result of one calculation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DosingReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Echoed patient metrics
    pub patient: PatientSummary,
    /// One entry per antibiotic in the category
    pub antibiotics: Vec<AntibioticDosing>,
}

/// Report metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMetadata {
    /// Instant of the calculation (supplied by the caller)
    pub calculated_at: NaiveDateTime,
    /// Category key
    pub category: Category,
    /// Reference document path, if configured
    pub reference_document: Option<String>,
}

/// Patient data as shown above the results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientSummary {
    pub birth_date: String,
    pub gestational_weeks: u32,
    pub gestational_days: u32,
    pub gestational_age_weeks: f64,
    pub postnatal_age_days: u32,
    pub corrected_age_weeks: f64,
    pub weight_kg: f64,
}

impl From<&PatientMetrics> for PatientSummary {
    fn from(metrics: &PatientMetrics) -> Self {
        Self {
            birth_date: metrics.birth_date.to_string(),
            gestational_weeks: metrics.gestational_weeks,
            gestational_days: metrics.gestational_days,
            gestational_age_weeks: metrics.gestational_age_weeks,
            postnatal_age_days: metrics.postnatal_age_days,
            corrected_age_weeks: metrics.corrected_age_weeks(),
            weight_kg: metrics.weight_kg,
        }
    }
}

impl DosingReport {
    pub fn new(
        metrics: &PatientMetrics,
        category: Category,
        reference_document: Option<String>,
        antibiotics: Vec<AntibioticDosing>,
    ) -> Self {
        Self {
            metadata: ReportMetadata {
                calculated_at: metrics.calculated_at,
                category,
                reference_document,
            },
            patient: PatientSummary::from(metrics),
            antibiotics,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format, one row per antibiotic.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str(concat!(
            "id,name,dose_rule,interval,dose_per_administration,total_daily_dose_mg,",
            "reference_page,postnatal_age_days,gestational_age_weeks,weight_kg\n",
        ));

        // Lines
        for item in &self.antibiotics {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{:.1},{}\n",
                escape_csv(&item.id),
                escape_csv(&item.name),
                escape_csv(&item.outcome.dose_rule),
                escape_csv(&item.outcome.interval),
                escape_csv(&item.dose_per_administration),
                format_mg(item.outcome.total_daily_dose_mg),
                item.reference_page,
                self.patient.postnatal_age_days,
                self.patient.gestational_age_weeks,
                self.patient.weight_kg,
            ));
        }

        csv
    }

    /// Plain-text rendering of the results view.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DosingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.patient;

        writeln!(f, "Dados do Paciente")?;
        writeln!(f, "  Data de Nascimento: {}", p.birth_date)?;
        writeln!(f, "  Data do Cálculo: {}", self.metadata.calculated_at.date())?;
        writeln!(f, "  Idade Pós-Natal: {} dias", p.postnatal_age_days)?;
        writeln!(
            f,
            "  Idade Gestacional ao Nascimento: {} semanas e {} dias ({:.1} semanas)",
            p.gestational_weeks, p.gestational_days, p.gestational_age_weeks
        )?;
        writeln!(f, "  Idade Corrigida: {:.1} semanas", p.corrected_age_weeks)?;
        writeln!(f, "  Peso Atual: {} kg", p.weight_kg)?;
        writeln!(f)?;
        writeln!(f, "Categoria: {}", self.metadata.category.label())?;

        if self.antibiotics.is_empty() {
            writeln!(f)?;
            return writeln!(f, "Nenhum antibiótico encontrado nesta categoria.");
        }

        for item in &self.antibiotics {
            writeln!(f)?;
            writeln!(f, "== {} [{}]", item.name, item.dose_per_administration)?;
            writeln!(f, "Descrição: {}", item.description)?;
            writeln!(f, "Dosagem: {}", item.outcome.dose_rule)?;
            writeln!(f, "Intervalo: {}", item.outcome.interval)?;
            writeln!(f, "Dose por administração: {}", item.dose_per_administration)?;
            if let Some(notes) = &item.outcome.notes {
                writeln!(f, "Observações Importantes:")?;
                for line in notes.lines() {
                    writeln!(f, "  {}", line)?;
                }
            }
            match &self.metadata.reference_document {
                Some(path) => writeln!(
                    f,
                    "Referência: Neofax, página {} ({})",
                    item.reference_page, path
                )?,
                None => writeln!(f, "Referência: Neofax, página {}", item.reference_page)?,
            }
        }

        Ok(())
    }
}

/// Escape a value for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
