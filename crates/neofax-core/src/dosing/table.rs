//! First-match-wins dosage rule tables.
//!
//! A table is an ordered list of `criteria → leaf` entries followed by a
//! mandatory fallback leaf, so evaluation is total for every numeric input.

use std::fmt;

use serde::Serialize;

use super::format_mg;
use crate::models::{DosageLeaf, DosageOutcome};

/// Bound on a single patient metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Bound {
    Any,
    /// value ≤ limit
    AtMost(f64),
    /// value < limit
    Below(f64),
    /// value ≥ limit
    AtLeast(f64),
    /// value > limit
    Above(f64),
}

impl Bound {
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            Bound::Any => true,
            Bound::AtMost(limit) => value <= limit,
            Bound::Below(limit) => value < limit,
            Bound::AtLeast(limit) => value >= limit,
            Bound::Above(limit) => value > limit,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Bound::Any)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Any => write!(f, "qualquer"),
            Bound::AtMost(limit) => write!(f, "≤ {}", limit),
            Bound::Below(limit) => write!(f, "< {}", limit),
            Bound::AtLeast(limit) => write!(f, "≥ {}", limit),
            Bound::Above(limit) => write!(f, "> {}", limit),
        }
    }
}

/// Conjunction of bounds over weight, gestational age and postnatal age.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Criteria {
    pub weight_kg: Bound,
    pub gestational_age_weeks: Bound,
    pub postnatal_age_days: Bound,
}

impl Criteria {
    /// Matches every input.
    pub const ANY: Criteria = Criteria {
        weight_kg: Bound::Any,
        gestational_age_weeks: Bound::Any,
        postnatal_age_days: Bound::Any,
    };

    pub const fn weight(bound: Bound) -> Self {
        Self { weight_kg: bound, ..Self::ANY }
    }

    pub const fn ga(bound: Bound) -> Self {
        Self { gestational_age_weeks: bound, ..Self::ANY }
    }

    pub const fn pna(bound: Bound) -> Self {
        Self { postnatal_age_days: bound, ..Self::ANY }
    }

    pub const fn and_weight(self, bound: Bound) -> Self {
        Self { weight_kg: bound, ..self }
    }

    pub const fn and_ga(self, bound: Bound) -> Self {
        Self { gestational_age_weeks: bound, ..self }
    }

    pub const fn and_pna(self, bound: Bound) -> Self {
        Self { postnatal_age_days: bound, ..self }
    }

    pub fn matches(
        &self,
        weight_kg: f64,
        gestational_age_weeks: f64,
        postnatal_age_days: u32,
    ) -> bool {
        self.weight_kg.contains(weight_kg)
            && self.gestational_age_weeks.contains(gestational_age_weeks)
            && self.postnatal_age_days.contains(postnatal_age_days as f64)
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.gestational_age_weeks.is_any() {
            parts.push(format!("IG {} sem", self.gestational_age_weeks));
        }
        if !self.postnatal_age_days.is_any() {
            parts.push(format!("IPN {} dias", self.postnatal_age_days));
        }
        if !self.weight_kg.is_any() {
            parts.push(format!("peso {}", self.weight_kg));
        }
        if parts.is_empty() {
            return f.write_str("demais casos");
        }
        f.write_str(&parts.join(" e "))
    }
}

/// One row of a rule table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RuleEntry {
    pub when: Criteria,
    pub then: DosageLeaf,
}

/// Fixed advisory text around the computed total daily dose line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoteTemplate {
    /// Text before the total line (ends with a newline when present)
    pub preface: &'static str,
    /// Label of the total line, e.g. "Dose total diária"
    pub total_label: &'static str,
    /// Text right after "mg/dia" on the total line
    pub total_suffix: &'static str,
    /// Text after the total line
    pub addendum: &'static str,
}

impl NoteTemplate {
    pub const fn new(
        preface: &'static str,
        total_label: &'static str,
        total_suffix: &'static str,
        addendum: &'static str,
    ) -> Self {
        Self {
            preface,
            total_label,
            total_suffix,
            addendum,
        }
    }

    /// Only the total daily dose line.
    pub const fn total_only(total_label: &'static str) -> Self {
        Self::new("", total_label, "", "")
    }

    pub fn render(&self, total_daily_dose_mg: f64) -> String {
        format!(
            "{}{}: {} mg/dia{}{}",
            self.preface,
            self.total_label,
            format_mg(total_daily_dose_mg),
            self.total_suffix,
            self.addendum
        )
    }
}

/// Ordered decision table for one antibiotic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleTable {
    entries: Vec<RuleEntry>,
    fallback: DosageLeaf,
    notes: NoteTemplate,
}

impl RuleTable {
    /// Start a table whose outcomes use the given notes.
    pub fn builder(notes: NoteTemplate) -> RuleTableBuilder {
        RuleTableBuilder {
            entries: Vec::new(),
            notes,
        }
    }

    /// Leaf of the first matching entry, or the fallback.
    pub fn select(
        &self,
        weight_kg: f64,
        gestational_age_weeks: f64,
        postnatal_age_days: u32,
    ) -> &DosageLeaf {
        self.entries
            .iter()
            .find(|entry| {
                entry
                    .when
                    .matches(weight_kg, gestational_age_weeks, postnatal_age_days)
            })
            .map(|entry| &entry.then)
            .unwrap_or(&self.fallback)
    }

    /// Evaluate the table and compose the outcome with its notes.
    pub fn evaluate(
        &self,
        weight_kg: f64,
        gestational_age_weeks: f64,
        postnatal_age_days: u32,
    ) -> DosageOutcome {
        let leaf = self.select(weight_kg, gestational_age_weeks, postnatal_age_days);
        let total = leaf.total_daily_dose_mg(weight_kg);

        DosageOutcome {
            dose_rule: leaf.dose.label.to_string(),
            dose_mg_per_kg: leaf.dose.mg_per_kg,
            interval: leaf.interval.label.to_string(),
            interval_hours: leaf.interval.hours,
            total_daily_dose_mg: total,
            notes: Some(self.notes.render(total)),
        }
    }

    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    pub fn fallback(&self) -> &DosageLeaf {
        &self.fallback
    }

    pub fn notes(&self) -> &NoteTemplate {
        &self.notes
    }

    /// Every leaf in evaluation order, fallback last.
    pub fn leaves(&self) -> impl Iterator<Item = &DosageLeaf> {
        self.entries
            .iter()
            .map(|entry| &entry.then)
            .chain(std::iter::once(&self.fallback))
    }
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(
                f,
                "{}: {} a cada {}",
                entry.when, entry.then.dose.label, entry.then.interval.label
            )?;
        }
        write!(
            f,
            "{}: {} a cada {}",
            Criteria::ANY,
            self.fallback.dose.label,
            self.fallback.interval.label
        )
    }
}

/// Builder that only yields a table once a fallback leaf is given.
#[derive(Debug, Clone)]
pub struct RuleTableBuilder {
    entries: Vec<RuleEntry>,
    notes: NoteTemplate,
}

impl RuleTableBuilder {
    pub fn when(mut self, when: Criteria, then: DosageLeaf) -> Self {
        self.entries.push(RuleEntry { when, then });
        self
    }

    pub fn otherwise(self, fallback: DosageLeaf) -> RuleTable {
        RuleTable {
            entries: self.entries,
            fallback,
            notes: self.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DoseRule, Interval};

    const DOSE: DoseRule = DoseRule::new(20.0, "20 mg/kg/dose");
    const Q8H: Interval = Interval::new(8, "8 horas");
    const Q12H: Interval = Interval::new(12, "12 horas");
    const Q24H: Interval = Interval::new(24, "24 horas");

    fn table() -> RuleTable {
        RuleTable::builder(NoteTemplate::new("Antes.\n", "Dose total diária", "", "\nDepois."))
            .when(
                Criteria::ga(Bound::Below(32.0)).and_pna(Bound::AtMost(14.0)),
                DosageLeaf::new(DOSE, Q24H),
            )
            .when(Criteria::weight(Bound::Below(1.2)), DosageLeaf::new(DOSE, Q12H))
            .otherwise(DosageLeaf::new(DOSE, Q8H))
    }

    #[test]
    fn test_bounds() {
        assert!(Bound::AtMost(29.0).contains(29.0));
        assert!(!Bound::AtMost(29.0).contains(29.1));
        assert!(!Bound::Below(14.0).contains(14.0));
        assert!(Bound::AtLeast(14.0).contains(14.0));
        assert!(!Bound::Above(7.0).contains(7.0));
        assert!(Bound::Any.contains(f64::MAX));
    }

    #[test]
    fn test_first_match_wins() {
        let table = table();
        // Matches both the first and second entries
        assert_eq!(table.select(1.0, 30.0, 3).interval.hours, 24);
        assert_eq!(table.select(1.0, 33.0, 3).interval.hours, 12);
        assert_eq!(table.select(2.0, 33.0, 3).interval.hours, 8);
    }

    #[test]
    fn test_fallback_for_out_of_range_inputs() {
        let table = table();
        assert_eq!(table.select(5.0, 100.0, u32::MAX).interval.hours, 8);
        // Any weight below 1.2 kg, however implausible, still hits its band.
        assert_eq!(table.select(-5.0, 100.0, u32::MAX).interval.hours, 12);
    }

    #[test]
    fn test_notes_layout() {
        let outcome = table().evaluate(2.0, 30.0, 3);
        assert_eq!(
            outcome.notes.as_deref(),
            Some("Antes.\nDose total diária: 40.0 mg/dia\nDepois.")
        );
    }

    #[test]
    fn test_leaves_in_order() {
        let hours: Vec<u32> = table().leaves().map(|leaf| leaf.interval.hours).collect();
        assert_eq!(hours, vec![24, 12, 8]);
    }

    #[test]
    fn test_display() {
        let text = table().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "IG < 32 sem e IPN ≤ 14 dias: 20 mg/kg/dose a cada 24 horas");
        assert_eq!(lines[1], "peso < 1.2: 20 mg/kg/dose a cada 12 horas");
        assert_eq!(lines[2], "demais casos: 20 mg/kg/dose a cada 8 horas");
    }
}
