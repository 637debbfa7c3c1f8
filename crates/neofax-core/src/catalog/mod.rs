//! Antibiotic catalog.
//!
//! The catalog is built once, checked for internal consistency, and then only
//! read. Lookups are linear; the catalog is small.

mod antibiotics;
mod category;
mod reference;

pub use antibiotics::standard_antibiotics;
pub use category::*;
pub use reference::*;

use std::collections::HashSet;

use strsim::jaro_winkler;
use thiserror::Error;
use tracing::{debug, error};

use crate::dosing::{dose_mg_per_kg, interval_hours};
use crate::models::{Antibiotic, DosageLeaf};

/// Minimum similarity for a name suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.80;

/// Catalog consistency errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Duplicate antibiotic id: {0}")]
    DuplicateId(String),

    #[error("Unparsable rule token in {antibiotic}: {label:?}")]
    UnparsableRuleToken { antibiotic: String, label: String },

    #[error("Rule text {label:?} in {antibiotic} does not match value {value}")]
    RuleTokenMismatch {
        antibiotic: String,
        label: String,
        value: f64,
    },

    #[error("Non-positive dose in {antibiotic}: {label:?}")]
    NonPositiveDose { antibiotic: String, label: String },

    #[error("No reference entry for {0}")]
    MissingReference(String),

    #[error("Reference page mismatch for {id}: catalog says {declared}, index says {indexed}")]
    ReferencePageMismatch {
        id: String,
        declared: u32,
        indexed: u32,
    },

    #[error("Reference name mismatch for {id}: catalog says {declared:?}, index says {indexed:?}")]
    ReferenceNameMismatch {
        id: String,
        declared: String,
        indexed: String,
    },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Ordered, immutable collection of antibiotics.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    antibiotics: Vec<Antibiotic>,
    references: ReferenceIndex,
}

impl Catalog {
    /// The built-in Neofax catalog.
    pub fn standard() -> CatalogResult<Self> {
        Self::new(standard_antibiotics(), ReferenceIndex::standard())
    }

    /// Build a catalog, failing on the first consistency error.
    pub fn new(antibiotics: Vec<Antibiotic>, references: ReferenceIndex) -> CatalogResult<Self> {
        let catalog = Self {
            antibiotics,
            references,
        };
        if let Err(e) = catalog.validate() {
            error!(error = %e, "catalog self-check failed");
            return Err(e);
        }
        debug!(entries = catalog.antibiotics.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Run the self-check: unique ids, rule text agreeing with rule values,
    /// and reference pages agreeing with the index.
    pub fn validate(&self) -> CatalogResult<()> {
        let mut seen = HashSet::new();

        for antibiotic in &self.antibiotics {
            if !seen.insert(antibiotic.id.as_str()) {
                return Err(CatalogError::DuplicateId(antibiotic.id.clone()));
            }
            for leaf in antibiotic.rules.leaves() {
                check_leaf(&antibiotic.id, leaf)?;
            }
            self.check_reference(antibiotic)?;
        }

        Ok(())
    }

    fn check_reference(&self, antibiotic: &Antibiotic) -> CatalogResult<()> {
        let entry = self
            .references
            .by_id(&antibiotic.id)
            .ok_or_else(|| CatalogError::MissingReference(antibiotic.id.clone()))?;

        if entry.page != antibiotic.reference_page {
            return Err(CatalogError::ReferencePageMismatch {
                id: antibiotic.id.clone(),
                declared: antibiotic.reference_page,
                indexed: entry.page,
            });
        }
        if entry.name != antibiotic.name {
            return Err(CatalogError::ReferenceNameMismatch {
                id: antibiotic.id.clone(),
                declared: antibiotic.name.clone(),
                indexed: entry.name.clone(),
            });
        }
        Ok(())
    }

    pub fn antibiotics(&self) -> &[Antibiotic] {
        &self.antibiotics
    }

    pub fn iter(&self) -> impl Iterator<Item = &Antibiotic> {
        self.antibiotics.iter()
    }

    pub fn len(&self) -> usize {
        self.antibiotics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.antibiotics.is_empty()
    }

    pub fn references(&self) -> &ReferenceIndex {
        &self.references
    }

    /// Look up by id.
    pub fn get(&self, id: &str) -> Option<&Antibiotic> {
        self.antibiotics.iter().find(|a| a.id == id)
    }

    /// Look up by display name, exact first, then ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<&Antibiotic> {
        if let Some(found) = self.antibiotics.iter().find(|a| a.name == name) {
            return Some(found);
        }
        let lower = name.trim().to_lowercase();
        self.antibiotics
            .iter()
            .find(|a| a.name.to_lowercase() == lower)
    }

    /// Closest entry by id or name, if similar enough.
    pub fn suggest(&self, query: &str) -> Option<&Antibiotic> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        self.antibiotics
            .iter()
            .map(|a| {
                let score = jaro_winkler(&query, &a.name.to_lowercase())
                    .max(jaro_winkler(&query, &a.id.to_lowercase()));
                (a, score)
            })
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(a, _)| a)
    }

    /// Entries in a category, in catalog order.
    pub fn filter(&self, category: Category) -> Vec<&Antibiotic> {
        self.antibiotics
            .iter()
            .filter(|a| category.contains(&a.id))
            .collect()
    }

    /// Reference page for a display name (page 1 if unknown).
    pub fn reference_page_for_name(&self, name: &str) -> u32 {
        self.references.page_for_name(name)
    }

    /// Reference location for a display name within a document.
    pub fn document_ref(&self, name: &str, path: impl Into<String>) -> DocumentRef {
        DocumentRef {
            path: path.into(),
            page: self.reference_page_for_name(name),
        }
    }
}

fn check_leaf(antibiotic: &str, leaf: &DosageLeaf) -> CatalogResult<()> {
    let unparsable = |label: &str| CatalogError::UnparsableRuleToken {
        antibiotic: antibiotic.to_string(),
        label: label.to_string(),
    };

    let dose = dose_mg_per_kg(leaf.dose.label).map_err(|_| unparsable(leaf.dose.label))?;
    if !(leaf.dose.mg_per_kg.is_finite() && leaf.dose.mg_per_kg > 0.0) {
        return Err(CatalogError::NonPositiveDose {
            antibiotic: antibiotic.to_string(),
            label: leaf.dose.label.to_string(),
        });
    }
    if dose != leaf.dose.mg_per_kg {
        return Err(CatalogError::RuleTokenMismatch {
            antibiotic: antibiotic.to_string(),
            label: leaf.dose.label.to_string(),
            value: leaf.dose.mg_per_kg,
        });
    }

    let hours = interval_hours(leaf.interval.label).map_err(|_| unparsable(leaf.interval.label))?;
    if hours != leaf.interval.hours {
        return Err(CatalogError::RuleTokenMismatch {
            antibiotic: antibiotic.to_string(),
            label: leaf.interval.label.to_string(),
            value: leaf.interval.hours as f64,
        });
    }

    Ok(())
}
