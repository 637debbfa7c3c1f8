//! Reference document page index.

use serde::{Deserialize, Serialize};

/// Page shown when a name has no entry in the index.
pub const DEFAULT_REFERENCE_PAGE: u32 = 1;

/// Page of one antibiotic's monograph in the reference document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub id: String,
    pub name: String,
    pub page: u32,
}

impl ReferenceEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, page: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            page,
        }
    }
}

/// Authoritative id/name → page mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceIndex {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceIndex {
    pub fn new(entries: Vec<ReferenceEntry>) -> Self {
        Self { entries }
    }

    /// Neofax pages, including monographs without a dosage table yet.
    pub fn standard() -> Self {
        Self::new(vec![
            ReferenceEntry::new("ampicillin", "Ampicilina", 104),
            ReferenceEntry::new("gentamicin", "Gentamicina", 448),
            ReferenceEntry::new("amikacin", "Amicacina", 59),
            ReferenceEntry::new("vancomycin", "Vancomicina", 905),
            ReferenceEntry::new("cefotaxime", "Cefotaxima", 209),
            ReferenceEntry::new("meropenem", "Meropenem", 603),
            ReferenceEntry::new("piperacillin_tazobactam", "Piperacilina-Tazobactam", 770),
            ReferenceEntry::new("oxacillin", "Oxacilina", 715),
        ])
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn by_id(&self, id: &str) -> Option<&ReferenceEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&ReferenceEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Page for an id, falling back to [`DEFAULT_REFERENCE_PAGE`].
    pub fn page_for_id(&self, id: &str) -> u32 {
        self.by_id(id).map_or(DEFAULT_REFERENCE_PAGE, |e| e.page)
    }

    /// Page for a display name, falling back to [`DEFAULT_REFERENCE_PAGE`].
    pub fn page_for_name(&self, name: &str) -> u32 {
        self.by_name(name).map_or(DEFAULT_REFERENCE_PAGE, |e| e.page)
    }
}

/// A page within a reference document, handed to the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub path: String,
    pub page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups() {
        let index = ReferenceIndex::standard();
        assert_eq!(index.page_for_id("gentamicin"), 448);
        assert_eq!(index.page_for_name("Vancomicina"), 905);
        assert_eq!(index.page_for_name("Oxacilina"), 715);
    }

    #[test]
    fn test_unknown_falls_back_to_first_page() {
        let index = ReferenceIndex::standard();
        assert_eq!(index.page_for_name("Cefazolina"), DEFAULT_REFERENCE_PAGE);
        assert_eq!(index.page_for_id("cefazolin"), DEFAULT_REFERENCE_PAGE);
        assert!(index.by_id("cefazolin").is_none());
    }
}
