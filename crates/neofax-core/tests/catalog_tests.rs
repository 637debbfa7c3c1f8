//! Catalog integration tests.

use std::collections::HashSet;

use neofax_core::catalog::{standard_antibiotics, ReferenceEntry, DEFAULT_REFERENCE_PAGE};
use neofax_core::{Catalog, CatalogError, Category, ReferenceIndex};

fn ids(catalog: &Catalog, category: Category) -> Vec<String> {
    catalog
        .filter(category)
        .into_iter()
        .map(|a| a.id.clone())
        .collect()
}

#[test]
fn test_ids_are_unique() {
    let catalog = Catalog::standard().unwrap();
    let unique: HashSet<&str> = catalog.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(unique.len(), catalog.len());
}

#[test]
fn test_all_keeps_catalog_order() {
    let catalog = Catalog::standard().unwrap();
    assert_eq!(
        ids(&catalog, Category::All),
        [
            "ampicillin",
            "gentamicin",
            "amikacin",
            "vancomycin",
            "cefotaxime",
            "meropenem",
            "piperacillin_tazobactam",
        ]
    );
}

#[test]
fn test_category_membership() {
    let catalog = Catalog::standard().unwrap();
    assert_eq!(
        ids(&catalog, Category::Common),
        ["ampicillin", "gentamicin", "cefotaxime"]
    );
    // Oxacillin is listed but has no catalog entry.
    assert_eq!(
        ids(&catalog, Category::Resistant),
        ["vancomycin", "meropenem", "piperacillin_tazobactam"]
    );
    assert_eq!(
        ids(&catalog, Category::Aminoglycosides),
        ["gentamicin", "amikacin"]
    );
}

#[test]
fn test_filtered_subsets_preserve_order() {
    let catalog = Catalog::standard().unwrap();
    let all = ids(&catalog, Category::All);

    for category in Category::VALUES {
        let subset = ids(&catalog, category);
        let positions: Vec<usize> = subset
            .iter()
            .map(|id| all.iter().position(|a| a == id).unwrap())
            .collect();
        assert!(
            positions.windows(2).all(|w| w[0] < w[1]),
            "{} out of order",
            category
        );
    }
}

#[test]
fn test_reference_pages() {
    let catalog = Catalog::standard().unwrap();
    let pages: Vec<(&str, u32)> = catalog
        .iter()
        .map(|a| (a.name.as_str(), a.reference_page))
        .collect();

    assert_eq!(
        pages,
        [
            ("Ampicilina", 104),
            ("Gentamicina", 448),
            ("Amicacina", 59),
            ("Vancomicina", 905),
            ("Cefotaxima", 209),
            ("Meropenem", 603),
            ("Piperacilina-Tazobactam", 770),
        ]
    );

    for antibiotic in catalog.iter() {
        assert_eq!(
            catalog.reference_page_for_name(&antibiotic.name),
            antibiotic.reference_page
        );
    }
    assert_eq!(catalog.reference_page_for_name("Oxacilina"), 715);
    assert_eq!(
        catalog.reference_page_for_name("Cefazolina"),
        DEFAULT_REFERENCE_PAGE
    );
}

#[test]
fn test_stale_index_fails_fast() {
    let mut entries = ReferenceIndex::standard().entries().to_vec();
    for entry in entries.iter_mut().filter(|e| e.id == "vancomycin") {
        *entry = ReferenceEntry::new("vancomycin", "Vancomicina", 891);
    }

    let result = Catalog::new(standard_antibiotics(), ReferenceIndex::new(entries));
    assert_eq!(
        result,
        Err(CatalogError::ReferencePageMismatch {
            id: "vancomycin".into(),
            declared: 905,
            indexed: 891,
        })
    );
}

#[test]
fn test_every_entry_has_text() {
    let catalog = Catalog::standard().unwrap();
    for antibiotic in catalog.iter() {
        assert!(!antibiotic.name.is_empty());
        assert!(antibiotic.description.ends_with('.'), "{}", antibiotic.id);
        assert!(antibiotic.reference_page > 0);
    }
}
