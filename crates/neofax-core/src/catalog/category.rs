//! Hand-maintained antibiotic categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A filter over the catalog. Membership is a fixed list of ids, not derived
/// from any antibiotic attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Every catalog entry in catalog order
    #[default]
    All,
    Common,
    Resistant,
    Aminoglycosides,
}

impl Category {
    pub const VALUES: [Category; 4] = [
        Category::All,
        Category::Common,
        Category::Resistant,
        Category::Aminoglycosides,
    ];

    /// Stable key used in configuration and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Common => "common",
            Category::Resistant => "resistant",
            Category::Aminoglycosides => "aminoglycosides",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "Todos",
            Category::Common => "Mais Comuns",
            Category::Resistant => "Infecções Resistentes",
            Category::Aminoglycosides => "Aminoglicosídeos",
        }
    }

    /// Member ids, or `None` for [`Category::All`].
    ///
    /// May name antibiotics that have no catalog entry yet (oxacillin).
    pub fn members(&self) -> Option<&'static [&'static str]> {
        match self {
            Category::All => None,
            Category::Common => Some(&["ampicillin", "gentamicin", "cefotaxime"]),
            Category::Resistant => Some(&[
                "vancomycin",
                "meropenem",
                "piperacillin_tazobactam",
                "oxacillin",
            ]),
            Category::Aminoglycosides => Some(&["gentamicin", "amikacin"]),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        match self.members() {
            None => true,
            Some(ids) => ids.contains(&id),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Unknown category key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category: {0} (expected one of: all, common, resistant, aminoglycosides)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Category::VALUES
            .into_iter()
            .find(|category| category.key() == key)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("all".parse::<Category>(), Ok(Category::All));
        assert_eq!("Common".parse::<Category>(), Ok(Category::Common));
        assert_eq!(" resistant ".parse::<Category>(), Ok(Category::Resistant));
        assert_eq!(
            "aminoglycosides".parse::<Category>(),
            Ok(Category::Aminoglycosides)
        );
        assert!("betalactams".parse::<Category>().is_err());
    }

    #[test]
    fn test_all_contains_everything() {
        assert!(Category::All.contains("anything"));
        assert!(Category::All.members().is_none());
    }

    #[test]
    fn test_membership() {
        assert!(Category::Common.contains("cefotaxime"));
        assert!(!Category::Common.contains("amikacin"));
        assert!(Category::Resistant.contains("oxacillin"));
        assert!(Category::Aminoglycosides.contains("gentamicin"));
        assert!(!Category::Aminoglycosides.contains("vancomycin"));
    }

    #[test]
    fn test_key_round_trip() {
        for category in Category::VALUES {
            assert_eq!(category.to_string().parse::<Category>(), Ok(category));
        }
    }
}
