//! Requisite catalog for the enlistment level.

use serde::{Deserialize, Serialize};

/// One collectible kind: stable identifier plus the text shown on pickup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub label: String,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// (id, label) for every requisite, in placement order.
const REQUISITES: [(&str, &str); 11] = [
    ("dpi", "Identity document (original and copy)"),
    ("dpi_beneficiary", "Photocopy of the beneficiary's ID."),
    ("ornato", "Municipal tax receipt."),
    ("penales", "Criminal record certificate (current)"),
    ("policiacos", "Police record certificate (current)."),
    ("pulmones", "Lung health card."),
    ("hematologia", "Complete blood count."),
    ("examen_orina", "Stool and urine test."),
    ("toxicologico", "Toxicology screening."),
    ("nit", "Tax ID number."),
    ("embarazo", "Pregnancy test for female personnel."),
];

/// The default catalog.
pub fn default_catalog() -> Vec<CatalogEntry> {
    REQUISITES
        .iter()
        .map(|(id, label)| CatalogEntry::new(*id, *label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_catalog_has_eleven_unique_items() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 11);

        let ids: HashSet<_> = catalog.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), 11);
        assert!(catalog.iter().all(|e| !e.label.is_empty()));
    }

    #[test]
    fn test_default_catalog_order() {
        let catalog = default_catalog();
        assert_eq!(catalog[0].id, "dpi");
        assert_eq!(catalog[10].id, "embarazo");
    }
}
