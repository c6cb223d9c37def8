//! Mapping rows.
//!
//! One [`MappingRow`] is one OMOP clinical concept together with, for every
//! requested ontology, the logic string and term references describing how
//! the concept maps onto that ontology.
//!
//! # Example
//!
//! ```
//! use omop2obo_types::{MappingRow, OntologyMapping};
//!
//! let mut row = MappingRow::new("22288", "Hereditary elliptocytosis");
//! row.insert_mapping(
//!     "hp",
//!     OntologyMapping {
//!         logic: "N/A".to_string(),
//!         terms: OntologyMapping::split_terms("HP_0004445"),
//!         ..OntologyMapping::default()
//!     },
//! );
//!
//! assert!(row.mapping("HP").is_some());
//! assert_eq!(row.mapping("HP").unwrap().terms.len(), 1);
//! ```

use std::collections::BTreeMap;

use crate::{MappingCategory, TermRef};

/// Per-ontology fields of a mapping row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OntologyMapping {
    /// Logic string, e.g. `AND(0, NOT(1))`.
    pub logic: String,
    /// Term references in pipe-delimited order.
    pub terms: Vec<TermRef>,
    /// Labels of the mapped terms, as recorded in the table.
    pub label: String,
    /// Mapping category text.
    pub mapping: String,
    /// Evidence supporting the mapping.
    pub evidence: String,
}

impl OntologyMapping {
    /// Splits a pipe-delimited term reference cell.
    ///
    /// Empty pieces are dropped.
    pub fn split_terms(cell: &str) -> Vec<TermRef> {
        cell.split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(TermRef::new)
            .collect()
    }

    /// Returns true if the row maps to at least one term in this ontology.
    pub fn has_terms(&self) -> bool {
        !self.terms.is_empty()
    }

    /// Classified mapping category.
    pub fn category(&self) -> MappingCategory {
        MappingCategory::classify(&self.mapping)
    }
}

/// One OMOP clinical concept with its per-ontology mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MappingRow {
    /// OMOP concept identifier.
    pub concept_id: String,
    /// OMOP concept label.
    pub concept_label: String,
    /// UMLS concept unique identifier.
    pub cui: String,
    /// UMLS semantic type.
    pub semantic_type: String,
    /// Mappings keyed by upper-case ontology prefix.
    pub mappings: BTreeMap<String, OntologyMapping>,
}

impl MappingRow {
    /// Creates a row with no CUI, semantic type or mappings.
    pub fn new(concept_id: impl Into<String>, concept_label: impl Into<String>) -> Self {
        Self {
            concept_id: concept_id.into(),
            concept_label: concept_label.into(),
            ..Self::default()
        }
    }

    /// Adds or replaces the mapping for an ontology.
    pub fn insert_mapping(&mut self, ontology: &str, mapping: OntologyMapping) {
        self.mappings.insert(ontology.to_ascii_uppercase(), mapping);
    }

    /// Returns the mapping for an ontology prefix, ignoring case.
    pub fn mapping(&self, ontology: &str) -> Option<&OntologyMapping> {
        self.mappings.get(&ontology.to_ascii_uppercase())
    }
}
