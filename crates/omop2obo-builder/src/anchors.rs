//! Superclass anchors.
//!
//! Every class built for a clinical domain is declared a subclass of an
//! existing ontology term. A domain maps either to a single anchor or to one
//! anchor per subtype, e.g. conditions are anchored under a phenotype root in
//! HP and a disease root in MONDO.
//!
//! Custom tables are JSON objects:
//!
//! ```json
//! {
//!   "condition": {"phenotype": "HP_0000118", "disease": "MONDO_0000001"},
//!   "drug": "CHEBI_24431",
//!   "measurement": "HP_0000118"
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use omop2obo_types::{well_known, ClinicalDomain, TermRef};
use serde_json::Value;

use crate::types::{TransformError, TransformResult};

/// The anchor configured for one clinical domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorEntry {
    /// One anchor for every ontology.
    Single(TermRef),
    /// One anchor per subtype (subtype name to term).
    BySubtype(BTreeMap<String, TermRef>),
}

/// Superclass anchors keyed by clinical domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperclassAnchors {
    entries: HashMap<ClinicalDomain, AnchorEntry>,
}

impl Default for SuperclassAnchors {
    fn default() -> Self {
        let mut condition = BTreeMap::new();
        condition.insert(
            "phenotype".to_string(),
            TermRef::new(well_known::HP_PHENOTYPIC_ABNORMALITY),
        );
        condition.insert(
            "disease".to_string(),
            TermRef::new(well_known::MONDO_DISEASE),
        );

        let mut entries = HashMap::new();
        entries.insert(ClinicalDomain::Condition, AnchorEntry::BySubtype(condition));
        entries.insert(
            ClinicalDomain::Drug,
            AnchorEntry::Single(TermRef::new(well_known::CHEBI_CHEMICAL_ENTITY)),
        );
        entries.insert(
            ClinicalDomain::Measurement,
            AnchorEntry::Single(TermRef::new(well_known::HP_PHENOTYPIC_ABNORMALITY)),
        );

        Self { entries }
    }
}

impl SuperclassAnchors {
    /// Creates an empty table.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Builds a table from a JSON object.
    ///
    /// # Errors
    /// Returns a configuration error if the document, or any per-domain value
    /// that is not a string, is not an object, or a key is not a known domain.
    pub fn from_json(value: &Value) -> TransformResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            TransformError::Config("superclasses must be a mapping of domain to anchor".to_string())
        })?;

        let mut anchors = Self::empty();
        for (key, entry) in object {
            let domain = key
                .parse::<ClinicalDomain>()
                .map_err(|e| TransformError::Config(e.to_string()))?;

            let entry = match entry {
                Value::String(term) => AnchorEntry::Single(TermRef::new(term)),
                Value::Object(subtypes) => {
                    let mut map = BTreeMap::new();
                    for (subtype, term) in subtypes {
                        let term = term.as_str().ok_or_else(|| {
                            TransformError::Config(format!(
                                "anchor for {}.{} must be a string",
                                key, subtype
                            ))
                        })?;
                        map.insert(subtype.to_ascii_lowercase(), TermRef::new(term));
                    }
                    AnchorEntry::BySubtype(map)
                }
                _ => {
                    return Err(TransformError::Config(format!(
                        "anchor for {} must be a string or a mapping",
                        key
                    )))
                }
            };
            anchors.entries.insert(domain, entry);
        }

        Ok(anchors)
    }

    /// Reads a JSON anchor table from a file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> TransformResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TransformError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let value: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        Self::from_json(&value)
    }

    /// Sets the anchor entry for a domain.
    pub fn insert(&mut self, domain: ClinicalDomain, entry: AnchorEntry) {
        self.entries.insert(domain, entry);
    }

    /// Returns the anchor entry for a domain.
    pub fn resolve(&self, domain: ClinicalDomain) -> Option<&AnchorEntry> {
        self.entries.get(&domain)
    }

    /// Picks the anchor for classes built from `ontology`.
    ///
    /// For per-subtype entries, the subtype whose anchor term carries the
    /// ontology's prefix is chosen.
    pub fn anchor_for(&self, domain: ClinicalDomain, ontology: &str) -> Option<&TermRef> {
        match self.resolve(domain)? {
            AnchorEntry::Single(term) => Some(term),
            AnchorEntry::BySubtype(map) => map.values().find(|t| t.has_prefix(ontology)),
        }
    }

    /// Category of classes built from `ontology`, used to key relations.
    ///
    /// The subtype name for per-subtype entries; otherwise the lower-cased
    /// ontology prefix.
    pub fn category_for(&self, domain: ClinicalDomain, ontology: &str) -> String {
        if let Some(AnchorEntry::BySubtype(map)) = self.resolve(domain) {
            if let Some((subtype, _)) = map.iter().find(|(_, t)| t.has_prefix(ontology)) {
                return subtype.clone();
            }
        }
        ontology.to_ascii_lowercase()
    }
}
