//! OMOP2OBO enumeration types.
//!
//! This module provides enum representations for the clinical domain of a
//! mapping run, the class construction mode, and the mapping category of a
//! row.

use std::fmt;
use std::str::FromStr;

/// Error returned when an enum value cannot be parsed from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumParseError {
    /// The kind of value that was expected.
    pub expected: &'static str,
    /// The text that failed to parse.
    pub found: String,
}

impl fmt::Display for EnumParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.found)
    }
}

impl std::error::Error for EnumParseError {}

/// Clinical domain of the mapped OMOP concepts.
///
/// # Examples
///
/// ```
/// use omop2obo_types::ClinicalDomain;
///
/// let domain: ClinicalDomain = "Condition".parse().unwrap();
/// assert_eq!(domain, ClinicalDomain::Condition);
/// assert_eq!(domain.as_str(), "condition");
/// assert!("procedure".parse::<ClinicalDomain>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ClinicalDomain {
    /// Conditions, mapped to phenotype and disease ontologies.
    Condition,
    /// Drug ingredients, mapped to chemical ontologies.
    Drug,
    /// Laboratory measurements.
    Measurement,
}

impl ClinicalDomain {
    /// All supported domains.
    pub const ALL: [ClinicalDomain; 3] = [Self::Condition, Self::Drug, Self::Measurement];

    /// Lower-case domain name as used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Condition => "condition",
            Self::Drug => "drug",
            Self::Measurement => "measurement",
        }
    }
}

impl FromStr for ClinicalDomain {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "condition" => Ok(Self::Condition),
            "drug" => Ok(Self::Drug),
            "measurement" => Ok(Self::Measurement),
            _ => Err(EnumParseError {
                expected: "clinical domain (condition, drug or measurement)",
                found: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ClinicalDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether classes are built per source ontology or across a merged graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ConstructionMode {
    /// Each ontology receives its own classes and is serialized separately.
    Single,
    /// All ontologies are merged and classes are related across them.
    #[default]
    Multi,
}

impl ConstructionMode {
    /// Lower-case mode name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multi => "multi",
        }
    }

    /// Human readable description of the construction type.
    pub fn description(self) -> &'static str {
        match self {
            Self::Single => "Single Ontology Class Construction",
            Self::Multi => "Multiple Ontology Class Construction",
        }
    }
}

impl FromStr for ConstructionMode {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "multi" => Ok(Self::Multi),
            _ => Err(EnumParseError {
                expected: "construction mode (single or multi)",
                found: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ConstructionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a concept was mapped to an ontology.
///
/// Classified from free text such as `Automatic Exact - Concept` or
/// `Manual Constructor`.
///
/// # Examples
///
/// ```
/// use omop2obo_types::MappingCategory;
///
/// assert_eq!(MappingCategory::classify("Manual Exact"), MappingCategory::Exact);
/// assert_eq!(MappingCategory::classify("MANUAL_CONSTRUCTOR"), MappingCategory::Constructor);
/// assert!(MappingCategory::classify("Manual Exact").is_equivalence());
/// assert!(!MappingCategory::classify("Cosine Similarity").is_equivalence());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MappingCategory {
    /// Exact one-to-one mapping.
    Exact,
    /// Mapping defined by a logic expression over several terms.
    Constructor,
    /// No mapping category recorded.
    Unmapped,
    /// Any other category text.
    Other(String),
}

impl MappingCategory {
    /// Classifies category text, ignoring case.
    pub fn classify(text: &str) -> Self {
        let lower = text.trim().to_ascii_lowercase();
        if lower.is_empty() {
            Self::Unmapped
        } else if lower.contains("exact") {
            Self::Exact
        } else if lower.contains("constructor") {
            Self::Constructor
        } else {
            Self::Other(text.trim().to_string())
        }
    }

    /// Returns true if the built class is equivalent to its definition
    /// rather than a subclass of it.
    pub fn is_equivalence(&self) -> bool {
        matches!(self, Self::Exact | Self::Constructor | Self::Unmapped)
    }
}
