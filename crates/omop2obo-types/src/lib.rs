//! # omop2obo-types
//!
//! Type definitions for OMOP2OBO semantic mapping representation.
//!
//! This crate provides the data structures shared by the class construction
//! engine: mapping rows, the parsed logic expression tree, construction plans,
//! and well-known ontology IRIs.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   Disable this feature for zero-dependency usage.
//!
//! ## Usage
//!
//! ```rust
//! use omop2obo_types::{ClinicalDomain, ConstructionPlan, Constructor, LogicExpr, TermRef};
//! use omop2obo_types::well_known;
//!
//! // NOT(0)
//! let expr = LogicExpr::call(Constructor::Not, vec![LogicExpr::Term(0)]);
//! let plan = ConstructionPlan::from_exprs(&[expr]);
//! assert_eq!(plan.to_pairs(), vec![("NOT", "0".to_string())]);
//!
//! let anchor = TermRef::new("CHEBI_24431");
//! assert_eq!(anchor.iri(), well_known::CHEBI_CHEMICAL_ENTITY);
//! assert_eq!(ClinicalDomain::Drug.as_str(), "drug");
//! ```

#![warn(missing_docs)]

mod constructor;
mod enums;
mod mapping;
mod plan;
mod term;
pub mod well_known;

// Re-export all public types at crate root
pub use constructor::{Constructor, LogicExpr};
pub use enums::{ClinicalDomain, ConstructionMode, EnumParseError, MappingCategory};
pub use mapping::{MappingRow, OntologyMapping};
pub use plan::{ConstructionPlan, Operand, PlanStep};
pub use term::TermRef;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_are_exported() {
        let _constructor = Constructor::And;
        let _domain = ClinicalDomain::Condition;
        let _mode = ConstructionMode::Single;
        let _category = MappingCategory::Exact;
        let _operand = Operand::Term(0);
        let _term = TermRef::new("HP_0000118");
    }

    #[test]
    fn test_well_known_accessible() {
        assert_eq!(
            well_known::MONDO_DISEASE,
            "http://purl.obolibrary.org/obo/MONDO_0000001"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let expr = LogicExpr::call(
            Constructor::And,
            vec![LogicExpr::Term(0), LogicExpr::call(Constructor::Not, vec![LogicExpr::Term(1)])],
        );
        let plan = ConstructionPlan::from_exprs(&[expr]);

        let json = serde_json::to_string(&plan).unwrap();
        let parsed: ConstructionPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(plan, parsed);

        let json = serde_json::to_string(&ClinicalDomain::Measurement).unwrap();
        assert_eq!(json, "\"measurement\"");
    }
}
