//! # omop2obo-builder
//!
//! Builds OWL class definitions for OMOP clinical concepts from OMOP2OBO
//! mapping tables.
//!
//! Each mapping row carries, per ontology, a logic string such as
//! `AND(OR(0, 1), 2)` and the term references it indexes. The builder parses
//! the logic into a [`ConstructionPlan`](omop2obo_types::ConstructionPlan),
//! emits the matching intersection/union/complement class expressions, anchors
//! the new class under its domain's superclass and, for multi-ontology runs,
//! links the classes built from different ontologies through a relation table.
//!
//! ## Features
//!
//! - `parallel` (default): parse ontology files concurrently with rayon.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use omop2obo_builder::{RelationTable, TransformConfig, Transformer};
//! use omop2obo_types::{ClinicalDomain, ConstructionMode};
//!
//! let config = TransformConfig::new(
//!     vec!["HP".to_string(), "MONDO".to_string()],
//!     ClinicalDomain::Condition,
//!     ConstructionMode::Multi,
//! )
//! .with_relations(RelationTable::from_path("resources/relations.csv")?);
//!
//! let stats = Transformer::load(config, "condition_mappings.csv", "resources/ontologies")?
//!     .run("output")?;
//! println!("{} classes built", stats.classes_built);
//! # Ok::<(), omop2obo_builder::TransformError>(())
//! ```

#![warn(missing_docs)]

pub mod anchors;
pub mod constructor;
pub mod loader;
pub mod logic;
pub mod ontology;
pub mod parser;
pub mod relations;
pub mod strategy;
pub mod types;
mod vocab;

pub use anchors::{AnchorEntry, SuperclassAnchors};
pub use constructor::{read_expression, ClassConstructor, RootNodes};
pub use loader::discover_ontology_files;
pub use ontology::{OntologyGraph, OntologySet, MERGED_KEY};
pub use parser::{load_mapping_rows, MappingParser};
pub use relations::RelationTable;
pub use strategy::{RunState, Transformer};
pub use types::{
    LogicError, OntologyFiles, TransformConfig, TransformError, TransformResult, TransformStats,
};

// Re-export omop2obo-types for convenience
pub use omop2obo_types;
