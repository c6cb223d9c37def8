//! Builder-specific types: errors, run configuration and discovered files.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use omop2obo_types::{well_known, ClinicalDomain, ConstructionMode};
use thiserror::Error;

use crate::anchors::SuperclassAnchors;
use crate::relations::RelationTable;

/// Errors raised while parsing a logic string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogicError {
    /// A character outside the logic grammar.
    #[error("Unexpected character '{ch}' at position {position}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Byte offset in the logic string.
        position: usize,
    },

    /// An identifier that is not AND, OR or NOT.
    #[error("Unknown constructor '{name}' at position {position}")]
    UnknownConstructor {
        /// The identifier as written.
        name: String,
        /// Byte offset in the logic string.
        position: usize,
    },

    /// A constructor the caller did not declare for this string.
    #[error("Constructor '{name}' was not declared for this logic string")]
    UndeclaredConstructor {
        /// Canonical constructor name.
        name: String,
    },

    /// A term index that does not fit in `usize`.
    #[error("Invalid term index: {value}")]
    InvalidIndex {
        /// The digits as written.
        value: String,
    },

    /// A constructor call with no operands.
    #[error("Constructor {constructor} has no operands")]
    EmptyOperands {
        /// Canonical constructor name.
        constructor: String,
    },

    /// NOT applied to anything other than exactly one operand.
    #[error("NOT takes exactly one operand, found {found}")]
    ComplementArity {
        /// Number of operands found.
        found: usize,
    },

    /// A token that does not fit the grammar at this point.
    #[error("Unexpected '{found}' at position {position}, expected {expected}")]
    UnexpectedToken {
        /// The token as written.
        found: String,
        /// Byte offset in the logic string.
        position: usize,
        /// What the parser was looking for.
        expected: &'static str,
    },

    /// Constructor calls nested deeper than the parser accepts.
    #[error("Logic string nests constructors deeper than {limit} levels")]
    TooDeep {
        /// The nesting limit.
        limit: usize,
    },

    /// The string ended inside an expression.
    #[error("Unexpected end of logic string, expected {expected}")]
    UnexpectedEnd {
        /// What the parser was looking for.
        expected: &'static str,
    },
}

/// Errors that can occur while building OMOP2OBO classes.
#[derive(Error, Debug)]
pub enum TransformError {
    /// I/O error reading or writing a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// RDF parsing error.
    #[error("RDF parsing error in {path}: {source}")]
    Rdf {
        /// The file being parsed.
        path: String,
        /// The underlying parser error.
        #[source]
        source: oxrdfio::RdfParseError,
    },

    /// JSON parsing error in a configuration document.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Logic string parsing error.
    #[error("Invalid logic '{logic}' for concept {concept_id}: {source}")]
    Logic {
        /// The concept whose row carried the logic string.
        concept_id: String,
        /// The logic string.
        logic: String,
        /// The parser error.
        #[source]
        source: LogicError,
    },

    /// Invalid run configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// File exists but has no content.
    #[error("Input file is empty: {path}")]
    EmptyFile {
        /// The empty file.
        path: String,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Directory holds no ontology files.
    #[error("No ontology files found in {path}")]
    EmptyDirectory {
        /// The directory that was searched.
        path: String,
    },

    /// No file matches a requested ontology prefix.
    #[error("No ontology file for {prefix} in {directory}")]
    OntologyFileMissing {
        /// The requested prefix.
        prefix: String,
        /// The directory that was searched.
        directory: String,
    },

    /// The file extension does not name a supported RDF format.
    #[error("Unsupported ontology file format: {path}")]
    UnsupportedFormat {
        /// The file path.
        path: String,
    },

    /// Missing required column in the mapping table.
    #[error("Missing required column: {column}")]
    MissingColumn {
        /// The name of the missing column.
        column: String,
    },

    /// A plan references a term index beyond the row's term list.
    #[error("Term index {index} out of range for concept {concept_id} ({available} terms)")]
    TermIndexOutOfRange {
        /// The concept being built.
        concept_id: String,
        /// The referenced index.
        index: usize,
        /// Number of term references in the row.
        available: usize,
    },

    /// A string that is not a valid IRI or blank node label.
    #[error("Invalid IRI '{value}': {reason}")]
    InvalidIri {
        /// The offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A graph that the run needs was not loaded.
    #[error("Ontology graph not loaded: {prefix}")]
    GraphNotLoaded {
        /// The missing graph key.
        prefix: String,
    },

    /// The run was interrupted between rows.
    #[error("Run interrupted after {rows_processed} rows")]
    Interrupted {
        /// Rows completed before the interruption.
        rows_processed: usize,
    },
}

/// Result type for builder operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Configuration for one transformation run.
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Ontology prefixes to build against, in relation-lookup order.
    pub ontologies: Vec<String>,
    /// Clinical domain of the mapping table.
    pub domain: ClinicalDomain,
    /// Single- or multi-ontology construction.
    pub mode: ConstructionMode,
    /// Superclass anchors per domain.
    pub anchors: SuperclassAnchors,
    /// Inter-ontology relations, required for multi-ontology construction.
    pub relations: Option<RelationTable>,
    /// Namespace for minted class IRIs.
    pub namespace: String,
    /// Ontology whose classes are anchored by ancestor roots.
    pub rooted_ontology: String,
    /// Candidate roots for the rooted ontology, default root first.
    pub root_candidates: Vec<String>,
    /// Suffix for output file names, e.g. `_19OCT2026`.
    pub timestamp: String,
    /// Set from another thread to stop the run at the next row boundary.
    pub interrupt: Option<Arc<AtomicBool>>,
}

impl TransformConfig {
    /// Creates a configuration with default anchors, namespace and roots.
    pub fn new(ontologies: Vec<String>, domain: ClinicalDomain, mode: ConstructionMode) -> Self {
        Self {
            ontologies: ontologies
                .into_iter()
                .map(|o| o.trim().to_ascii_uppercase())
                .collect(),
            domain,
            mode,
            anchors: SuperclassAnchors::default(),
            relations: None,
            namespace: well_known::OMOP2OBO_NAMESPACE.to_string(),
            rooted_ontology: well_known::CHEBI_PREFIX.to_string(),
            root_candidates: vec![
                well_known::CHEBI_CHEMICAL_ENTITY.to_string(),
                well_known::CHEBI_SUBATOMIC_PARTICLE.to_string(),
                well_known::CHEBI_ROLE.to_string(),
            ],
            timestamp: today_timestamp(),
            interrupt: None,
        }
    }

    /// Replaces the superclass anchors.
    pub fn with_anchors(mut self, anchors: SuperclassAnchors) -> Self {
        self.anchors = anchors;
        self
    }

    /// Sets the inter-ontology relation table.
    pub fn with_relations(mut self, relations: RelationTable) -> Self {
        self.relations = Some(relations);
        self
    }

    /// Overrides the output timestamp suffix.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Installs a flag checked between rows.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Checks the configuration before any file is touched.
    pub fn validate(&self) -> TransformResult<()> {
        if self.ontologies.is_empty() {
            return Err(TransformError::Config(
                "ontology list cannot be empty".to_string(),
            ));
        }
        if let Some(bad) = self.ontologies.iter().find(|o| {
            o.is_empty() || !o.chars().all(|c| c.is_ascii_alphanumeric())
        }) {
            return Err(TransformError::Config(format!(
                "invalid ontology prefix '{}'",
                bad
            )));
        }
        if self.anchors.resolve(self.domain).is_none() {
            return Err(TransformError::Config(format!(
                "no superclass anchor configured for domain '{}'",
                self.domain
            )));
        }
        if self.mode == ConstructionMode::Multi {
            if self.relations.is_none() {
                return Err(TransformError::Config(
                    "multi-ontology construction requires a relation table".to_string(),
                ));
            }
            if self.ontologies.len() < 2 {
                tracing::warn!(
                    "multi-ontology construction requested with a single ontology ({})",
                    self.ontologies[0]
                );
            }
        }
        if !self.namespace.ends_with('/') && !self.namespace.ends_with('#') {
            return Err(TransformError::Config(format!(
                "namespace '{}' must end with '/' or '#'",
                self.namespace
            )));
        }
        Ok(())
    }

    /// Returns true if `ontology` is the ancestor-rooted ontology.
    pub fn is_rooted(&self, ontology: &str) -> bool {
        self.rooted_ontology.eq_ignore_ascii_case(ontology)
    }
}

/// Formats today's date as an output file suffix, e.g. `_19OCT2026`.
pub fn today_timestamp() -> String {
    format!("_{}", chrono::Local::now().format("%d%b%Y")).to_uppercase()
}

/// Ontology files discovered for a run, in requested order.
#[derive(Debug, Clone, Default)]
pub struct OntologyFiles {
    /// (prefix, path) pairs.
    pub files: Vec<(String, PathBuf)>,
    /// Directory the files were discovered in.
    pub directory: PathBuf,
}

impl OntologyFiles {
    /// Returns the file discovered for a prefix.
    pub fn path_for(&self, prefix: &str) -> Option<&PathBuf> {
        self.files
            .iter()
            .find(|(p, _)| p.eq_ignore_ascii_case(prefix))
            .map(|(_, path)| path)
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default)]
pub struct TransformStats {
    /// Mapping rows processed.
    pub rows: usize,
    /// Classes constructed.
    pub classes_built: usize,
    /// Classes skipped because the target graph already defines them.
    pub classes_skipped: usize,
    /// (concept, ontology) pairs with no mapped terms.
    pub rows_unmapped: usize,
    /// Inter-ontology relations added.
    pub relations_added: usize,
    /// Relation lookups with no entry in the table.
    pub relations_missing: usize,
    /// Files written.
    pub outputs: Vec<PathBuf>,
}
