//! Well-known namespaces and term IRIs.
//!
//! This module provides the vocabulary the class constructor writes and the
//! default superclass anchors for each clinical domain.
//!
//! # Examples
//!
//! ```
//! use omop2obo_types::well_known;
//!
//! assert!(well_known::HP_PHENOTYPIC_ABNORMALITY.starts_with(well_known::OBO_NAMESPACE));
//! assert_eq!(well_known::CHEBI_CHEMICAL_ENTITY, "http://purl.obolibrary.org/obo/CHEBI_24431");
//! ```

// =============================================================================
// Namespaces
// =============================================================================

/// OBO Foundry PURL namespace.
pub const OBO_NAMESPACE: &str = "http://purl.obolibrary.org/obo/";

/// oboInOwl annotation namespace.
pub const OBO_IN_OWL_NAMESPACE: &str = "http://www.geneontology.org/formats/oboInOwl#";

/// Namespace for classes and annotation properties minted by OMOP2OBO.
pub const OMOP2OBO_NAMESPACE: &str = "https://github.com/callahantiff/omop2obo/obo/ext/";

/// OWL namespace.
pub const OWL_NAMESPACE: &str = "http://www.w3.org/2002/07/owl#";

/// RDF namespace.
pub const RDF_NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// RDFS namespace.
pub const RDFS_NAMESPACE: &str = "http://www.w3.org/2000/01/rdf-schema#";

// =============================================================================
// RDF / RDFS / OWL vocabulary
// =============================================================================

/// rdf:type
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// rdf:first
pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
/// rdf:rest
pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
/// rdf:nil
pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";

/// rdfs:label
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
/// rdfs:subClassOf
pub const RDFS_SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

/// owl:Class
pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
/// owl:Restriction
pub const OWL_RESTRICTION: &str = "http://www.w3.org/2002/07/owl#Restriction";
/// owl:equivalentClass
pub const OWL_EQUIVALENT_CLASS: &str = "http://www.w3.org/2002/07/owl#equivalentClass";
/// owl:intersectionOf
pub const OWL_INTERSECTION_OF: &str = "http://www.w3.org/2002/07/owl#intersectionOf";
/// owl:unionOf
pub const OWL_UNION_OF: &str = "http://www.w3.org/2002/07/owl#unionOf";
/// owl:complementOf
pub const OWL_COMPLEMENT_OF: &str = "http://www.w3.org/2002/07/owl#complementOf";
/// owl:onProperty
pub const OWL_ON_PROPERTY: &str = "http://www.w3.org/2002/07/owl#onProperty";
/// owl:someValuesFrom
pub const OWL_SOME_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#someValuesFrom";

/// oboInOwl:id
pub const OBO_IN_OWL_ID: &str = "http://www.geneontology.org/formats/oboInOwl#id";
/// oboInOwl:hasDbXref
pub const OBO_IN_OWL_HAS_DB_XREF: &str = "http://www.geneontology.org/formats/oboInOwl#hasDbXref";

// =============================================================================
// OMOP2OBO annotation properties
// =============================================================================

/// Mapping category of the row (exact, constructor, ...).
pub const MAPPING_CATEGORY: &str = "https://github.com/callahantiff/omop2obo/obo/ext/mappingCategory";
/// Evidence string supporting the mapping.
pub const MAPPING_EVIDENCE: &str = "https://github.com/callahantiff/omop2obo/obo/ext/mappingEvidence";
/// UMLS semantic type of the clinical concept.
pub const SEMANTIC_TYPE: &str = "https://github.com/callahantiff/omop2obo/obo/ext/semanticType";
/// Labels of the ontology terms the concept was mapped to.
pub const ONTOLOGY_LABEL: &str = "https://github.com/callahantiff/omop2obo/obo/ext/ontologyLabel";

// =============================================================================
// Default superclass anchors
// =============================================================================

/// Phenotypic abnormality (HP_0000118).
///
/// Anchor for condition phenotypes and for measurements.
pub const HP_PHENOTYPIC_ABNORMALITY: &str = "http://purl.obolibrary.org/obo/HP_0000118";

/// Disease or disorder (MONDO_0000001).
pub const MONDO_DISEASE: &str = "http://purl.obolibrary.org/obo/MONDO_0000001";

/// Chemical entity (CHEBI_24431).
///
/// Default root for drug classes built from ChEBI.
pub const CHEBI_CHEMICAL_ENTITY: &str = "http://purl.obolibrary.org/obo/CHEBI_24431";

/// Subatomic particle (CHEBI_36342), a sibling ChEBI root.
pub const CHEBI_SUBATOMIC_PARTICLE: &str = "http://purl.obolibrary.org/obo/CHEBI_36342";

/// Role (CHEBI_50906), a sibling ChEBI root.
pub const CHEBI_ROLE: &str = "http://purl.obolibrary.org/obo/CHEBI_50906";

/// Prefix of the ontology whose classes are anchored by ancestor roots.
pub const CHEBI_PREFIX: &str = "CHEBI";
