//! Constant `NamedNodeRef`s for the RDF, RDFS, OWL and annotation terms the
//! class constructor reads and writes.

use omop2obo_types::well_known;
use oxrdf::NamedNodeRef;

pub const TYPE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(well_known::RDF_TYPE);
pub const FIRST: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(well_known::RDF_FIRST);
pub const REST: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(well_known::RDF_REST);
pub const NIL: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(well_known::RDF_NIL);

pub const LABEL: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(well_known::RDFS_LABEL);
pub const SUB_CLASS_OF: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked(well_known::RDFS_SUB_CLASS_OF);

pub const CLASS: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(well_known::OWL_CLASS);
pub const RESTRICTION: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(well_known::OWL_RESTRICTION);
pub const EQUIVALENT_CLASS: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked(well_known::OWL_EQUIVALENT_CLASS);
pub const INTERSECTION_OF: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked(well_known::OWL_INTERSECTION_OF);
pub const UNION_OF: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(well_known::OWL_UNION_OF);
pub const COMPLEMENT_OF: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked(well_known::OWL_COMPLEMENT_OF);
pub const ON_PROPERTY: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(well_known::OWL_ON_PROPERTY);
pub const SOME_VALUES_FROM: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked(well_known::OWL_SOME_VALUES_FROM);

pub const OBO_ID: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(well_known::OBO_IN_OWL_ID);
pub const HAS_DB_XREF: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked(well_known::OBO_IN_OWL_HAS_DB_XREF);

pub const MAPPING_CATEGORY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked(well_known::MAPPING_CATEGORY);
pub const MAPPING_EVIDENCE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked(well_known::MAPPING_EVIDENCE);
pub const SEMANTIC_TYPE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(well_known::SEMANTIC_TYPE);
pub const ONTOLOGY_LABEL: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked(well_known::ONTOLOGY_LABEL);
