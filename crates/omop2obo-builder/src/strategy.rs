//! Construction strategy.
//!
//! A [`Transformer`] owns one run: the configuration, the mapping rows and the
//! loaded ontology graphs. It moves through [`RunState`] in order and branches
//! on [`ConstructionMode`]:
//!
//! - `Single`: every row builds one class per ontology into that ontology's
//!   own graph; each graph that gained classes is written out.
//! - `Multi`: every row builds its classes into the merged graph and connects
//!   them pairwise through the relation table; the merged graph is written out.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use omop2obo_types::{ConstructionMode, MappingRow};
use oxrdf::Triple;

use crate::constructor::{relations_between, root_nodes, ClassConstructor};
use crate::loader::discover_ontology_files;
use crate::logic::parse_logic;
use crate::ontology::{OntologyGraph, OntologySet, MERGED_KEY};
use crate::parser::load_mapping_rows;
use crate::types::{TransformConfig, TransformError, TransformResult, TransformStats};

/// Phase of a transformation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Inputs loaded, no row processed yet.
    Loading,
    /// Rows are being turned into classes.
    RowProcessing,
    /// Graphs are being written.
    Serializing,
    /// Output written; the run is complete.
    Serialized,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Loading => "loading",
            Self::RowProcessing => "row-processing",
            Self::Serializing => "serializing",
            Self::Serialized => "serialized",
        };
        write!(f, "{}", name)
    }
}

/// One transformation run.
#[derive(Debug)]
pub struct Transformer {
    config: TransformConfig,
    rows: Vec<MappingRow>,
    ontologies: OntologySet,
    mutated: BTreeSet<String>,
    state: RunState,
    stats: TransformStats,
}

impl Transformer {
    /// Validates the configuration, reads the mapping table and loads the
    /// ontology files it names.
    ///
    /// # Errors
    /// Configuration errors come first; then missing or malformed resources.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        config: TransformConfig,
        mapping_file: P,
        ontology_dir: Q,
    ) -> TransformResult<Self> {
        config.validate()?;

        let rows = load_mapping_rows(mapping_file, &config.ontologies)?;
        let files = discover_ontology_files(ontology_dir, &config.ontologies)?;
        let ontologies = OntologySet::load(&files, config.mode == ConstructionMode::Multi)?;

        Self::with_ontologies(config, rows, ontologies)
    }

    /// Creates a run over rows and graphs already in memory.
    ///
    /// In multi-ontology mode the merged graph is built if `ontologies` does
    /// not carry one yet.
    pub fn with_ontologies(
        config: TransformConfig,
        rows: Vec<MappingRow>,
        mut ontologies: OntologySet,
    ) -> TransformResult<Self> {
        config.validate()?;

        for prefix in &config.ontologies {
            if ontologies.get(prefix).is_none() {
                return Err(TransformError::GraphNotLoaded {
                    prefix: prefix.clone(),
                });
            }
        }
        if config.mode == ConstructionMode::Multi && ontologies.merged().is_none() {
            ontologies.merge(&config.ontologies)?;
        }

        tracing::info!(
            "Prepared {} construction of {} rows over {}",
            config.mode,
            rows.len(),
            config.ontologies.join(", ")
        );

        Ok(Self {
            config,
            rows,
            ontologies,
            mutated: BTreeSet::new(),
            state: RunState::Loading,
            stats: TransformStats::default(),
        })
    }

    /// Current phase.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Counters so far.
    pub fn stats(&self) -> &TransformStats {
        &self.stats
    }

    /// The run configuration.
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// The graphs being built.
    pub fn ontologies(&self) -> &OntologySet {
        &self.ontologies
    }

    /// Builds classes for every row.
    ///
    /// The interrupt flag is checked before each row, so a stopped run never
    /// leaves a partially built class behind.
    pub fn process_rows(&mut self) -> TransformResult<&TransformStats> {
        if self.state != RunState::Loading {
            return Err(TransformError::Config(format!(
                "rows cannot be processed while {}",
                self.state
            )));
        }
        self.state = RunState::RowProcessing;

        let mut builder = RowBuilder {
            config: &self.config,
            constructor: ClassConstructor::new(&self.config),
            ontologies: &mut self.ontologies,
            mutated: &mut self.mutated,
            stats: &mut self.stats,
        };

        for (i, row) in self.rows.iter().enumerate() {
            let interrupted = self
                .config
                .interrupt
                .as_ref()
                .map(|flag| flag.load(Ordering::SeqCst))
                .unwrap_or(false);
            if interrupted {
                tracing::warn!("Interrupted after {} of {} rows", i, self.rows.len());
                return Err(TransformError::Interrupted { rows_processed: i });
            }

            match self.config.mode {
                ConstructionMode::Single => builder.build_single(row)?,
                ConstructionMode::Multi => builder.build_multi(row)?,
            }
            builder.stats.rows += 1;
        }

        tracing::info!(
            "Processed {} rows: {} classes built, {} already defined, {} unmapped, {} relations added",
            self.stats.rows,
            self.stats.classes_built,
            self.stats.classes_skipped,
            self.stats.rows_unmapped,
            self.stats.relations_added
        );
        Ok(&self.stats)
    }

    /// Output file name for a graph key.
    pub fn output_name(&self, key: &str) -> String {
        if key == MERGED_KEY {
            format!(
                "OMOP2OBO_MergedOntologies_{}{}.owl",
                self.config.domain, self.config.timestamp
            )
        } else {
            format!(
                "{}_omop2obo_{}{}.owl",
                key.to_ascii_lowercase(),
                self.config.domain,
                self.config.timestamp
            )
        }
    }

    /// Writes the built graphs to `output_dir`.
    ///
    /// Single mode writes each graph that gained classes; multi mode writes
    /// the merged graph.
    pub fn serialize<P: AsRef<Path>>(&mut self, output_dir: P) -> TransformResult<Vec<PathBuf>> {
        if self.state != RunState::RowProcessing {
            return Err(TransformError::Config(format!(
                "graphs cannot be serialized while {}",
                self.state
            )));
        }
        self.state = RunState::Serializing;

        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        let targets: Vec<&OntologyGraph> = match self.config.mode {
            ConstructionMode::Single => self
                .mutated
                .iter()
                .filter_map(|prefix| self.ontologies.get(prefix))
                .collect(),
            ConstructionMode::Multi => self.ontologies.merged().into_iter().collect(),
        };

        let mut written = Vec::with_capacity(targets.len());
        for graph in targets {
            let path = output_dir.join(self.output_name(graph.prefix()));
            graph.serialize_to(&path)?;
            written.push(path);
        }

        if written.is_empty() {
            tracing::info!("No graph gained classes; nothing written");
        }
        self.stats.outputs.extend(written.iter().cloned());
        self.state = RunState::Serialized;
        Ok(written)
    }

    /// Processes every row and writes the results.
    pub fn run<P: AsRef<Path>>(mut self, output_dir: P) -> TransformResult<TransformStats> {
        self.process_rows()?;
        self.serialize(output_dir)?;
        Ok(self.stats)
    }
}

/// Mutable view of a run while rows are processed.
struct RowBuilder<'a> {
    config: &'a TransformConfig,
    constructor: ClassConstructor<'a>,
    ontologies: &'a mut OntologySet,
    mutated: &'a mut BTreeSet<String>,
    stats: &'a mut TransformStats,
}

/// Outcome of building one (row, ontology) pair.
enum Built {
    /// The row has no terms for the ontology.
    NoTerms,
    /// The class already had a definition in the target graph.
    Existing,
    /// New triples for the class.
    Triples(Vec<Triple>),
}

impl RowBuilder<'_> {
    fn build_single(&mut self, row: &MappingRow) -> TransformResult<()> {
        let config = self.config;
        for ontology in &config.ontologies {
            let target = self.ontologies.get(ontology).ok_or_else(|| {
                TransformError::GraphNotLoaded {
                    prefix: ontology.clone(),
                }
            })?;

            match self.build(row, ontology, target)? {
                Built::Triples(triples) => {
                    if let Some(graph) = self.ontologies.get_mut(ontology) {
                        graph.extend(&triples);
                    }
                    self.mutated.insert(ontology.clone());
                    self.stats.classes_built += 1;
                }
                Built::NoTerms => self.stats.rows_unmapped += 1,
                Built::Existing => self.stats.classes_skipped += 1,
            }
        }
        Ok(())
    }

    fn build_multi(&mut self, row: &MappingRow) -> TransformResult<()> {
        let config = self.config;
        let mut present: Vec<&str> = Vec::new();

        for ontology in &config.ontologies {
            let merged = self
                .ontologies
                .merged()
                .ok_or_else(|| TransformError::GraphNotLoaded {
                    prefix: MERGED_KEY.to_string(),
                })?;

            match self.build(row, ontology, merged)? {
                Built::Triples(triples) => {
                    if let Some(graph) = self.ontologies.merged_mut() {
                        graph.extend(&triples);
                    }
                    self.stats.classes_built += 1;
                    present.push(ontology);
                }
                Built::Existing => {
                    self.stats.classes_skipped += 1;
                    present.push(ontology);
                }
                Built::NoTerms => self.stats.rows_unmapped += 1,
            }
        }

        for source in &present {
            for target in &present {
                if source != target {
                    self.relate(row, source, target)?;
                }
            }
        }
        Ok(())
    }

    /// Builds the class for one row and ontology against `target`.
    ///
    /// Ancestors for rooted-ontology anchoring always come from the
    /// ontology's own graph.
    fn build(
        &self,
        row: &MappingRow,
        ontology: &str,
        target: &OntologyGraph,
    ) -> TransformResult<Built> {
        let mapping = match row.mapping(ontology) {
            Some(mapping) if mapping.has_terms() => mapping,
            _ => {
                tracing::debug!("Concept {} has no {} terms", row.concept_id, ontology);
                return Ok(Built::NoTerms);
            }
        };

        let class = self.constructor.class_iri(&row.concept_id, ontology)?;
        if target.has_definition(class.as_ref()) {
            tracing::debug!("Skipping {}: already defined", class);
            return Ok(Built::Existing);
        }

        let plan = parse_logic(&mapping.logic).map_err(|source| TransformError::Logic {
            concept_id: row.concept_id.clone(),
            logic: mapping.logic.clone(),
            source,
        })?;

        let roots = if self.config.is_rooted(ontology) {
            let source = self.ontologies.get(ontology).ok_or_else(|| {
                TransformError::GraphNotLoaded {
                    prefix: ontology.to_string(),
                }
            })?;
            Some(root_nodes(source, &mapping.terms)?)
        } else {
            None
        };

        let triples = self
            .constructor
            .construct(row, ontology, &plan, roots.as_ref())?;
        tracing::debug!(
            "Built {} with {} triples ({} plan steps)",
            class,
            triples.len(),
            plan.len()
        );
        Ok(Built::Triples(triples))
    }

    fn relate(&mut self, row: &MappingRow, source: &str, target: &str) -> TransformResult<()> {
        let domain = self.config.domain;
        let source_category = self.config.anchors.category_for(domain, source);
        let target_category = self.config.anchors.category_for(domain, target);

        let relation = self
            .config
            .relations
            .as_ref()
            .and_then(|table| table.relation(domain.as_str(), &source_category, &target_category));

        let Some(relation) = relation else {
            tracing::warn!(
                "No {} relation from {} to {} for concept {}",
                domain,
                source_category,
                target_category,
                row.concept_id
            );
            self.stats.relations_missing += 1;
            return Ok(());
        };

        let source_class = self.constructor.class_iri(&row.concept_id, source)?;
        let target_class = self.constructor.class_iri(&row.concept_id, target)?;
        let linked = self.ontologies.merged().is_some_and(|merged| {
            relations_between(merged.graph(), source_class.as_ref(), target_class.as_ref())
                .iter()
                .any(|property| property.as_str() == relation.iri())
        });
        if linked {
            tracing::debug!("Skipping {} -> {}: already related", source_class, target_class);
            return Ok(());
        }

        let triples = self
            .constructor
            .relate(&row.concept_id, source, relation, target)?;
        let added = self
            .ontologies
            .merged_mut()
            .map(|graph| graph.extend(&triples))
            .unwrap_or(0);
        if added > 0 {
            self.stats.relations_added += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::SuperclassAnchors;
    use crate::constructor::{definition_of, read_expression, relations_between};
    use crate::relations::RelationTable;
    use omop2obo_types::{well_known, ClinicalDomain};
    use oxrdf::{NamedNode, NamedNodeRef};
    use std::fs;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    const HP_NT: &str = r#"
<http://purl.obolibrary.org/obo/HP_0001945> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://purl.obolibrary.org/obo/HP_0000118> .
<http://purl.obolibrary.org/obo/HP_0000988> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://purl.obolibrary.org/obo/HP_0000118> .
"#;

    const MONDO_NT: &str = r#"
<http://purl.obolibrary.org/obo/MONDO_0005550> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://purl.obolibrary.org/obo/MONDO_0000001> .
"#;

    const CHEBI_NT: &str = r#"
<http://purl.obolibrary.org/obo/CHEBI_15377> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://purl.obolibrary.org/obo/CHEBI_33579> .
<http://purl.obolibrary.org/obo/CHEBI_33579> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://purl.obolibrary.org/obo/CHEBI_24431> .
"#;

    const CONDITION_TABLE: &str = "\
CONCEPT_ID,CONCEPT_LABEL,CUI,SEMANTIC_TYPE,HP_LOGIC,HP_URI,HP_LABEL,HP_MAPPING,HP_EVIDENCE,MONDO_LOGIC,MONDO_URI,MONDO_LABEL,MONDO_MAPPING,MONDO_EVIDENCE
4112,Fever with rash,C0015967,Sign or Symptom,\"AND(0, 1)\",HP_0001945 | HP_0000988,Fever | Skin rash,Manual Constructor,,N/A,MONDO_0005550,Infectious disease,Manual Exact,
22288,Skin rash,,Finding,N/A,HP_0000988,Skin rash,Manual Exact,,,,,,
";

    const RELATIONS: &str = "\
context,source,relation,target
condition,disease,http://purl.obolibrary.org/obo/RO_0002200,phenotype
";

    struct Fixture {
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::create_dir(dir.path().join("ontologies")).unwrap();
            fs::write(dir.path().join("ontologies/hp.nt"), HP_NT).unwrap();
            fs::write(dir.path().join("ontologies/mondo_2024.nt"), MONDO_NT).unwrap();
            fs::write(dir.path().join("ontologies/chebi_lite.nt"), CHEBI_NT).unwrap();
            fs::write(dir.path().join("condition.csv"), CONDITION_TABLE).unwrap();
            fs::write(dir.path().join("relations.csv"), RELATIONS).unwrap();
            Self { dir }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }
    }

    fn config(mode: ConstructionMode) -> TransformConfig {
        TransformConfig::new(
            vec!["HP".to_string(), "MONDO".to_string()],
            ClinicalDomain::Condition,
            mode,
        )
        .with_timestamp("_19OCT2026")
    }

    fn class(transformer: &Transformer, id: &str, ontology: &str) -> NamedNode {
        ClassConstructor::new(transformer.config())
            .class_iri(id, ontology)
            .unwrap()
    }

    #[test]
    fn test_single_run_writes_each_graph() {
        let fixture = Fixture::new();
        let transformer = Transformer::load(
            config(ConstructionMode::Single),
            fixture.path("condition.csv"),
            fixture.path("ontologies"),
        )
        .unwrap();
        assert_eq!(transformer.state(), RunState::Loading);

        let stats = transformer.run(fixture.path("out")).unwrap();
        assert_eq!(stats.rows, 2);
        assert_eq!(stats.classes_built, 3);
        assert_eq!(stats.classes_skipped, 0);
        assert_eq!(stats.rows_unmapped, 1);
        assert_eq!(stats.outputs.len(), 2);
        assert!(stats.outputs[0].ends_with("hp_omop2obo_condition_19OCT2026.owl"));
        assert!(stats.outputs[1].ends_with("mondo_omop2obo_condition_19OCT2026.owl"));

        let hp = OntologyGraph::from_path("HP", &stats.outputs[0]).unwrap();
        let fever_rash = NamedNode::new(format!(
            "{}OMOP_4112_HP",
            well_known::OMOP2OBO_NAMESPACE
        ))
        .unwrap();
        assert!(hp.has_definition(fever_rash.as_ref()));
    }

    #[test]
    fn test_single_run_round_trips_structure() {
        let fixture = Fixture::new();
        let mut transformer = Transformer::load(
            config(ConstructionMode::Single),
            fixture.path("condition.csv"),
            fixture.path("ontologies"),
        )
        .unwrap();
        transformer.process_rows().unwrap();
        assert_eq!(transformer.state(), RunState::RowProcessing);

        let graph = transformer.ontologies().get("HP").unwrap().graph();
        let class = class(&transformer, "4112", "HP");
        let terms = vec![
            NamedNode::new("http://purl.obolibrary.org/obo/HP_0001945").unwrap(),
            NamedNode::new("http://purl.obolibrary.org/obo/HP_0000988").unwrap(),
        ];
        let definition = definition_of(graph, class.as_ref()).unwrap();
        assert_eq!(
            read_expression(graph, definition, &terms).unwrap().to_string(),
            "AND(0, 1)"
        );
    }

    #[test]
    fn test_multi_run_connects_by_relation_table() {
        let fixture = Fixture::new();
        let relations = RelationTable::from_path(fixture.path("relations.csv")).unwrap();
        let mut transformer = Transformer::load(
            config(ConstructionMode::Multi).with_relations(relations),
            fixture.path("condition.csv"),
            fixture.path("ontologies"),
        )
        .unwrap();
        let hp_before = transformer.ontologies().get("HP").unwrap().len();

        transformer.process_rows().unwrap();
        let stats = transformer.stats().clone();
        assert_eq!(stats.classes_built, 3);
        assert_eq!(stats.relations_added, 1);
        // phenotype -> disease has no entry
        assert_eq!(stats.relations_missing, 1);

        let merged = transformer.ontologies().merged().unwrap().graph();
        let mondo = class(&transformer, "4112", "MONDO");
        let hp = class(&transformer, "4112", "HP");
        assert_eq!(
            relations_between(merged, mondo.as_ref(), hp.as_ref()),
            vec![NamedNode::new("http://purl.obolibrary.org/obo/RO_0002200").unwrap()]
        );
        assert!(relations_between(merged, hp.as_ref(), mondo.as_ref()).is_empty());

        // Source graphs stay untouched.
        assert_eq!(transformer.ontologies().get("HP").unwrap().len(), hp_before);

        let written = transformer.serialize(fixture.path("out")).unwrap();
        assert_eq!(written.len(), 1);
        assert!(written[0].ends_with("OMOP2OBO_MergedOntologies_condition_19OCT2026.owl"));
        assert_eq!(transformer.state(), RunState::Serialized);
    }

    #[test]
    fn test_multi_run_without_matching_relations_is_not_fatal() {
        let fixture = Fixture::new();
        let stats = Transformer::load(
            config(ConstructionMode::Multi).with_relations(RelationTable::new()),
            fixture.path("condition.csv"),
            fixture.path("ontologies"),
        )
        .unwrap()
        .run(fixture.path("out"))
        .unwrap();

        assert_eq!(stats.relations_added, 0);
        assert_eq!(stats.relations_missing, 2);
        assert_eq!(stats.outputs.len(), 1);
    }

    #[test]
    fn test_rerun_does_not_duplicate() {
        let fixture = Fixture::new();
        let mut first = Transformer::load(
            config(ConstructionMode::Single),
            fixture.path("condition.csv"),
            fixture.path("ontologies"),
        )
        .unwrap();
        first.process_rows().unwrap();
        let built = first.ontologies().clone();
        let hp_len = built.get("HP").unwrap().len();

        let rows = load_mapping_rows(fixture.path("condition.csv"), &first.config().ontologies)
            .unwrap();
        let mut second =
            Transformer::with_ontologies(config(ConstructionMode::Single), rows, built).unwrap();
        let stats = second.process_rows().unwrap();

        assert_eq!(stats.classes_built, 0);
        assert_eq!(stats.classes_skipped, 3);
        assert_eq!(stats.rows_unmapped, 1);
        assert_eq!(second.ontologies().get("HP").unwrap().len(), hp_len);
        assert!(second.serialize(fixture.path("out")).unwrap().is_empty());
    }

    #[test]
    fn test_multi_rerun_over_written_output_adds_nothing() {
        let fixture = Fixture::new();
        let relations = RelationTable::from_path(fixture.path("relations.csv")).unwrap();
        let multi = config(ConstructionMode::Multi).with_relations(relations);

        let stats = Transformer::load(
            multi.clone(),
            fixture.path("condition.csv"),
            fixture.path("ontologies"),
        )
        .unwrap()
        .run(fixture.path("out"))
        .unwrap();
        assert_eq!(stats.relations_added, 1);

        // Reloading relabels every blank node in the written graph.
        let written = OntologyGraph::from_path(MERGED_KEY, &stats.outputs[0]).unwrap();
        let written_len = written.len();
        let mut ontologies = OntologySet::new();
        ontologies.insert(OntologyGraph::from_path("HP", fixture.path("ontologies/hp.nt")).unwrap());
        ontologies.insert(
            OntologyGraph::from_path("MONDO", fixture.path("ontologies/mondo_2024.nt")).unwrap(),
        );
        ontologies.set_merged(written);

        let rows = load_mapping_rows(fixture.path("condition.csv"), &multi.ontologies).unwrap();
        let mut rerun = Transformer::with_ontologies(multi, rows, ontologies).unwrap();
        let stats = rerun.process_rows().unwrap().clone();

        assert_eq!(stats.classes_built, 0);
        assert_eq!(stats.classes_skipped, 3);
        assert_eq!(stats.relations_added, 0);
        assert_eq!(rerun.ontologies().merged().unwrap().len(), written_len);

        let merged = rerun.ontologies().merged().unwrap().graph();
        let mondo = class(&rerun, "4112", "MONDO");
        let hp = class(&rerun, "4112", "HP");
        assert_eq!(relations_between(merged, mondo.as_ref(), hp.as_ref()).len(), 1);
    }

    #[test]
    fn test_interrupt_stops_before_serializing() {
        let fixture = Fixture::new();
        let flag = Arc::new(AtomicBool::new(true));
        let transformer = Transformer::load(
            config(ConstructionMode::Single).with_interrupt(flag),
            fixture.path("condition.csv"),
            fixture.path("ontologies"),
        )
        .unwrap();

        match transformer.run(fixture.path("out")) {
            Err(TransformError::Interrupted { rows_processed }) => assert_eq!(rows_processed, 0),
            other => panic!("expected Interrupted, got {:?}", other),
        }
        assert!(!fixture.path("out").exists());
    }

    #[test]
    fn test_invalid_logic_aborts_run() {
        let fixture = Fixture::new();
        let table = CONDITION_TABLE.replace("\"AND(0, 1)\"", "\"AND(0, 1\"");
        fs::write(fixture.path("condition.csv"), table).unwrap();

        let mut transformer = Transformer::load(
            config(ConstructionMode::Single),
            fixture.path("condition.csv"),
            fixture.path("ontologies"),
        )
        .unwrap();

        match transformer.process_rows() {
            Err(TransformError::Logic { concept_id, .. }) => assert_eq!(concept_id, "4112"),
            other => panic!("expected Logic error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_chebi_classes_anchor_on_ancestor_root() {
        let fixture = Fixture::new();
        let table = "\
CONCEPT_ID,CONCEPT_LABEL,CUI,SEMANTIC_TYPE,CHEBI_LOGIC,CHEBI_URI,CHEBI_LABEL,CHEBI_MAPPING,CHEBI_EVIDENCE
1124957,water,,Pharmacologic Substance,N/A,CHEBI_15377,water,Manual Exact,
";
        fs::write(fixture.path("drug.csv"), table).unwrap();

        let config = TransformConfig::new(
            vec!["CHEBI".to_string()],
            ClinicalDomain::Drug,
            ConstructionMode::Single,
        )
        .with_anchors(SuperclassAnchors::default());
        let mut transformer =
            Transformer::load(config, fixture.path("drug.csv"), fixture.path("ontologies"))
                .unwrap();
        transformer.process_rows().unwrap();

        let graph = transformer.ontologies().get("CHEBI").unwrap().graph();
        let water = class(&transformer, "1124957", "CHEBI");
        let supers: Vec<_> = graph
            .objects_for_subject_predicate(
                water.as_ref(),
                NamedNodeRef::new_unchecked(well_known::RDFS_SUB_CLASS_OF),
            )
            .collect();
        assert_eq!(
            supers,
            vec![oxrdf::TermRef::NamedNode(NamedNodeRef::new_unchecked(
                well_known::CHEBI_CHEMICAL_ENTITY
            ))]
        );
    }

    #[test]
    fn test_process_rows_twice_is_rejected() {
        let fixture = Fixture::new();
        let mut transformer = Transformer::load(
            config(ConstructionMode::Single),
            fixture.path("condition.csv"),
            fixture.path("ontologies"),
        )
        .unwrap();
        transformer.process_rows().unwrap();
        assert!(matches!(
            transformer.process_rows(),
            Err(TransformError::Config(_))
        ));
    }

    #[test]
    fn test_missing_graph_rejected() {
        let rows = vec![MappingRow::new("1", "x")];
        assert!(matches!(
            Transformer::with_ontologies(config(ConstructionMode::Single), rows, OntologySet::new()),
            Err(TransformError::GraphNotLoaded { .. })
        ));
    }
}
