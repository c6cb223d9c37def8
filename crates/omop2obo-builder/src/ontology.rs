//! In-memory ontology graphs.
//!
//! Each requested ontology is parsed into an [`OntologyGraph`]: a prefix and
//! an `oxrdf::Graph` of triples. An [`OntologySet`] owns one graph per prefix
//! and, for multi-ontology construction, a merged graph holding the union of
//! all of them.
//!
//! Graphs are append-only while a run is in progress; rows add triples and
//! never remove another row's.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use oxrdf::{Graph, NamedNode, NamedNodeRef, TermRef, Triple, TripleRef};
use oxrdfio::{RdfFormat, RdfParser, RdfSerializer};

use crate::loader::rdf_format_for;
use crate::types::{OntologyFiles, TransformError, TransformResult};
use crate::vocab;

/// Key of the merged graph in an [`OntologySet`].
pub const MERGED_KEY: &str = "merged";

/// A mutable set of triples for one ontology prefix.
#[derive(Debug, Clone, Default)]
pub struct OntologyGraph {
    prefix: String,
    graph: Graph,
    source: Option<PathBuf>,
}

impl OntologyGraph {
    /// Creates an empty graph.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            graph: Graph::new(),
            source: None,
        }
    }

    /// Parses an ontology file, choosing the format from its extension.
    pub fn from_path<P: AsRef<Path>>(prefix: &str, path: P) -> TransformResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TransformError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let format = rdf_format_for(path).ok_or_else(|| TransformError::UnsupportedFormat {
            path: path.display().to_string(),
        })?;

        tracing::info!("Loading {} from {}", prefix, path.display());
        let reader = BufReader::new(File::open(path)?);
        let mut graph = Self::from_reader(prefix, reader, format, &path.display().to_string())?;
        graph.source = Some(path.to_path_buf());
        tracing::debug!("Loaded {} triples for {}", graph.len(), prefix);
        Ok(graph)
    }

    /// Parses triples from a reader. `origin` names the source in errors.
    ///
    /// Blank nodes get fresh labels, so graphs parsed from different files
    /// never share an anonymous node even when the files reuse labels.
    pub fn from_reader<R: Read>(
        prefix: &str,
        reader: R,
        format: RdfFormat,
        origin: &str,
    ) -> TransformResult<Self> {
        let mut graph = Self::new(prefix);
        for quad in RdfParser::from_format(format)
            .rename_blank_nodes()
            .for_reader(reader)
        {
            let quad = quad.map_err(|source| TransformError::Rdf {
                path: origin.to_string(),
                source,
            })?;
            graph
                .graph
                .insert(&Triple::new(quad.subject, quad.predicate, quad.object));
        }
        Ok(graph)
    }

    /// The ontology prefix, or [`MERGED_KEY`].
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The file this graph was parsed from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The underlying triples.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    /// Returns true if the graph holds no triples.
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Returns true if the triple is present.
    pub fn contains<'a>(&self, triple: impl Into<TripleRef<'a>>) -> bool {
        self.graph.contains(triple)
    }

    /// Appends triples, returning how many were new.
    pub fn extend<'a>(&mut self, triples: impl IntoIterator<Item = &'a Triple>) -> usize {
        triples
            .into_iter()
            .filter(|t| self.graph.insert(*t))
            .count()
    }

    /// Adds every triple of `other` to this graph.
    pub fn merge_from(&mut self, other: &OntologyGraph) {
        for triple in other.graph.iter() {
            self.graph.insert(triple);
        }
    }

    /// Named superclasses of `term`, following `rdfs:subClassOf` transitively.
    ///
    /// The term itself is not included unless the hierarchy is cyclic.
    pub fn ancestors(&self, term: NamedNodeRef<'_>) -> HashSet<NamedNode> {
        let mut seen: HashSet<NamedNode> = HashSet::new();
        let mut queue = VecDeque::from([term.into_owned()]);

        while let Some(current) = queue.pop_front() {
            for parent in self
                .graph
                .objects_for_subject_predicate(current.as_ref(), vocab::SUB_CLASS_OF)
            {
                if let TermRef::NamedNode(parent) = parent {
                    if seen.insert(parent.into_owned()) {
                        queue.push_back(parent.into_owned());
                    }
                }
            }
        }

        seen
    }

    /// Returns true if `class` already has an equivalence or subclass axiom.
    pub fn has_definition(&self, class: NamedNodeRef<'_>) -> bool {
        self.graph
            .object_for_subject_predicate(class, vocab::EQUIVALENT_CLASS)
            .is_some()
            || self
                .graph
                .object_for_subject_predicate(class, vocab::SUB_CLASS_OF)
                .is_some()
    }

    /// Serializes the graph to a writer.
    pub fn write_to<W: Write>(&self, writer: W, format: RdfFormat) -> TransformResult<W> {
        let mut serializer = RdfSerializer::from_format(format).for_writer(writer);
        for triple in self.graph.iter() {
            serializer.serialize_triple(triple)?;
        }
        Ok(serializer.finish()?)
    }

    /// Writes the graph as RDF/XML.
    pub fn serialize_to<P: AsRef<Path>>(&self, path: P) -> TransformResult<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(File::create(path)?);
        let mut writer = self.write_to(writer, RdfFormat::RdfXml)?;
        writer.flush()?;
        tracing::info!(
            "Wrote {} triples for {} to {}",
            self.len(),
            self.prefix,
            path.display()
        );
        Ok(())
    }
}

/// The graphs of one run, keyed by upper-case ontology prefix.
#[derive(Debug, Clone, Default)]
pub struct OntologySet {
    graphs: BTreeMap<String, OntologyGraph>,
    merged: Option<OntologyGraph>,
}

impl OntologySet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses every discovered file; merges them when `merge` is true.
    pub fn load(files: &OntologyFiles, merge: bool) -> TransformResult<Self> {
        #[cfg(feature = "parallel")]
        let loaded: Vec<TransformResult<OntologyGraph>> = files
            .files
            .par_iter()
            .map(|(prefix, path)| OntologyGraph::from_path(prefix, path))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let loaded: Vec<TransformResult<OntologyGraph>> = files
            .files
            .iter()
            .map(|(prefix, path)| OntologyGraph::from_path(prefix, path))
            .collect();

        let mut set = Self::new();
        for graph in loaded {
            set.insert(graph?);
        }

        if merge {
            let order: Vec<String> = files.files.iter().map(|(p, _)| p.clone()).collect();
            set.merge(&order)?;
        }

        Ok(set)
    }

    /// Adds a graph, keyed by its upper-cased prefix.
    pub fn insert(&mut self, graph: OntologyGraph) {
        self.graphs.insert(graph.prefix.to_ascii_uppercase(), graph);
    }

    /// Builds the merged graph from the listed prefixes.
    pub fn merge(&mut self, prefixes: &[String]) -> TransformResult<&OntologyGraph> {
        let mut merged = OntologyGraph::new(MERGED_KEY);
        for prefix in prefixes {
            let graph = self.get(prefix).ok_or_else(|| TransformError::GraphNotLoaded {
                prefix: prefix.clone(),
            })?;
            merged.merge_from(graph);
        }
        tracing::info!(
            "Merged {} ontologies into {} triples",
            prefixes.len(),
            merged.len()
        );
        Ok(self.merged.insert(merged))
    }

    /// Returns the graph for a prefix, ignoring case.
    pub fn get(&self, prefix: &str) -> Option<&OntologyGraph> {
        self.graphs.get(&prefix.to_ascii_uppercase())
    }

    /// Mutable access to the graph for a prefix.
    pub fn get_mut(&mut self, prefix: &str) -> Option<&mut OntologyGraph> {
        self.graphs.get_mut(&prefix.to_ascii_uppercase())
    }

    /// The merged graph, when built.
    pub fn merged(&self) -> Option<&OntologyGraph> {
        self.merged.as_ref()
    }

    /// Replaces the merged graph, e.g. with output written by an earlier run.
    pub fn set_merged(&mut self, graph: OntologyGraph) {
        self.merged = Some(graph);
    }

    /// Mutable access to the merged graph.
    pub fn merged_mut(&mut self) -> Option<&mut OntologyGraph> {
        self.merged.as_mut()
    }

    /// Per-ontology graphs in prefix order.
    pub fn graphs(&self) -> impl Iterator<Item = &OntologyGraph> {
        self.graphs.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omop2obo_types::well_known;

    const CHEBI_NT: &str = r#"
<http://purl.obolibrary.org/obo/CHEBI_15377> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://purl.obolibrary.org/obo/CHEBI_33579> .
<http://purl.obolibrary.org/obo/CHEBI_33579> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://purl.obolibrary.org/obo/CHEBI_24431> .
<http://purl.obolibrary.org/obo/CHEBI_35222> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://purl.obolibrary.org/obo/CHEBI_50906> .
<http://purl.obolibrary.org/obo/CHEBI_15377> <http://www.w3.org/2000/01/rdf-schema#label> "water" .
"#;

    const HP_XML: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#">
  <owl:Class rdf:about="http://purl.obolibrary.org/obo/HP_0001945">
    <rdfs:subClassOf rdf:resource="http://purl.obolibrary.org/obo/HP_0000118"/>
    <rdfs:label>Fever</rdfs:label>
  </owl:Class>
</rdf:RDF>
"#;

    fn chebi() -> OntologyGraph {
        OntologyGraph::from_reader("CHEBI", CHEBI_NT.as_bytes(), RdfFormat::NTriples, "chebi.nt")
            .unwrap()
    }

    fn node(iri: &str) -> NamedNode {
        NamedNode::new(iri).unwrap()
    }

    #[test]
    fn test_parse_ntriples() {
        let graph = chebi();
        assert_eq!(graph.prefix(), "CHEBI");
        assert_eq!(graph.len(), 4);
    }

    #[test]
    fn test_parse_rdf_xml() {
        let graph =
            OntologyGraph::from_reader("HP", HP_XML.as_bytes(), RdfFormat::RdfXml, "hp.owl")
                .unwrap();
        let fever = node("http://purl.obolibrary.org/obo/HP_0001945");
        let ancestors = graph.ancestors(fever.as_ref());
        assert!(ancestors.contains(&node(well_known::HP_PHENOTYPIC_ABNORMALITY)));
        assert!(graph.has_definition(fever.as_ref()));
    }

    #[test]
    fn test_parse_error_names_origin() {
        let result = OntologyGraph::from_reader(
            "HP",
            "<broken".as_bytes(),
            RdfFormat::NTriples,
            "broken.nt",
        );
        match result {
            Err(TransformError::Rdf { path, .. }) => assert_eq!(path, "broken.nt"),
            other => panic!("expected Rdf error, got {:?}", other),
        }
    }

    #[test]
    fn test_ancestors_are_transitive() {
        let graph = chebi();
        let water = node("http://purl.obolibrary.org/obo/CHEBI_15377");
        let ancestors = graph.ancestors(water.as_ref());

        assert_eq!(ancestors.len(), 2);
        assert!(ancestors.contains(&node(well_known::CHEBI_CHEMICAL_ENTITY)));
        assert!(!ancestors.contains(&node(well_known::CHEBI_ROLE)));
    }

    #[test]
    fn test_ancestors_survive_cycles() {
        let data = r#"
<http://ex.org/a> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://ex.org/b> .
<http://ex.org/b> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://ex.org/a> .
"#;
        let graph =
            OntologyGraph::from_reader("EX", data.as_bytes(), RdfFormat::NTriples, "cycle.nt")
                .unwrap();
        let ancestors = graph.ancestors(node("http://ex.org/a").as_ref());
        assert_eq!(ancestors.len(), 2);
    }

    #[test]
    fn test_merge_is_union() {
        let mut set = OntologySet::new();
        set.insert(chebi());
        set.insert(
            OntologyGraph::from_reader("hp", HP_XML.as_bytes(), RdfFormat::RdfXml, "hp.owl")
                .unwrap(),
        );

        let merged_len = set
            .merge(&["CHEBI".to_string(), "HP".to_string()])
            .unwrap()
            .len();
        let expected = set.get("chebi").unwrap().len() + set.get("HP").unwrap().len();
        assert_eq!(merged_len, expected);
        assert_eq!(set.merged().unwrap().prefix(), MERGED_KEY);

        assert!(matches!(
            set.merge(&["MONDO".to_string()]),
            Err(TransformError::GraphNotLoaded { .. })
        ));
    }

    #[test]
    fn test_merge_keeps_reused_blank_labels_apart() {
        let restriction = |property: &str| {
            format!(
                "_:genid1 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Restriction> .\n\
                 _:genid1 <http://www.w3.org/2002/07/owl#onProperty> <http://purl.obolibrary.org/obo/{}> .\n",
                property
            )
        };

        let mut set = OntologySet::new();
        for (prefix, property) in [("HP", "RO_0000001"), ("MONDO", "RO_0000002")] {
            let data = restriction(property);
            set.insert(
                OntologyGraph::from_reader(prefix, data.as_bytes(), RdfFormat::NTriples, "inline")
                    .unwrap(),
            );
        }

        let merged = set
            .merge(&["HP".to_string(), "MONDO".to_string()])
            .unwrap();
        assert_eq!(merged.len(), 4);

        let subjects: HashSet<_> = merged.graph().iter().map(|t| t.subject.into_owned()).collect();
        assert_eq!(subjects.len(), 2);

        // Within one file a label still names a single node.
        for subject in &subjects {
            assert_eq!(
                merged
                    .graph()
                    .objects_for_subject_predicate(subject, vocab::ON_PROPERTY)
                    .count(),
                1
            );
        }
    }

    #[test]
    fn test_serialize_round_trip() {
        let graph = chebi();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chebi_out.owl");

        graph.serialize_to(&path).unwrap();
        let reloaded = OntologyGraph::from_path("CHEBI", &path).unwrap();

        assert_eq!(reloaded.len(), graph.len());
        assert_eq!(reloaded.source(), Some(path.as_path()));
    }

    #[test]
    fn test_load_set_from_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("chebi.nt"), CHEBI_NT).unwrap();
        std::fs::write(dir.path().join("hp.owl"), HP_XML).unwrap();

        let files = crate::loader::discover_ontology_files(
            dir.path(),
            &["CHEBI".to_string(), "HP".to_string()],
        )
        .unwrap();

        let set = OntologySet::load(&files, true).unwrap();
        assert_eq!(set.graphs().count(), 2);
        assert!(set.merged().is_some());

        let set = OntologySet::load(&files, false).unwrap();
        assert!(set.merged().is_none());
    }
}
