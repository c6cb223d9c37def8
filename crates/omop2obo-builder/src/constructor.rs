//! OWL class construction.
//!
//! Turns a [`ConstructionPlan`] into the triples defining one OMOP2OBO class:
//!
//! ```text
//! :OMOP_4112_HP  a owl:Class ;
//!     rdfs:label "Fever with rash" ;
//!     owl:equivalentClass _:OMOP_4112_HP_s0 ;
//!     rdfs:subClassOf obo:HP_0000118 .
//! _:OMOP_4112_HP_s0  a owl:Class ;
//!     owl:intersectionOf ( obo:HP_0001945 obo:HP_0000988 ) .
//! ```
//!
//! Anonymous nodes are blank nodes labelled from the class local name and the
//! plan step index, so building the same row twice yields identical triples.

use std::collections::{BTreeMap, HashSet};

use omop2obo_types::{
    ConstructionPlan, Constructor, LogicExpr, MappingRow, OntologyMapping, Operand, TermRef,
};
use oxrdf::{
    BlankNode, Graph, Literal, NamedNode, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef,
    Term, TermRef as NodeRef, Triple,
};

use crate::logic::MAX_DEPTH;
use crate::ontology::OntologyGraph;
use crate::types::{TransformConfig, TransformError, TransformResult};
use crate::vocab;

/// Ancestor sets of a row's terms, used to anchor rooted-ontology classes.
pub type RootNodes = BTreeMap<TermRef, HashSet<NamedNode>>;

/// Computes the ancestor set of every term in `terms`.
pub fn root_nodes(graph: &OntologyGraph, terms: &[TermRef]) -> TransformResult<RootNodes> {
    terms
        .iter()
        .map(|term| {
            let node = named_node(&term.iri())?;
            Ok((term.clone(), graph.ancestors(node.as_ref())))
        })
        .collect()
}

/// Builds class definition triples for mapping rows.
#[derive(Debug, Clone, Copy)]
pub struct ClassConstructor<'a> {
    config: &'a TransformConfig,
}

impl<'a> ClassConstructor<'a> {
    /// Creates a constructor reading namespace, anchors and roots from `config`.
    pub fn new(config: &'a TransformConfig) -> Self {
        Self { config }
    }

    /// Local name of the class built for a concept from an ontology.
    pub fn local_name(concept_id: &str, ontology: &str) -> String {
        let raw = format!("OMOP_{}_{}", concept_id.trim(), ontology.to_ascii_uppercase());
        raw.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect()
    }

    /// IRI of the class built for a concept from an ontology.
    pub fn class_iri(&self, concept_id: &str, ontology: &str) -> TransformResult<NamedNode> {
        named_node(&format!(
            "{}{}",
            self.config.namespace,
            Self::local_name(concept_id, ontology)
        ))
    }

    /// Builds the triples for one row and ontology.
    ///
    /// Returns no triples when the row maps to no term in `ontology`.
    /// `root_nodes` replaces the domain anchor with ancestor-derived roots.
    pub fn construct(
        &self,
        row: &MappingRow,
        ontology: &str,
        plan: &ConstructionPlan,
        root_nodes: Option<&RootNodes>,
    ) -> TransformResult<Vec<Triple>> {
        let mapping = match row.mapping(ontology) {
            Some(mapping) if mapping.has_terms() => mapping,
            _ => return Ok(Vec::new()),
        };

        let terms = mapping
            .terms
            .iter()
            .map(|t| named_node(&t.iri()))
            .collect::<TransformResult<Vec<_>>>()?;

        if let Some(index) = plan.max_term_index().filter(|i| *i >= terms.len()) {
            return Err(TransformError::TermIndexOutOfRange {
                concept_id: row.concept_id.clone(),
                index,
                available: terms.len(),
            });
        }

        let local = Self::local_name(&row.concept_id, ontology);
        let class = self.class_iri(&row.concept_id, ontology)?;
        let mut triples = Vec::new();

        // Innermost first: every step's operands exist before the step itself.
        let mut step_nodes: Vec<BlankNode> = Vec::with_capacity(plan.len() + 1);
        for (i, step) in plan.steps().iter().enumerate() {
            let node = blank_node(&format!("{}_s{}", local, i))?;
            let operands = step
                .operands
                .iter()
                .map(|op| operand_term(*op, &terms, &step_nodes))
                .collect::<Vec<_>>();
            emit_boolean_node(&mut triples, &node, step.constructor, operands)?;
            step_nodes.push(node);
        }

        let roots: Vec<Operand> = if plan.roots().is_empty() {
            (0..terms.len()).map(Operand::Term).collect()
        } else {
            plan.roots().to_vec()
        };

        let definition: Term = if roots.len() == 1 {
            operand_term(roots[0], &terms, &step_nodes)
        } else {
            let node = blank_node(&format!("{}_s{}", local, plan.len()))?;
            let operands = roots
                .iter()
                .map(|op| operand_term(*op, &terms, &step_nodes))
                .collect();
            emit_boolean_node(&mut triples, &node, Constructor::And, operands)?;
            node.into()
        };

        push(&mut triples, class.clone(), vocab::TYPE, vocab::CLASS.into_owned());
        let axiom = if mapping.category().is_equivalence() {
            vocab::EQUIVALENT_CLASS
        } else {
            vocab::SUB_CLASS_OF
        };
        push(&mut triples, class.clone(), axiom, definition);

        for anchor in self.select_anchors(ontology, root_nodes)? {
            push(&mut triples, class.clone(), vocab::SUB_CLASS_OF, anchor);
        }

        self.annotate(&mut triples, &class, row, mapping);

        Ok(triples)
    }

    /// Superclass anchors for a class built from `ontology`.
    ///
    /// With root nodes, each term contributes the first candidate root that is
    /// the term or one of its ancestors; candidates are ordered default root
    /// first. Terms with no matching root fall back to the domain anchor.
    pub fn select_anchors(
        &self,
        ontology: &str,
        root_nodes: Option<&RootNodes>,
    ) -> TransformResult<Vec<NamedNode>> {
        let fallback = self
            .config
            .anchors
            .anchor_for(self.config.domain, ontology)
            .map(|t| named_node(&t.iri()))
            .transpose()?;

        let mut anchors: Vec<NamedNode> = Vec::new();
        let mut add = |anchor: NamedNode| {
            if !anchors.contains(&anchor) {
                anchors.push(anchor);
            }
        };

        match root_nodes {
            Some(roots) if !roots.is_empty() => {
                let candidates = self
                    .config
                    .root_candidates
                    .iter()
                    .map(|c| named_node(c))
                    .collect::<TransformResult<Vec<_>>>()?;

                for (term, ancestors) in roots {
                    let iri = term.iri();
                    let chosen = candidates
                        .iter()
                        .find(|c| ancestors.contains(*c) || c.as_str() == iri);
                    match (chosen, &fallback) {
                        (Some(root), _) => add(root.clone()),
                        (None, Some(anchor)) => add(anchor.clone()),
                        (None, None) => {}
                    }
                }
            }
            _ => {
                if let Some(anchor) = fallback {
                    add(anchor);
                }
            }
        }

        if anchors.is_empty() {
            tracing::warn!(
                "No superclass anchor for {} classes in domain {}",
                ontology,
                self.config.domain
            );
        }
        Ok(anchors)
    }

    fn annotate(
        &self,
        triples: &mut Vec<Triple>,
        class: &NamedNode,
        row: &MappingRow,
        mapping: &OntologyMapping,
    ) {
        let mut literal = |predicate: NamedNodeRef<'_>, value: &str| {
            let value = value.trim();
            if !value.is_empty() {
                push(triples, class.clone(), predicate, Literal::new_simple_literal(value));
            }
        };

        literal(vocab::LABEL, &row.concept_label);
        literal(vocab::OBO_ID, &format!("OMOP:{}", row.concept_id.trim()));
        if !row.cui.trim().is_empty() {
            literal(vocab::HAS_DB_XREF, &format!("UMLS:{}", row.cui.trim()));
        }
        literal(vocab::SEMANTIC_TYPE, &row.semantic_type);
        literal(vocab::ONTOLOGY_LABEL, &mapping.label);
        literal(vocab::MAPPING_CATEGORY, &mapping.mapping);
        literal(vocab::MAPPING_EVIDENCE, &mapping.evidence);
    }

    /// Connects the classes built for one concept from two ontologies.
    ///
    /// Emits `source rdfs:subClassOf [ owl:onProperty relation ;
    /// owl:someValuesFrom target ]`.
    pub fn relate(
        &self,
        concept_id: &str,
        source_ontology: &str,
        relation: &TermRef,
        target_ontology: &str,
    ) -> TransformResult<Vec<Triple>> {
        let source = self.class_iri(concept_id, source_ontology)?;
        let target = self.class_iri(concept_id, target_ontology)?;
        let property = named_node(&relation.iri())?;
        let restriction = blank_node(&format!(
            "{}_{}_rel",
            Self::local_name(concept_id, source_ontology),
            target_ontology.to_ascii_uppercase()
        ))?;

        let mut triples = Vec::with_capacity(4);
        push(&mut triples, source, vocab::SUB_CLASS_OF, restriction.clone());
        push(&mut triples, restriction.clone(), vocab::TYPE, vocab::RESTRICTION.into_owned());
        push(&mut triples, restriction.clone(), vocab::ON_PROPERTY, property);
        push(&mut triples, restriction, vocab::SOME_VALUES_FROM, target);
        Ok(triples)
    }
}

fn push(
    triples: &mut Vec<Triple>,
    subject: impl Into<NamedOrBlankNode>,
    predicate: NamedNodeRef<'_>,
    object: impl Into<Term>,
) {
    triples.push(Triple::new(subject, predicate.into_owned(), object));
}

fn named_node(iri: &str) -> TransformResult<NamedNode> {
    NamedNode::new(iri).map_err(|e| TransformError::InvalidIri {
        value: iri.to_string(),
        reason: e.to_string(),
    })
}

fn blank_node(label: &str) -> TransformResult<BlankNode> {
    BlankNode::new(label).map_err(|e| TransformError::InvalidIri {
        value: label.to_string(),
        reason: e.to_string(),
    })
}

fn operand_term(operand: Operand, terms: &[NamedNode], steps: &[BlankNode]) -> Term {
    match operand {
        Operand::Term(i) => terms[i].clone().into(),
        Operand::Step(j) => steps[j].clone().into(),
    }
}

/// Emits an anonymous `owl:Class` combining `operands` with `constructor`.
fn emit_boolean_node(
    triples: &mut Vec<Triple>,
    node: &BlankNode,
    constructor: Constructor,
    operands: Vec<Term>,
) -> TransformResult<()> {
    push(triples, node.clone(), vocab::TYPE, vocab::CLASS.into_owned());
    let property = match constructor {
        Constructor::And => vocab::INTERSECTION_OF,
        Constructor::Or => vocab::UNION_OF,
        Constructor::Not => vocab::COMPLEMENT_OF,
    };

    if !constructor.takes_list() {
        if let Some(operand) = operands.into_iter().next() {
            push(triples, node.clone(), property, operand);
        }
        return Ok(());
    }

    let cells = (0..operands.len())
        .map(|k| blank_node(&format!("{}_l{}", node.as_str(), k)))
        .collect::<TransformResult<Vec<_>>>()?;

    match cells.first() {
        Some(head) => push(triples, node.clone(), property, head.clone()),
        None => push(triples, node.clone(), property, vocab::NIL.into_owned()),
    }
    for (k, (cell, operand)) in cells.iter().zip(operands).enumerate() {
        push(triples, cell.clone(), vocab::FIRST, operand);
        match cells.get(k + 1) {
            Some(next) => push(triples, cell.clone(), vocab::REST, next.clone()),
            None => push(triples, cell.clone(), vocab::REST, vocab::NIL.into_owned()),
        }
    }
    Ok(())
}

fn as_subject(term: NodeRef<'_>) -> Option<NamedOrBlankNodeRef<'_>> {
    match term {
        NodeRef::NamedNode(n) => Some(NamedOrBlankNodeRef::NamedNode(n)),
        NodeRef::BlankNode(b) => Some(NamedOrBlankNodeRef::BlankNode(b)),
        _ => None,
    }
}

fn read_list<'g>(graph: &'g Graph, head: NodeRef<'g>) -> Option<Vec<NodeRef<'g>>> {
    let mut items = Vec::new();
    let mut current = head;
    while current != NodeRef::NamedNode(vocab::NIL) {
        if items.len() > graph.len() {
            return None;
        }
        let subject = as_subject(current)?;
        items.push(graph.object_for_subject_predicate(subject, vocab::FIRST)?);
        current = graph.object_for_subject_predicate(subject, vocab::REST)?;
    }
    Some(items)
}

/// Reads a boolean class expression back out of a graph.
///
/// Named classes map to their position in `terms`; anonymous classes map to
/// constructor calls. Returns `None` for anything that is not a well-formed
/// expression over `terms`, including cyclic or deeper than [`MAX_DEPTH`]
/// nesting.
pub fn read_expression(graph: &Graph, node: NodeRef<'_>, terms: &[NamedNode]) -> Option<LogicExpr> {
    read_nested(graph, node, terms, 0)
}

fn read_nested(
    graph: &Graph,
    node: NodeRef<'_>,
    terms: &[NamedNode],
    depth: usize,
) -> Option<LogicExpr> {
    if let NodeRef::NamedNode(named) = node {
        return terms
            .iter()
            .position(|t| t.as_ref() == named)
            .map(LogicExpr::Term);
    }
    if depth >= MAX_DEPTH {
        return None;
    }

    let subject = as_subject(node)?;
    for (property, constructor) in [
        (vocab::INTERSECTION_OF, Constructor::And),
        (vocab::UNION_OF, Constructor::Or),
    ] {
        if let Some(head) = graph.object_for_subject_predicate(subject, property) {
            let operands = read_list(graph, head)?
                .into_iter()
                .map(|item| read_nested(graph, item, terms, depth + 1))
                .collect::<Option<Vec<_>>>()?;
            return Some(LogicExpr::call(constructor, operands));
        }
    }

    let operand = graph.object_for_subject_predicate(subject, vocab::COMPLEMENT_OF)?;
    Some(LogicExpr::call(
        Constructor::Not,
        vec![read_nested(graph, operand, terms, depth + 1)?],
    ))
}

/// The definition node of a built class.
///
/// The `owl:equivalentClass` object when present, otherwise the first
/// `rdfs:subClassOf` object that is an anonymous boolean class.
pub fn definition_of<'g>(graph: &'g Graph, class: NamedNodeRef<'_>) -> Option<NodeRef<'g>> {
    if let Some(definition) = graph.object_for_subject_predicate(class, vocab::EQUIVALENT_CLASS) {
        return Some(definition);
    }
    graph
        .objects_for_subject_predicate(class, vocab::SUB_CLASS_OF)
        .find(|object| {
            as_subject(*object)
                .map(|s| {
                    [vocab::INTERSECTION_OF, vocab::UNION_OF, vocab::COMPLEMENT_OF]
                        .iter()
                        .any(|p| graph.object_for_subject_predicate(s, *p).is_some())
                })
                .unwrap_or(false)
        })
}

/// Properties relating `source` to `target` through existential restrictions.
pub fn relations_between(
    graph: &Graph,
    source: NamedNodeRef<'_>,
    target: NamedNodeRef<'_>,
) -> Vec<NamedNode> {
    graph
        .objects_for_subject_predicate(source, vocab::SUB_CLASS_OF)
        .filter_map(as_subject)
        .filter(|r| {
            graph.object_for_subject_predicate(*r, vocab::SOME_VALUES_FROM)
                == Some(NodeRef::NamedNode(target))
        })
        .filter_map(|r| match graph.object_for_subject_predicate(r, vocab::ON_PROPERTY) {
            Some(NodeRef::NamedNode(p)) => Some(p.into_owned()),
            _ => None,
        })
        .collect()
}
