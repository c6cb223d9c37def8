//! OMOP2OBO class construction binary.

use std::path::Path;

use omop2obo_builder::{RelationTable, SuperclassAnchors, TransformConfig, Transformer};
use omop2obo_types::{ClinicalDomain, ConstructionMode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_ONTOLOGY_DIR: &str = "resources/ontologies";
const DEFAULT_RELATIONS_FILE: &str = "resources/mapping_semantics/omop2obo_relations.csv";
const DEFAULT_OUTPUT_DIR: &str = "resources/ontologies/outputs";
const DEFAULT_ONTOLOGIES: &str = "HP,MONDO";

/// Splits a comma-separated ontology list, dropping empty entries.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mapping_file = std::env::var("OMOP2OBO_MAPPING_FILE")
        .map_err(|_| "OMOP2OBO_MAPPING_FILE must name the mapping table")?;
    let ontology_dir = env_or("OMOP2OBO_ONTOLOGY_DIR", DEFAULT_ONTOLOGY_DIR);
    let output_dir = env_or("OMOP2OBO_OUTPUT_DIR", DEFAULT_OUTPUT_DIR);
    let ontologies = split_list(&env_or("OMOP2OBO_ONTOLOGIES", DEFAULT_ONTOLOGIES));

    let domain: ClinicalDomain = env_or("OMOP2OBO_DOMAIN", "condition").parse()?;
    let mode: ConstructionMode = match std::env::var("OMOP2OBO_MODE") {
        Ok(value) => value.parse()?,
        Err(_) => ConstructionMode::default(),
    };

    let mut config = TransformConfig::new(ontologies, domain, mode);

    // Custom superclass table replaces the built-in one
    if let Ok(path) = std::env::var("OMOP2OBO_SUPERCLASSES") {
        tracing::info!("Loading superclass anchors from: {}", path);
        config = config.with_anchors(SuperclassAnchors::from_path(&path)?);
    }

    let relations_file = env_or("OMOP2OBO_RELATIONS_FILE", DEFAULT_RELATIONS_FILE);
    if mode == ConstructionMode::Multi || Path::new(&relations_file).exists() {
        tracing::info!("Loading relations from: {}", relations_file);
        config = config.with_relations(RelationTable::from_path(&relations_file)?);
    }

    tracing::info!(
        "Building {} classes ({}) for {} from {}",
        domain,
        mode.description(),
        config.ontologies.join(", "),
        mapping_file
    );

    let stats = Transformer::load(config, &mapping_file, &ontology_dir)?.run(&output_dir)?;

    tracing::info!(
        "Built {} classes from {} rows ({} already defined, {} unmapped, {} relations added, {} relation pairs missing)",
        stats.classes_built,
        stats.rows,
        stats.classes_skipped,
        stats.rows_unmapped,
        stats.relations_added,
        stats.relations_missing
    );
    for path in &stats.outputs {
        tracing::info!("Wrote {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("hp, MONDO,,"), vec!["hp", "MONDO"]);
        assert!(split_list(" ").is_empty());
    }
}
