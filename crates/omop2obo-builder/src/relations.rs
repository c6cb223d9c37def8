//! Inter-ontology relation table.
//!
//! Multi-ontology construction connects the classes built from different
//! ontologies for the same concept. The relation used for a pair of classes
//! depends on the clinical domain and the categories of the two classes, and
//! is read from a small comma-delimited file:
//!
//! ```text
//! context,source_category,relation,target_category
//! condition,disease,http://purl.obolibrary.org/obo/RO_0002200,phenotype
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use omop2obo_types::TermRef;

use crate::types::{TransformError, TransformResult};

/// Lookup from (context, "source-target") to a relation term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationTable {
    relations: HashMap<String, HashMap<String, TermRef>>,
}

impl RelationTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the table from a file.
    ///
    /// # Errors
    /// Returns an error if the file is absent or empty, or a row has fewer
    /// than four fields.
    pub fn from_path<P: AsRef<Path>>(path: P) -> TransformResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TransformError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        if std::fs::metadata(path)?.len() == 0 {
            return Err(TransformError::EmptyFile {
                path: path.display().to_string(),
            });
        }

        let table = Self::from_reader(BufReader::new(File::open(path)?))?;
        tracing::info!(
            "Loaded {} multi-ontology relations from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Loads the table from a reader. The first row is a header.
    pub fn from_reader<R: Read>(reader: R) -> TransformResult<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut table = Self::new();
        let mut record = StringRecord::new();
        while csv_reader.read_record(&mut record)? {
            if record.iter().all(|f| f.is_empty()) {
                continue;
            }
            if record.len() < 4 {
                return Err(TransformError::Config(format!(
                    "relation row has {} fields, expected 4: {:?}",
                    record.len(),
                    record.iter().collect::<Vec<_>>()
                )));
            }
            table.insert(&record[0], &record[1], TermRef::new(&record[2]), &record[3]);
        }

        Ok(table)
    }

    /// Adds a relation, replacing any previous entry for the same key.
    pub fn insert(&mut self, context: &str, source: &str, relation: TermRef, target: &str) {
        self.relations
            .entry(context.to_ascii_lowercase())
            .or_default()
            .insert(Self::key(source, target), relation);
    }

    /// Returns the relation from `source` to `target` categories.
    pub fn relation(&self, context: &str, source: &str, target: &str) -> Option<&TermRef> {
        self.relations
            .get(&context.to_ascii_lowercase())?
            .get(&Self::key(source, target))
    }

    /// Number of relations across all contexts.
    pub fn len(&self) -> usize {
        self.relations.values().map(HashMap::len).sum()
    }

    /// Returns true if no relations are loaded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn key(source: &str, target: &str) -> String {
        format!(
            "{}-{}",
            source.trim().to_ascii_lowercase(),
            target.trim().to_ascii_lowercase()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const RELATIONS: &str = "\
context,source_category,relation,target_category
condition, disease ,http://purl.obolibrary.org/obo/RO_0002200,phenotype
condition,phenotype,http://purl.obolibrary.org/obo/RO_0002573,disease
";

    #[test]
    fn test_from_reader() {
        let table = RelationTable::from_reader(RELATIONS.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.relation("condition", "disease", "phenotype").unwrap().iri(),
            "http://purl.obolibrary.org/obo/RO_0002200"
        );
        assert_eq!(
            table.relation("Condition", "PHENOTYPE", "disease").unwrap().as_str(),
            "http://purl.obolibrary.org/obo/RO_0002573"
        );
    }

    #[test]
    fn test_absent_pair_is_none() {
        let table = RelationTable::from_reader(RELATIONS.as_bytes()).unwrap();
        assert!(table.relation("condition", "disease", "disease").is_none());
        assert!(table.relation("drug", "disease", "phenotype").is_none());
    }

    #[test]
    fn test_short_row_rejected() {
        let data = "context,source,relation,target\ncondition,disease\n";
        assert!(matches!(
            RelationTable::from_reader(data.as_bytes()),
            Err(TransformError::Config(_))
        ));
    }

    #[test]
    fn test_from_path_missing_and_empty() {
        assert!(matches!(
            RelationTable::from_path("/definitely/not/here.txt"),
            Err(TransformError::FileNotFound { .. })
        ));

        let empty = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            RelationTable::from_path(empty.path()),
            Err(TransformError::EmptyFile { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(RELATIONS.as_bytes()).unwrap();
        let table = RelationTable::from_path(file.path()).unwrap();
        assert_eq!(table.len(), 2);
    }
}
