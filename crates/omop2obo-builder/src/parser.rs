//! Mapping table parser.
//!
//! Provides a streaming parser for OMOP2OBO mapping tables: comma-delimited
//! files with one row per clinical concept and five columns per ontology.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use omop2obo_types::{MappingRow, OntologyMapping};

use crate::types::{TransformError, TransformResult};

/// Concept-level columns every mapping table must carry.
pub const CONCEPT_COLUMNS: &[&str] = &["CONCEPT_ID", "CONCEPT_LABEL", "CUI", "SEMANTIC_TYPE"];

/// Per-ontology column suffixes, prefixed with `{ONTOLOGY}_`.
pub const ONTOLOGY_COLUMN_SUFFIXES: &[&str] = &["LOGIC", "URI", "LABEL", "MAPPING", "EVIDENCE"];

#[derive(Debug, Clone)]
struct OntologyColumns {
    prefix: String,
    logic: usize,
    uri: usize,
    label: usize,
    mapping: usize,
    evidence: usize,
}

/// A streaming parser for mapping tables.
///
/// Rows are read one at a time; missing cells are read as empty strings.
pub struct MappingParser<R: Read> {
    reader: Reader<R>,
    concept: [usize; 4],
    ontologies: Vec<OntologyColumns>,
    records_read: usize,
}

impl MappingParser<BufReader<File>> {
    /// Creates a parser from a file path.
    ///
    /// # Errors
    /// Returns an error if the file is missing or empty, or lacks a required
    /// column for one of `ontologies`.
    pub fn from_path<P: AsRef<Path>>(path: P, ontologies: &[String]) -> TransformResult<Self> {
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

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), ontologies)
    }
}

impl<R: Read> MappingParser<R> {
    /// Creates a parser from a reader.
    pub fn from_reader(reader: R, ontologies: &[String]) -> TransformResult<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let positions = Self::header_positions(&mut csv_reader)?;
        let column = |name: &str| -> TransformResult<usize> {
            positions
                .get(name)
                .copied()
                .ok_or_else(|| TransformError::MissingColumn {
                    column: name.to_string(),
                })
        };

        let concept = [
            column(CONCEPT_COLUMNS[0])?,
            column(CONCEPT_COLUMNS[1])?,
            column(CONCEPT_COLUMNS[2])?,
            column(CONCEPT_COLUMNS[3])?,
        ];

        let mut ontology_columns = Vec::with_capacity(ontologies.len());
        for ontology in ontologies {
            let prefix = ontology.to_ascii_uppercase();
            let named = |suffix: &str| column(&format!("{}_{}", prefix, suffix));
            ontology_columns.push(OntologyColumns {
                logic: named("LOGIC")?,
                uri: named("URI")?,
                label: named("LABEL")?,
                mapping: named("MAPPING")?,
                evidence: named("EVIDENCE")?,
                prefix,
            });
        }

        Ok(Self {
            reader: csv_reader,
            concept,
            ontologies: ontology_columns,
            records_read: 0,
        })
    }

    /// Maps upper-cased header names to their positions.
    fn header_positions(reader: &mut Reader<R>) -> TransformResult<HashMap<String, usize>> {
        let headers = reader.headers()?;
        Ok(headers
            .iter()
            .enumerate()
            // Handle UTF-8 BOM at start of file
            .map(|(i, h)| (h.trim_start_matches('\u{feff}').trim().to_ascii_uppercase(), i))
            .collect())
    }

    /// Returns the number of records read so far.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Parses all rows into a Vec.
    pub fn parse_all(self) -> TransformResult<Vec<MappingRow>> {
        self.collect()
    }

    fn row_from_record(&self, record: &StringRecord) -> MappingRow {
        let cell = |i: usize| record.get(i).unwrap_or("").to_string();

        let mut row = MappingRow::new(cell(self.concept[0]), cell(self.concept[1]));
        row.cui = cell(self.concept[2]);
        row.semantic_type = cell(self.concept[3]);

        for columns in &self.ontologies {
            row.insert_mapping(
                &columns.prefix,
                OntologyMapping {
                    logic: cell(columns.logic),
                    terms: OntologyMapping::split_terms(record.get(columns.uri).unwrap_or("")),
                    label: cell(columns.label),
                    mapping: cell(columns.mapping),
                    evidence: cell(columns.evidence),
                },
            );
        }

        row
    }
}

impl<R: Read> Iterator for MappingParser<R> {
    type Item = TransformResult<MappingRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut record = StringRecord::new();
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    self.records_read += 1;

                    // Skip empty records
                    if record.is_empty() || record.iter().all(|f| f.trim().is_empty()) {
                        continue;
                    }

                    return Some(Ok(self.row_from_record(&record)));
                }
                Ok(false) => return None,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Reads every row of a mapping table.
pub fn load_mapping_rows<P: AsRef<Path>>(
    path: P,
    ontologies: &[String],
) -> TransformResult<Vec<MappingRow>> {
    let rows = MappingParser::from_path(path.as_ref(), ontologies)?.parse_all()?;
    tracing::info!(
        "Loaded {} mapping rows from {}",
        rows.len(),
        path.as_ref().display()
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use omop2obo_types::TermRef;
    use std::io::Write;

    const TABLE: &str = "\
\u{feff}CONCEPT_ID,CONCEPT_LABEL,CUI,SEMANTIC_TYPE,HP_LOGIC,HP_URI,HP_LABEL,HP_MAPPING,HP_EVIDENCE
22288,Hereditary elliptocytosis,C0013902,Disease or Syndrome,N/A,HP_0004445,Elliptocytosis,Manual Exact,label match
,,,,,,,,
4112,Fever with rash,,Sign or Symptom,\"AND(0, 1)\",HP_0001945 | HP_0000988,Fever | Skin rash,Manual Constructor,
";

    fn ontologies(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_rows() {
        let rows = MappingParser::from_reader(TABLE.as_bytes(), &ontologies(&["hp"]))
            .unwrap()
            .parse_all()
            .unwrap();

        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.concept_id, "22288");
        assert_eq!(first.cui, "C0013902");
        let hp = first.mapping("HP").unwrap();
        assert_eq!(hp.logic, "N/A");
        assert_eq!(hp.terms, vec![TermRef::new("HP_0004445")]);
        assert_eq!(hp.evidence, "label match");

        let second = &rows[1];
        assert_eq!(second.cui, "");
        let hp = second.mapping("hp").unwrap();
        assert_eq!(hp.logic, "AND(0, 1)");
        assert_eq!(hp.terms.len(), 2);
        assert_eq!(hp.evidence, "");
    }

    #[test]
    fn test_records_read_counts_blank_rows() {
        let mut parser = MappingParser::from_reader(TABLE.as_bytes(), &ontologies(&["HP"])).unwrap();
        for row in parser.by_ref() {
            row.unwrap();
        }
        assert_eq!(parser.records_read(), 3);
    }

    #[test]
    fn test_missing_ontology_column() {
        let result = MappingParser::from_reader(TABLE.as_bytes(), &ontologies(&["MONDO"]));
        match result {
            Err(TransformError::MissingColumn { column }) => assert_eq!(column, "MONDO_LOGIC"),
            other => panic!("expected MissingColumn, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_missing_concept_column() {
        let data = "CONCEPT_ID,CUI\n1,C1\n";
        assert!(matches!(
            MappingParser::from_reader(data.as_bytes(), &[]),
            Err(TransformError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_from_path_errors() {
        assert!(matches!(
            MappingParser::from_path("/no/such/mapping.csv", &[]),
            Err(TransformError::FileNotFound { .. })
        ));

        let empty = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            MappingParser::from_path(empty.path(), &[]),
            Err(TransformError::EmptyFile { .. })
        ));
    }

    #[test]
    fn test_load_mapping_rows_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TABLE.as_bytes()).unwrap();

        let rows = load_mapping_rows(file.path(), &ontologies(&["HP"])).unwrap();
        assert_eq!(rows.len(), 2);
    }
}
