//! Ontology file discovery.

use std::fs;
use std::path::Path;

use oxrdfio::RdfFormat;

use crate::types::{OntologyFiles, TransformError, TransformResult};

/// Discovers one ontology file per requested prefix in a directory.
///
/// A file matches a prefix when its name, up to the first `_` or `.`, equals
/// the prefix ignoring case: `hp_2024-01-01.owl` and `HP.owl` both match `HP`.
/// When several files match, the first in lexical order wins.
pub fn discover_ontology_files<P: AsRef<Path>>(
    path: P,
    prefixes: &[String],
) -> TransformResult<OntologyFiles> {
    let path = path.as_ref();

    if !path.is_dir() {
        return Err(TransformError::DirectoryNotFound {
            path: path.display().to_string(),
        });
    }

    let mut candidates = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if rdf_format_for(&entry.path()).is_some() {
            candidates.push(entry.path());
        }
    }
    candidates.sort();

    if candidates.is_empty() {
        return Err(TransformError::EmptyDirectory {
            path: path.display().to_string(),
        });
    }

    let mut files = OntologyFiles {
        files: Vec::with_capacity(prefixes.len()),
        directory: path.to_path_buf(),
    };

    for prefix in prefixes {
        let mut matches = candidates.iter().filter(|candidate| {
            candidate
                .file_name()
                .map(|name| file_matches_prefix(&name.to_string_lossy(), prefix))
                .unwrap_or(false)
        });

        let found = matches.next().ok_or_else(|| TransformError::OntologyFileMissing {
            prefix: prefix.clone(),
            directory: path.display().to_string(),
        })?;
        if let Some(ignored) = matches.next() {
            tracing::warn!(
                "Several files match {}; using {} and ignoring {}",
                prefix,
                found.display(),
                ignored.display()
            );
        }

        files
            .files
            .push((prefix.to_ascii_uppercase(), found.clone()));
    }

    Ok(files)
}

/// Returns true if a file name belongs to an ontology prefix.
pub fn file_matches_prefix(filename: &str, prefix: &str) -> bool {
    filename
        .split(|c| c == '_' || c == '.')
        .next()
        .map(|stem| !stem.is_empty() && stem.eq_ignore_ascii_case(prefix.trim()))
        .unwrap_or(false)
}

/// Picks the RDF serialization from a file extension.
pub fn rdf_format_for(path: &Path) -> Option<RdfFormat> {
    let extension = path.extension()?.to_string_lossy().to_ascii_lowercase();
    match extension.as_str() {
        "owl" | "rdf" | "xml" => Some(RdfFormat::RdfXml),
        "ttl" => Some(RdfFormat::Turtle),
        "nt" => Some(RdfFormat::NTriples),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_file_matches_prefix() {
        assert!(file_matches_prefix("hp_with_imports.owl", "HP"));
        assert!(file_matches_prefix("MONDO.owl", "mondo"));
        assert!(!file_matches_prefix("hpo_2024.owl", "HP"));
        assert!(!file_matches_prefix("chebi_lite.owl", "HP"));
    }

    #[test]
    fn test_rdf_format_for() {
        assert_eq!(rdf_format_for(Path::new("a.owl")), Some(RdfFormat::RdfXml));
        assert_eq!(rdf_format_for(Path::new("a.TTL")), Some(RdfFormat::Turtle));
        assert_eq!(rdf_format_for(Path::new("a.nt")), Some(RdfFormat::NTriples));
        assert_eq!(rdf_format_for(Path::new("a.csv")), None);
        assert_eq!(rdf_format_for(Path::new("noext")), None);
    }

    #[test]
    fn test_discover_ontology_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hp_with_imports.owl"), "").unwrap();
        fs::write(dir.path().join("mondo_2024.nt"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = discover_ontology_files(dir.path(), &prefixes(&["hp", "MONDO"])).unwrap();
        assert_eq!(files.files.len(), 2);
        assert_eq!(files.files[0].0, "HP");
        assert!(files.path_for("mondo").unwrap().ends_with("mondo_2024.nt"));
    }

    #[test]
    fn test_discover_missing_prefix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hp.owl"), "").unwrap();

        match discover_ontology_files(dir.path(), &prefixes(&["CHEBI"])) {
            Err(TransformError::OntologyFileMissing { prefix, .. }) => assert_eq!(prefix, "CHEBI"),
            other => panic!("expected OntologyFileMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_discover_empty_or_absent_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.md"), "").unwrap();
        assert!(matches!(
            discover_ontology_files(dir.path(), &prefixes(&["HP"])),
            Err(TransformError::EmptyDirectory { .. })
        ));

        assert!(matches!(
            discover_ontology_files("/no/such/ontologies", &prefixes(&["HP"])),
            Err(TransformError::DirectoryNotFound { .. })
        ));
    }
}
