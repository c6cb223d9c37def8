//! Ontology term references.
//!
//! Mapping tables store terms either as full IRIs or as OBO-style compact
//! identifiers (`HP_0000118`, `HP:0000118`). [`TermRef`] keeps the text as
//! written and expands it to an IRI on demand.

use std::fmt;

use crate::well_known::OBO_NAMESPACE;

/// A reference to an existing ontology term.
///
/// # Examples
///
/// ```
/// use omop2obo_types::TermRef;
///
/// let term = TermRef::new("HP:0000118");
/// assert_eq!(term.iri(), "http://purl.obolibrary.org/obo/HP_0000118");
/// assert_eq!(term.prefix(), Some("HP".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TermRef(String);

impl TermRef {
    /// Wraps a term reference, trimming surrounding whitespace.
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_string())
    }

    /// The reference as written in the source data.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Expands the reference to a full IRI.
    ///
    /// Values that already look like IRIs are returned unchanged; compact
    /// identifiers are placed in the OBO namespace with `:` rewritten to `_`.
    pub fn iri(&self) -> String {
        if self.0.starts_with("http://") || self.0.starts_with("https://") {
            self.0.clone()
        } else {
            format!("{}{}", OBO_NAMESPACE, self.0.replace(':', "_"))
        }
    }

    /// The local name: the segment after the last `/` or `#`.
    pub fn local_name(&self) -> &str {
        self.0
            .rsplit(|c| c == '/' || c == '#')
            .next()
            .unwrap_or(&self.0)
    }

    /// The ontology prefix of an OBO identifier, upper-cased.
    ///
    /// `http://purl.obolibrary.org/obo/MONDO_0000001` yields `MONDO`.
    pub fn prefix(&self) -> Option<String> {
        let local = self.local_name();
        let (prefix, rest) = local.split_once(|c| c == '_' || c == ':')?;
        if prefix.is_empty() || rest.is_empty() {
            return None;
        }
        Some(prefix.to_ascii_uppercase())
    }

    /// Returns true if the term belongs to the given ontology prefix.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.prefix()
            .map(|p| p.eq_ignore_ascii_case(prefix))
            .unwrap_or(false)
    }
}

impl From<&str> for TermRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TermRef {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for TermRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
