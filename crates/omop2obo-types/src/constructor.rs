//! OWL boolean constructors and the logic expression tree.
//!
//! Mapping rows describe how a clinical concept relates to ontology terms with
//! a compact logic string such as `AND(0, NOT(1))`. Parsing that string yields
//! a tree of [`LogicExpr`] nodes whose leaves are indices into the row's
//! pipe-delimited term reference list.

use std::fmt;

use crate::well_known;

/// A boolean class constructor.
///
/// # Examples
///
/// ```
/// use omop2obo_types::Constructor;
///
/// assert_eq!(Constructor::from_name("and"), Some(Constructor::And));
/// assert_eq!(Constructor::Or.as_str(), "OR");
/// assert_eq!(Constructor::from_name("XOR"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Constructor {
    /// Intersection of the operands (`owl:intersectionOf`).
    And,
    /// Union of the operands (`owl:unionOf`).
    Or,
    /// Complement of a single operand (`owl:complementOf`).
    Not,
}

impl Constructor {
    /// All constructors, in the order the mapping data documents them.
    pub const ALL: [Constructor; 3] = [Constructor::And, Constructor::Or, Constructor::Not];

    /// Looks up a constructor by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "NOT" => Some(Self::Not),
            _ => None,
        }
    }

    /// The canonical upper-case name used in logic strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        }
    }

    /// The OWL property that links an anonymous class to its operands.
    pub fn owl_property(self) -> &'static str {
        match self {
            Self::And => well_known::OWL_INTERSECTION_OF,
            Self::Or => well_known::OWL_UNION_OF,
            Self::Not => well_known::OWL_COMPLEMENT_OF,
        }
    }

    /// Returns true if the operands are serialized as an RDF list.
    pub fn takes_list(self) -> bool {
        !matches!(self, Self::Not)
    }
}

impl fmt::Display for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed logic expression.
///
/// Leaves reference terms by their position in the row's term list; inner
/// nodes apply a [`Constructor`] to their operands in textual order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogicExpr {
    /// Index into the pipe-delimited term reference list.
    Term(usize),
    /// A constructor applied to nested expressions.
    Call {
        /// The boolean constructor.
        constructor: Constructor,
        /// Operands in the order they appear in the logic string.
        operands: Vec<LogicExpr>,
    },
}

impl LogicExpr {
    /// Convenience constructor for a call node.
    pub fn call(constructor: Constructor, operands: Vec<LogicExpr>) -> Self {
        Self::Call {
            constructor,
            operands,
        }
    }

    /// Nesting depth: 0 for a term, 1 + deepest operand for a call.
    pub fn depth(&self) -> usize {
        match self {
            Self::Term(_) => 0,
            Self::Call { operands, .. } => {
                1 + operands.iter().map(LogicExpr::depth).max().unwrap_or(0)
            }
        }
    }

    /// Largest term index referenced anywhere in the expression.
    pub fn max_term_index(&self) -> Option<usize> {
        match self {
            Self::Term(index) => Some(*index),
            Self::Call { operands, .. } => {
                operands.iter().filter_map(LogicExpr::max_term_index).max()
            }
        }
    }
}

impl fmt::Display for LogicExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term(index) => write!(f, "{}", index),
            Self::Call {
                constructor,
                operands,
            } => {
                write!(f, "{}(", constructor)?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", operand)?;
                }
                f.write_str(")")
            }
        }
    }
}
