//! Construction plans.
//!
//! A [`ConstructionPlan`] is the bottom-up form of a parsed logic string: every
//! constructor call becomes a [`PlanStep`], and steps are ordered so that a
//! step only ever references steps that precede it.
//!
//! # Example
//!
//! ```
//! use omop2obo_types::{ConstructionPlan, Constructor, LogicExpr};
//!
//! // AND(OR(0, 1), 2)
//! let expr = LogicExpr::call(
//!     Constructor::And,
//!     vec![
//!         LogicExpr::call(Constructor::Or, vec![LogicExpr::Term(0), LogicExpr::Term(1)]),
//!         LogicExpr::Term(2),
//!     ],
//! );
//!
//! let plan = ConstructionPlan::from_exprs(&[expr]);
//! assert_eq!(
//!     plan.to_pairs(),
//!     vec![("OR", "0, 1".to_string()), ("AND", "2, OR".to_string())]
//! );
//! ```

use crate::{Constructor, LogicExpr};

/// An operand of a plan step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operand {
    /// Index into the row's term reference list.
    Term(usize),
    /// The anonymous class produced by an earlier step of the same plan.
    Step(usize),
}

/// One constructor application in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanStep {
    /// The constructor applied by this step.
    pub constructor: Constructor,
    /// Operands in textual order.
    pub operands: Vec<Operand>,
}

/// Ordered, innermost-first construction plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstructionPlan {
    steps: Vec<PlanStep>,
    roots: Vec<Operand>,
}

impl ConstructionPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens parsed expressions into post-order steps.
    ///
    /// `exprs` are the top-level expressions of one logic string; each becomes
    /// a root of the plan.
    pub fn from_exprs(exprs: &[LogicExpr]) -> Self {
        let mut plan = Self::new();
        for expr in exprs {
            let root = plan.push_expr(expr);
            plan.roots.push(root);
        }
        plan
    }

    fn push_expr(&mut self, expr: &LogicExpr) -> Operand {
        match expr {
            LogicExpr::Term(index) => Operand::Term(*index),
            LogicExpr::Call {
                constructor,
                operands,
            } => {
                let operands = operands.iter().map(|op| self.push_expr(op)).collect();
                self.steps.push(PlanStep {
                    constructor: *constructor,
                    operands,
                });
                Operand::Step(self.steps.len() - 1)
            }
        }
    }

    /// The steps, innermost first.
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Top-level operands of the logic string.
    pub fn roots(&self) -> &[Operand] {
        &self.roots
    }

    /// Returns true if the plan has neither steps nor roots.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.roots.is_empty()
    }

    /// Number of constructor steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Largest term index referenced by the plan.
    pub fn max_term_index(&self) -> Option<usize> {
        self.steps
            .iter()
            .flat_map(|s| s.operands.iter())
            .chain(self.roots.iter())
            .filter_map(|op| match op {
                Operand::Term(i) => Some(*i),
                Operand::Step(_) => None,
            })
            .max()
    }

    /// Returns true if every step references only earlier steps.
    pub fn is_innermost_first(&self) -> bool {
        self.steps.iter().enumerate().all(|(i, step)| {
            step.operands.iter().all(|op| match op {
                Operand::Step(j) => *j < i,
                Operand::Term(_) => true,
            })
        })
    }

    /// Rebuilds the expression tree rooted at `operand`.
    pub fn expr_for(&self, operand: Operand) -> Option<LogicExpr> {
        match operand {
            Operand::Term(i) => Some(LogicExpr::Term(i)),
            Operand::Step(j) => {
                let step = self.steps.get(j)?;
                let operands = step
                    .operands
                    .iter()
                    .map(|op| self.expr_for(*op))
                    .collect::<Option<Vec<_>>>()?;
                Some(LogicExpr::call(step.constructor, operands))
            }
        }
    }

    /// Constructor/argument-string pairs, innermost first.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        self.steps
            .iter()
            .map(|s| (s.constructor.as_str(), self.arguments(s)))
            .collect()
    }

    /// Renders a step's operands as an argument string.
    ///
    /// Literal indices come first, then the names of the nested constructors
    /// the step consumes.
    pub fn arguments(&self, step: &PlanStep) -> String {
        let literals = step.operands.iter().filter_map(|op| match op {
            Operand::Term(i) => Some(i.to_string()),
            Operand::Step(_) => None,
        });
        let nested = step.operands.iter().filter_map(|op| match op {
            Operand::Step(j) => self.steps.get(*j).map(|s| s.constructor.as_str().to_string()),
            Operand::Term(_) => None,
        });
        literals.chain(nested).collect::<Vec<_>>().join(", ")
    }
}
