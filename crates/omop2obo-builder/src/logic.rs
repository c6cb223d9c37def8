//! Logic expression parser.
//!
//! Parses the compact constructor syntax used in mapping tables:
//!
//! ```text
//! logic    := "" | "N/A" | exprs
//! exprs    := expr ("," expr)*
//! expr     := INDEX | NAME "(" exprs ")"
//! NAME     := AND | OR | NOT        (any case)
//! ```
//!
//! Parsing produces a [`LogicExpr`] tree per top-level expression; the tree is
//! then flattened into a [`ConstructionPlan`] whose steps are ordered
//! innermost-first.

use omop2obo_types::{ConstructionPlan, Constructor, LogicExpr};

use crate::types::LogicError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident(String),
    Index(String),
    Open,
    Close,
    Comma,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    position: usize,
}

impl Token {
    fn text(&self) -> String {
        match &self.kind {
            TokenKind::Ident(s) | TokenKind::Index(s) => s.clone(),
            TokenKind::Open => "(".to_string(),
            TokenKind::Close => ")".to_string(),
            TokenKind::Comma => ",".to_string(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, LogicError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(position, ch)) = chars.peek() {
        let kind = match ch {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '(' => {
                chars.next();
                TokenKind::Open
            }
            ')' => {
                chars.next();
                TokenKind::Close
            }
            ',' => {
                chars.next();
                TokenKind::Comma
            }
            c if c.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    digits.push(d);
                    chars.next();
                }
                TokenKind::Index(digits)
            }
            c if c.is_ascii_alphabetic() => {
                let mut name = String::new();
                while let Some(&(_, a)) = chars.peek() {
                    if !a.is_ascii_alphabetic() {
                        break;
                    }
                    name.push(a);
                    chars.next();
                }
                TokenKind::Ident(name)
            }
            other => {
                return Err(LogicError::UnexpectedChar {
                    ch: other,
                    position,
                })
            }
        };
        tokens.push(Token { kind, position });
    }

    Ok(tokens)
}

/// Deepest constructor nesting accepted in one logic string.
pub const MAX_DEPTH: usize = 256;

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    declared: &'a [Constructor],
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_exprs(&mut self, expected: &'static str) -> Result<Vec<LogicExpr>, LogicError> {
        let mut exprs = vec![self.parse_expr(expected)?];
        while matches!(self.peek(), Some(Token { kind: TokenKind::Comma, .. })) {
            self.advance();
            exprs.push(self.parse_expr("an index or constructor after ','")?);
        }
        Ok(exprs)
    }

    fn parse_expr(&mut self, expected: &'static str) -> Result<LogicExpr, LogicError> {
        let token = self.advance().ok_or(LogicError::UnexpectedEnd { expected })?;

        match token.kind {
            TokenKind::Index(digits) => digits
                .parse::<usize>()
                .map(LogicExpr::Term)
                .map_err(|_| LogicError::InvalidIndex { value: digits }),
            TokenKind::Ident(name) => {
                let constructor = Constructor::from_name(&name).ok_or_else(|| {
                    LogicError::UnknownConstructor {
                        name: name.clone(),
                        position: token.position,
                    }
                })?;
                if !self.declared.contains(&constructor) {
                    return Err(LogicError::UndeclaredConstructor {
                        name: constructor.as_str().to_string(),
                    });
                }
                self.parse_call(constructor)
            }
            _ => Err(LogicError::UnexpectedToken {
                found: token.text(),
                position: token.position,
                expected,
            }),
        }
    }

    fn parse_call(&mut self, constructor: Constructor) -> Result<LogicExpr, LogicError> {
        self.expect(TokenKind::Open, "'('")?;

        if matches!(self.peek(), Some(Token { kind: TokenKind::Close, .. })) {
            return Err(LogicError::EmptyOperands {
                constructor: constructor.as_str().to_string(),
            });
        }

        if self.depth >= MAX_DEPTH {
            return Err(LogicError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        let operands = self.parse_exprs("an operand")?;
        self.depth -= 1;
        self.expect(TokenKind::Close, "')'")?;

        if constructor == Constructor::Not && operands.len() != 1 {
            return Err(LogicError::ComplementArity {
                found: operands.len(),
            });
        }

        Ok(LogicExpr::call(constructor, operands))
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<(), LogicError> {
        match self.advance() {
            Some(token) if token.kind == kind => Ok(()),
            Some(token) => Err(LogicError::UnexpectedToken {
                found: token.text(),
                position: token.position,
                expected,
            }),
            None => Err(LogicError::UnexpectedEnd { expected }),
        }
    }
}

/// Returns true if the logic string carries no expression.
pub fn is_blank(logic: &str) -> bool {
    let trimmed = logic.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("N/A")
}

/// Parses a logic string into its top-level expressions.
///
/// `constructors` lists the constructors the caller expects in the string;
/// any other recognised constructor is rejected.
pub fn parse_expressions(
    logic: &str,
    constructors: &[Constructor],
) -> Result<Vec<LogicExpr>, LogicError> {
    if is_blank(logic) {
        return Ok(Vec::new());
    }

    let mut parser = Parser {
        tokens: tokenize(logic)?,
        pos: 0,
        depth: 0,
        declared: constructors,
    };
    let exprs = parser.parse_exprs("an index or constructor")?;

    if let Some(token) = parser.peek() {
        return Err(LogicError::UnexpectedToken {
            found: token.text(),
            position: token.position,
            expected: "',' or end of input",
        });
    }

    Ok(exprs)
}

/// Parses a logic string into an innermost-first construction plan.
///
/// # Examples
///
/// ```
/// use omop2obo_builder::logic::parse;
/// use omop2obo_types::Constructor;
///
/// let plan = parse("AND(OR(0, 1), 2)", &[Constructor::Or, Constructor::And]).unwrap();
/// assert_eq!(
///     plan.to_pairs(),
///     vec![("OR", "0, 1".to_string()), ("AND", "2, OR".to_string())]
/// );
///
/// assert!(parse("N/A", &[]).unwrap().is_empty());
/// ```
pub fn parse(logic: &str, constructors: &[Constructor]) -> Result<ConstructionPlan, LogicError> {
    parse_expressions(logic, constructors).map(|exprs| ConstructionPlan::from_exprs(&exprs))
}

/// Distinct constructors in a logic string, last-appearing first.
///
/// Names are collected in order of first appearance and the list is reversed,
/// so the textually outermost constructor comes last. Unknown identifiers are
/// left for [`parse`] to report.
pub fn constructors_in(logic: &str) -> Vec<Constructor> {
    let mut seen: Vec<Constructor> = Vec::new();
    let mut word = String::new();

    for ch in logic.chars().chain(std::iter::once(' ')) {
        if ch.is_ascii_alphabetic() {
            word.push(ch);
            continue;
        }
        if let Some(constructor) = Constructor::from_name(&word) {
            if !seen.contains(&constructor) {
                seen.push(constructor);
            }
        }
        word.clear();
    }

    seen.reverse();
    seen
}

/// Parses a logic string, declaring every constructor it mentions.
pub fn parse_logic(logic: &str) -> Result<ConstructionPlan, LogicError> {
    parse(logic, &constructors_in(logic))
}
