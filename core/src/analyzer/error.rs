use core::fmt;

use crate::api::Diagnostic;
use crate::ast::{BinaryOp, UnaryOp};
use crate::syntax::Span;
use crate::types::Type;
use crate::{String, ToString, format};

// Column width of operand types in the Requires/Has tables.
const ALIGN: usize = 8;

/// Type error found during analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeError {
    pub kind: TypeErrorKind,
    pub span: Span,
}

/// Specific kinds of type errors
#[derive(Debug, Clone, PartialEq)]
pub enum TypeErrorKind {
    /// Name not present in the global binding table
    UndefinedIdentifier { name: String },
    /// Operand of `-` or `!` has the wrong type
    UnaryOperandMismatch {
        op: UnaryOp,
        expected: Type,
        found: Type,
    },
    /// Operands of an arithmetic or ordering operator have the wrong types
    BinaryOperandMismatch {
        op: BinaryOp,
        expected: (Type, Type),
        found: (Type, Type),
    },
    /// `==` / `!=` between operands of different types
    NotEqualityComparable {
        op: BinaryOp,
        left: Type,
        right: Type,
    },
    /// Condition of an if expression is not `Bool`
    NonBoolCondition { found: Type },
    /// The two branches of an if expression disagree
    BranchMismatch { then_ty: Type, else_ty: Type },
    /// Unsupported language feature
    UnsupportedFeature { feature: &'static str },
    /// Declared type of a definition differs from its value's type
    DefinitionTypeMismatch {
        name: String,
        declared: Type,
        inferred: Type,
    },
    /// Definition bound to something other than a literal
    NonConstantDefinition { name: String },
    /// Same-scope redefinition while shadowing is disallowed
    Redefinition { name: String },
    /// Definition appearing inside another expression
    NestedDefinition { name: String },
}

impl TypeErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            TypeErrorKind::UndefinedIdentifier { .. } => "E001",
            TypeErrorKind::UnaryOperandMismatch { .. } => "E002",
            TypeErrorKind::BinaryOperandMismatch { .. } => "E003",
            TypeErrorKind::NotEqualityComparable { .. } => "E004",
            TypeErrorKind::NonBoolCondition { .. } => "E005",
            TypeErrorKind::BranchMismatch { .. } => "E006",
            TypeErrorKind::UnsupportedFeature { .. } => "E007",
            TypeErrorKind::DefinitionTypeMismatch { .. } => "E008",
            TypeErrorKind::NonConstantDefinition { .. } => "E009",
            TypeErrorKind::Redefinition { .. } => "E010",
            TypeErrorKind::NestedDefinition { .. } => "E011",
        }
    }

    /// One-line summary of the error.
    pub fn headline(&self) -> String {
        match self {
            TypeErrorKind::UndefinedIdentifier { name } => {
                format!("Undefined identifier: {}", name)
            }
            TypeErrorKind::UnaryOperandMismatch { op, .. } => {
                format!("Unmatched types around unary operator {}", op)
            }
            TypeErrorKind::BinaryOperandMismatch { op, .. } => {
                format!("Unmatched types around binary operator {}", op)
            }
            TypeErrorKind::NotEqualityComparable { op, .. } => {
                format!("Unmatched types around comparison operator {}", op)
            }
            TypeErrorKind::NonBoolCondition { .. } => {
                format!("Condition of if expression must be {}", Type::Bool)
            }
            TypeErrorKind::BranchMismatch { .. } => "Type mismatch in branching".to_string(),
            TypeErrorKind::UnsupportedFeature { feature } => {
                format!("{} are not implemented yet", feature)
            }
            TypeErrorKind::DefinitionTypeMismatch { .. } => {
                "Type mismatch in value definition".to_string()
            }
            TypeErrorKind::NonConstantDefinition { .. } => {
                "Constant folding is unimplemented yet".to_string()
            }
            TypeErrorKind::Redefinition { name } => format!("Redefinition of {}", name),
            TypeErrorKind::NestedDefinition { .. } => {
                "Definitions are only allowed at top level".to_string()
            }
        }
    }

    /// Lines following the headline, if any.
    pub fn details(&self) -> Option<String> {
        match self {
            TypeErrorKind::UnaryOperandMismatch {
                op,
                expected,
                found,
            } => Some(format!("Requires {} {}\nHas      {} {}", op, expected, op, found)),
            TypeErrorKind::BinaryOperandMismatch {
                op,
                expected,
                found,
            } => Some(format!(
                "Requires {:<w$}{:<3}{}\nHas      {:<w$}{:<3}{}",
                expected.0,
                op,
                expected.1,
                found.0,
                op,
                found.1,
                w = ALIGN
            )),
            TypeErrorKind::NotEqualityComparable { op, left, right } => Some(format!(
                "Requires T {} T\nwhere T: EqualityComparable\nHas {} {} {}",
                op, left, op, right
            )),
            TypeErrorKind::NonBoolCondition { found } => Some(format!("Has {}", found)),
            TypeErrorKind::BranchMismatch { then_ty, else_ty } => Some(format!(
                "If branch: {}\nElse branch: {}",
                then_ty, else_ty
            )),
            TypeErrorKind::DefinitionTypeMismatch {
                name,
                declared,
                inferred,
            } => Some(format!(
                "Got let {}: {} = {}\n{} is left undefined",
                name, declared, inferred, name
            )),
            TypeErrorKind::NonConstantDefinition { name } => Some(format!(
                "The value bound to {} must be a literal",
                name
            )),
            TypeErrorKind::Redefinition { name } => {
                Some(format!("{} is already defined in this scope", name))
            }
            TypeErrorKind::NestedDefinition { name } => {
                Some(format!("Move the definition of {} to its own statement", name))
            }
            TypeErrorKind::UndefinedIdentifier { .. }
            | TypeErrorKind::UnsupportedFeature { .. } => None,
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.headline())?;
        if let Some(details) = self.kind.details() {
            write!(f, "\n{}", details)?;
        }
        Ok(())
    }
}

impl core::error::Error for TypeError {}

impl TypeError {
    pub fn new(kind: TypeErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            message: self.kind.headline(),
            span: self.span.clone(),
            help: self.kind.details(),
            code: Some(self.kind.code().to_string()),
        }
    }
}
