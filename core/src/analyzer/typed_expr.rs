use crate::{
    Box, String,
    ast::{BinaryOp, UnaryOp},
    syntax::Span,
    types::Type,
    values::Value,
};

/// A node of the typed tree produced by the analyzer.
///
/// Every node carries its resolved type. A node typed [`Type::Error`] has
/// already been diagnosed; such trees are never handed to the code generator.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub ty: Type,
    pub span: Span,
    pub inner: ExprInner,
}

impl Expr {
    pub fn new(ty: Type, span: Span, inner: ExprInner) -> Self {
        Self { ty, span, inner }
    }

    pub fn is_error(&self) -> bool {
        self.ty.is_error()
    }

    /// The compile-time value of a literal or resolved identifier.
    pub fn constant_value(&self) -> Option<&Value> {
        match &self.inner {
            ExprInner::Constant(value) => Some(value),
            ExprInner::Ident { value, .. } => value.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprInner {
    Constant(Value),
    /// `value` is `None` only when the name did not resolve.
    Ident {
        name: String,
        value: Option<Value>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    /// Rejected by the analyzer; kept so the tree mirrors its source.
    Lambda,
    Definition {
        name: String,
        value: Box<Expr>,
    },
}
