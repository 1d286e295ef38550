use crate::{
    Box, String, Vec,
    analyzer::{
        error::{TypeError, TypeErrorKind},
        typed_expr::{Expr, ExprInner},
    },
    api::{CompilerOptions, Globals, SameScopeShadowing},
    ast::{self, BinaryOp, ExprKind, UnaryOp},
    syntax::Span,
    types::Type,
    values::Value,
};

/// Type check a single top-level expression or definition.
///
/// On success, returns the typed tree. Definitions that check cleanly are
/// installed into `globals`. On failure, returns the diagnostics in the order
/// they were found (never empty).
pub fn analyze(
    globals: &mut Globals,
    options: &CompilerOptions,
    expr: &ast::Expr,
) -> Result<Expr, Vec<TypeError>> {
    let mut analyzer = Analyzer::new(globals, options);
    let typed = analyzer.analyze_root(expr);
    analyzer.finish(typed)
}

/// Type check a sequence of top-level statements.
///
/// Each statement is an independent unit for panic-mode recovery, so every
/// failing statement contributes its root-cause diagnostic. Any failure makes
/// the whole program fail.
pub fn analyze_program(
    globals: &mut Globals,
    options: &CompilerOptions,
    roots: &[ast::Expr],
) -> Result<Vec<Expr>, Vec<TypeError>> {
    let mut analyzer = Analyzer::new(globals, options);
    let typed = roots.iter().map(|root| analyzer.analyze_root(root)).collect();
    analyzer.finish(typed)
}

struct Analyzer<'a> {
    globals: &'a mut Globals,
    options: &'a CompilerOptions,
    // Sticky for the whole session.
    has_error: bool,
    // Suppresses further diagnostics until the next root.
    panic_mode: bool,
    errors: Vec<TypeError>,
    depth: usize,
}

impl<'a> Analyzer<'a> {
    fn new(globals: &'a mut Globals, options: &'a CompilerOptions) -> Self {
        Self {
            globals,
            options,
            has_error: false,
            panic_mode: false,
            errors: Vec::new(),
            depth: 0,
        }
    }

    fn finish<T>(self, result: T) -> Result<T, Vec<TypeError>> {
        if self.has_error {
            debug_assert!(!self.errors.is_empty());
            Err(self.errors)
        } else {
            Ok(result)
        }
    }

    fn analyze_root(&mut self, expr: &ast::Expr) -> Expr {
        self.synchronize();
        tracing::debug!(expr = %expr, "Type checking top-level statement");
        self.analyze(expr)
    }

    /// Leave panic mode.
    fn synchronize(&mut self) {
        self.panic_mode = false;
        self.depth = 0;
    }

    fn error(&mut self, kind: TypeErrorKind, span: &Span) {
        if self.panic_mode {
            tracing::trace!(?kind, "Suppressed diagnostic in panic mode");
            return;
        }
        self.has_error = true;
        self.panic_mode = true;

        let error = TypeError::new(kind, span.clone());
        tracing::debug!(code = error.kind.code(), "{}", error.kind.headline());
        self.errors.push(error);
    }

    fn analyze(&mut self, expr: &ast::Expr) -> Expr {
        self.depth += 1;
        let span = &expr.span;
        let typed = match &expr.kind {
            ExprKind::Literal(value) => self.analyze_literal(value, span),
            ExprKind::Ident(name) => self.analyze_ident(name, span),
            ExprKind::Unary { op, expr } => self.analyze_unary(*op, expr, span),
            ExprKind::Binary { op, left, right } if op.is_equality() => {
                self.analyze_equality(*op, left, right, span)
            }
            ExprKind::Binary { op, left, right } => self.analyze_binary(*op, left, right, span),
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.analyze_if(cond, then_branch, else_branch, span),
            ExprKind::Lambda { .. } => self.analyze_lambda(span),
            ExprKind::Definition { name, ty, value } => {
                self.analyze_definition(name, *ty, value, span)
            }
        };
        self.depth -= 1;
        typed
    }

    fn analyze_literal(&mut self, value: &Value, span: &Span) -> Expr {
        Expr::new(value.ty(), span.clone(), ExprInner::Constant(value.clone()))
    }

    fn analyze_ident(&mut self, name: &str, span: &Span) -> Expr {
        let (ty, value) = match self.globals.get(name) {
            Some(binding) => (binding.ty, Some(binding.value.clone())),
            None => {
                self.error(
                    TypeErrorKind::UndefinedIdentifier {
                        name: String::from(name),
                    },
                    span,
                );
                (Type::Error, None)
            }
        };
        Expr::new(
            ty,
            span.clone(),
            ExprInner::Ident {
                name: String::from(name),
                value,
            },
        )
    }

    fn analyze_unary(&mut self, op: UnaryOp, operand: &ast::Expr, span: &Span) -> Expr {
        let operand = self.analyze(operand);
        let (arg_ty, result_ty) = unary_signature(op);

        let ty = if operand.ty == arg_ty {
            result_ty
        } else {
            self.error(
                TypeErrorKind::UnaryOperandMismatch {
                    op,
                    expected: arg_ty,
                    found: operand.ty,
                },
                span,
            );
            Type::Error
        };

        Expr::new(
            ty,
            span.clone(),
            ExprInner::Unary {
                op,
                expr: Box::new(operand),
            },
        )
    }

    fn analyze_binary(
        &mut self,
        op: BinaryOp,
        left: &ast::Expr,
        right: &ast::Expr,
        span: &Span,
    ) -> Expr {
        let left = self.analyze(left);
        let right = self.analyze(right);
        let (lhs_ty, rhs_ty, result_ty) = binary_signature(op);

        let ty = if left.ty == lhs_ty && right.ty == rhs_ty {
            result_ty
        } else {
            self.error(
                TypeErrorKind::BinaryOperandMismatch {
                    op,
                    expected: (lhs_ty, rhs_ty),
                    found: (left.ty, right.ty),
                },
                span,
            );
            Type::Error
        };

        binary(ty, span, op, left, right)
    }

    fn analyze_equality(
        &mut self,
        op: BinaryOp,
        left: &ast::Expr,
        right: &ast::Expr,
        span: &Span,
    ) -> Expr {
        let left = self.analyze(left);
        let right = self.analyze(right);

        // An `Error` operand never matches: its own diagnostic already exists.
        let ty = if left.ty == right.ty && !left.is_error() {
            Type::Bool
        } else {
            self.error(
                TypeErrorKind::NotEqualityComparable {
                    op,
                    left: left.ty,
                    right: right.ty,
                },
                span,
            );
            Type::Error
        };

        binary(ty, span, op, left, right)
    }

    fn analyze_if(
        &mut self,
        cond: &ast::Expr,
        then_branch: &ast::Expr,
        else_branch: &ast::Expr,
        span: &Span,
    ) -> Expr {
        // All three are checked regardless of earlier failures.
        let cond = self.analyze(cond);
        let then_branch = self.analyze(then_branch);
        let else_branch = self.analyze(else_branch);

        let ty = if cond.ty != Type::Bool {
            self.error(TypeErrorKind::NonBoolCondition { found: cond.ty }, &cond.span);
            Type::Error
        } else if then_branch.ty != else_branch.ty {
            self.error(
                TypeErrorKind::BranchMismatch {
                    then_ty: then_branch.ty,
                    else_ty: else_branch.ty,
                },
                span,
            );
            Type::Error
        } else {
            then_branch.ty
        };

        Expr::new(
            ty,
            span.clone(),
            ExprInner::If {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
        )
    }

    fn analyze_lambda(&mut self, span: &Span) -> Expr {
        self.error(
            TypeErrorKind::UnsupportedFeature {
                feature: "Functions",
            },
            span,
        );
        Expr::new(Type::Error, span.clone(), ExprInner::Lambda)
    }

    fn analyze_definition(
        &mut self,
        name: &str,
        declared: Option<Type>,
        value: &ast::Expr,
        span: &Span,
    ) -> Expr {
        let top_level = self.depth == 1;
        let value = self.analyze(value);

        let binding_ty = match declared {
            Some(declared) => {
                if declared != value.ty {
                    self.error(
                        TypeErrorKind::DefinitionTypeMismatch {
                            name: String::from(name),
                            declared,
                            inferred: value.ty,
                        },
                        span,
                    );
                }
                declared
            }
            None => value.ty,
        };

        if !top_level {
            self.error(
                TypeErrorKind::NestedDefinition {
                    name: String::from(name),
                },
                span,
            );
        }

        // Literals are the only foldable form.
        let constant = match &value.inner {
            ExprInner::Constant(constant) => Some(constant.clone()),
            _ => None,
        };
        if constant.is_none() {
            self.error(
                TypeErrorKind::NonConstantDefinition {
                    name: String::from(name),
                },
                &value.span,
            );
        }

        if self.options.shadowing == SameScopeShadowing::Error && self.globals.contains(name) {
            self.error(
                TypeErrorKind::Redefinition {
                    name: String::from(name),
                },
                span,
            );
        }

        // Only a statement that raised no diagnostic may install its binding.
        let ty = match constant {
            Some(constant) if !self.panic_mode => {
                tracing::debug!(name, ty = %binding_ty, value = %constant, "Installing global binding");
                self.globals.insert(name, binding_ty, constant);
                Type::Unit
            }
            _ => Type::Error,
        };

        Expr::new(
            ty,
            span.clone(),
            ExprInner::Definition {
                name: String::from(name),
                value: Box::new(value),
            },
        )
    }
}

fn binary(ty: Type, span: &Span, op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::new(
        ty,
        span.clone(),
        ExprInner::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
    )
}

/// `(argument, result)` type of a unary operator.
fn unary_signature(op: UnaryOp) -> (Type, Type) {
    match op {
        UnaryOp::Neg => (Type::Number, Type::Number),
        UnaryOp::Not => (Type::Bool, Type::Bool),
    }
}

/// `(lhs, rhs, result)` type of a non-equality binary operator.
fn binary_signature(op: BinaryOp) -> (Type, Type, Type) {
    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
            (Type::Number, Type::Number, Type::Number)
        }
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            (Type::Number, Type::Number, Type::Bool)
        }
        BinaryOp::Eq | BinaryOp::Neq => unreachable!("equality operators are polymorphic"),
    }
}
