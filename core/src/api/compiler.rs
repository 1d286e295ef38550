//! The EML compiler session.

use super::{Binding, CompilerOptions, Error, Globals};
use crate::analyzer::{self, TypeError, typed_expr};
use crate::compiler::{BytecodeCompiler, CompileError};
use crate::syntax::LineIndex;
use crate::types::Type;
use crate::values::Value;
use crate::vm::Bytecode;
use crate::{Vec, ast};

/// A compilation session.
///
/// The session owns the global binding table: definitions that type check
/// are installed here and stay visible to every later statement of the
/// session. Both passes read the table through the session, so there is no
/// ambient state; dropping the session discards its bindings.
///
/// # Example
///
/// ```
/// use eml_core::api::{Compiler, CompilerOptions};
/// use eml_core::ast::{BinaryOp, Expr};
/// use eml_core::types::Type;
///
/// let mut compiler = Compiler::new(CompilerOptions::default());
/// let expr = Expr::binary(BinaryOp::Add, Expr::literal(2.0), Expr::literal(3.0));
/// let (bytecode, ty) = compiler.compile(&expr).unwrap();
/// assert_eq!(ty, Type::Number);
/// assert_eq!(bytecode.constants().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompilerOptions,
    globals: Globals,
    lines: LineIndex,
}

impl Compiler {
    /// Create a session without source text; bytecode lines are reported as 0.
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            options,
            globals: Globals::new(),
            lines: LineIndex::default(),
        }
    }

    /// Create a session for trees parsed from `source`.
    ///
    /// Spans of the trees are mapped to line numbers in the emitted bytecode.
    pub fn with_source(options: CompilerOptions, source: &str) -> Self {
        Self {
            options,
            globals: Globals::new(),
            lines: LineIndex::new(source),
        }
    }

    /// Access the compiler options.
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Access the global binding table.
    pub fn globals(&self) -> &Globals {
        &self.globals
    }

    pub fn global(&self, name: &str) -> Option<&Binding> {
        self.globals.get(name)
    }

    /// Register a host-provided constant.
    ///
    /// Its type is the type of `value`. An existing binding of the same name
    /// is replaced.
    pub fn define_global(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        self.globals.insert(name, value.ty(), value);
    }

    /// Type check one top-level expression or definition.
    pub fn type_check(&mut self, expr: &ast::Expr) -> Result<typed_expr::Expr, Vec<TypeError>> {
        analyzer::analyze(&mut self.globals, &self.options, expr)
    }

    /// Type check a sequence of top-level statements.
    pub fn check_program(
        &mut self,
        roots: &[ast::Expr],
    ) -> Result<Vec<typed_expr::Expr>, Vec<TypeError>> {
        analyzer::analyze_program(&mut self.globals, &self.options, roots)
    }

    /// Generate bytecode for a successfully checked tree.
    ///
    /// Returns the bytecode together with the type of its result.
    pub fn generate_code(
        &self,
        expr: &typed_expr::Expr,
    ) -> Result<(Bytecode, Type), CompileError> {
        let code = BytecodeCompiler::compile(expr, &self.lines)?;
        Ok((code, expr.ty))
    }

    /// Generate bytecode for successfully checked statements.
    ///
    /// The result type is the type of the last statement, `Unit` for an
    /// empty program.
    pub fn generate_program(
        &self,
        roots: &[typed_expr::Expr],
    ) -> Result<(Bytecode, Type), CompileError> {
        let code = BytecodeCompiler::compile_program(roots, &self.lines)?;
        let ty = roots.last().map_or(Type::Unit, |root| root.ty);
        Ok((code, ty))
    }

    /// Type check and generate bytecode in one call.
    pub fn compile(&mut self, expr: &ast::Expr) -> Result<(Bytecode, Type), Error> {
        let typed = self.type_check(expr)?;
        Ok(self.generate_code(&typed)?)
    }

    /// Type check and generate bytecode for a whole program.
    pub fn compile_program(&mut self, roots: &[ast::Expr]) -> Result<(Bytecode, Type), Error> {
        let typed = self.check_program(roots)?;
        Ok(self.generate_program(&typed)?)
    }
}
