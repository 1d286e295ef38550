//! Bytecode compiler implementation.

use crate::{
    analyzer::typed_expr::{Expr, ExprInner},
    ast::{BinaryOp, UnaryOp},
    compiler::CompileError,
    syntax::LineIndex,
    types::Type,
    values::Value,
    vm::{Bytecode, OpCode},
};

/// Bytecode compiler that transforms typed expressions into VM bytecode.
///
/// Operands are emitted before their operator, matching the evaluation order
/// of a stack machine. The operand stack is tracked exactly so that the
/// resulting [`Bytecode`] knows its maximum stack depth.
///
/// The input must come from a successful analysis: meeting an `Error`-typed
/// node here is a broken contract between the passes and panics.
pub struct BytecodeCompiler<'l> {
    chunk: Bytecode,
    lines: &'l LineIndex,
    current_stack_depth: usize,
}

impl<'l> BytecodeCompiler<'l> {
    /// Create a new bytecode compiler.
    pub fn new(lines: &'l LineIndex) -> Self {
        Self {
            chunk: Bytecode::new(),
            lines,
            current_stack_depth: 0,
        }
    }

    /// Finalize compilation and return the bytecode.
    pub fn finalize(self) -> Bytecode {
        tracing::trace!(
            bytes = self.chunk.len(),
            constants = self.chunk.constants().len(),
            "Finished code generation"
        );
        self.chunk
    }

    /// Convenience method to compile an expression in one call.
    pub fn compile(expr: &Expr, lines: &'l LineIndex) -> Result<Bytecode, CompileError> {
        let mut compiler = Self::new(lines);
        compiler.transform(expr)?;
        Ok(compiler.finalize())
    }

    /// Compile a sequence of top-level statements.
    ///
    /// The value of every statement but the last is discarded, so only the
    /// last statement's value remains on the stack. Definitions leave nothing.
    pub fn compile_program(roots: &[Expr], lines: &'l LineIndex) -> Result<Bytecode, CompileError> {
        let mut compiler = Self::new(lines);
        for (i, root) in roots.iter().enumerate() {
            compiler.transform(root)?;
            let is_last = i + 1 == roots.len();
            if !is_last && !matches!(root.inner, ExprInner::Definition { .. }) {
                let line = compiler.line_of(root);
                compiler.pop_stack();
                compiler.emit(OpCode::Pop, line);
            }
        }
        Ok(compiler.finalize())
    }

    // === Stack Management ===

    /// Push a value onto the stack (increases depth by 1).
    fn push_stack(&mut self) {
        self.current_stack_depth += 1;
        if self.current_stack_depth > self.chunk.max_stack_size {
            self.chunk.max_stack_size = self.current_stack_depth;
        }
    }

    /// Pop a value from the stack (decreases depth by 1).
    fn pop_stack(&mut self) {
        debug_assert!(self.current_stack_depth > 0, "Stack underflow");
        self.current_stack_depth -= 1;
    }

    // === Instruction Emission ===

    fn line_of(&self, expr: &Expr) -> u32 {
        self.lines.line_of(expr.span.0.start)
    }

    fn emit(&mut self, op: OpCode, line: u32) -> usize {
        self.chunk.write_op(op, line)
    }

    fn emit_constant(&mut self, value: &Value, line: u32) -> Result<(), CompileError> {
        let index = self
            .chunk
            .add_constant(value.clone())
            .ok_or(CompileError::TooManyConstants)?;
        self.emit(OpCode::PushConstant, line);
        self.chunk.write(index, line);
        Ok(())
    }

    // === Jump Patching Infrastructure ===

    /// Emit `op` followed by a placeholder operand and return the
    /// placeholder's index, to be passed to [`Self::jump_patch`].
    fn write_jump(&mut self, op: OpCode, line: u32) -> usize {
        debug_assert!(op.is_jump());
        self.emit(op, line);
        self.chunk.write(0, line)
    }

    /// Make the jump whose operand sits at `index` land at the current end
    /// of the code.
    fn jump_patch(&mut self, index: usize) -> Result<(), CompileError> {
        // The VM reads the offset after consuming the operand byte.
        let distance = self.chunk.next_instruction_index() - index - 1;
        let offset = u8::try_from(distance).map_err(|_| CompileError::JumpTooFar { distance })?;
        tracing::trace!(index, distance, "Patched jump");
        self.chunk.write_at(index, offset);
        Ok(())
    }

    // === Tree Traversal ===

    fn transform(&mut self, expr: &Expr) -> Result<(), CompileError> {
        let line = self.line_of(expr);
        if expr.is_error() && !matches!(expr.inner, ExprInner::Lambda) {
            panic!("Error-typed node reached code generation (should be caught by type checker)");
        }

        match &expr.inner {
            ExprInner::Constant(value) => self.push_value(expr.ty, value, line),

            ExprInner::Ident { name, value } => match value {
                Some(value) => self.push_value(expr.ty, value, line),
                None => unreachable!("unresolved identifier `{}` reached code generation", name),
            },

            ExprInner::Unary { op, expr } => {
                self.transform(expr)?;
                // Pops 1, pushes 1: depth unchanged.
                self.emit(unary_opcode(*op), line);
                Ok(())
            }

            ExprInner::Binary { op, left, right } => {
                self.transform(left)?;
                self.transform(right)?;
                // Pops 2, pushes 1.
                self.pop_stack();
                self.emit(binary_opcode(*op), line);
                Ok(())
            }

            ExprInner::If {
                cond,
                then_branch,
                else_branch,
            } => {
                debug_assert_eq!(cond.ty, Type::Bool, "Type of condition must be boolean");
                debug_assert_eq!(
                    then_branch.ty, else_branch.ty,
                    "Type of different branches must match"
                );

                self.transform(cond)?;
                self.pop_stack(); // Condition consumed by JumpIfFalse
                let else_jump = self.write_jump(OpCode::JumpIfFalse, line);

                // Only one branch executes, so both start from the same depth.
                let depth_before_branches = self.current_stack_depth;
                self.transform(then_branch)?;
                let end_jump = self.write_jump(OpCode::Jump, line);

                self.jump_patch(else_jump)?;
                self.current_stack_depth = depth_before_branches;
                self.transform(else_branch)?;

                self.jump_patch(end_jump)?;
                Ok(())
            }

            ExprInner::Lambda => Err(CompileError::UnsupportedConstruct("lambda expressions")),

            // Definitions only register a global, which the analyzer already did.
            ExprInner::Definition { .. } => Ok(()),
        }
    }

    /// Push a literal or resolved identifier, dispatching on its type.
    fn push_value(&mut self, ty: Type, value: &Value, line: u32) -> Result<(), CompileError> {
        match ty {
            Type::Number | Type::String => self.emit_constant(value, line)?,
            Type::Bool => {
                if value.as_bool() == Some(true) {
                    self.emit(OpCode::PushTrue, line);
                } else {
                    self.emit(OpCode::PushFalse, line);
                }
            }
            Type::Unit => {
                self.emit(OpCode::PushUnit, line);
            }
            Type::Error => unreachable!("Error-typed value reached code generation"),
        }
        self.push_stack();
        Ok(())
    }
}

fn unary_opcode(op: UnaryOp) -> OpCode {
    match op {
        UnaryOp::Neg => OpCode::Negate,
        UnaryOp::Not => OpCode::Not,
    }
}

fn binary_opcode(op: BinaryOp) -> OpCode {
    match op {
        BinaryOp::Add => OpCode::Add,
        BinaryOp::Sub => OpCode::Subtract,
        BinaryOp::Mul => OpCode::Multiply,
        BinaryOp::Div => OpCode::Divide,
        BinaryOp::Eq => OpCode::Equal,
        BinaryOp::Neq => OpCode::NotEqual,
        BinaryOp::Lt => OpCode::Less,
        BinaryOp::Le => OpCode::LessEqual,
        BinaryOp::Gt => OpCode::Greater,
        BinaryOp::Ge => OpCode::GreaterEqual,
    }
}
