//! EML - a small, statically typed expression language
//!
//! # Overview
//!
//! This crate is the front end of the EML toolchain. It takes parsed
//! expressions, checks their types, and lowers them to compact stack-machine
//! bytecode:
//!
//! - Numbers, booleans, strings and unit
//! - Arithmetic, comparison and equality operators
//! - `if` expressions and top-level constant definitions
//!
//! # Quick Start
//!
//! ```
//! use eml::{BinaryOp, Compiler, CompilerOptions, Expr, Type};
//!
//! let mut compiler = Compiler::new(CompilerOptions::default());
//! compiler.define_global("limit", 10.0);
//!
//! // limit > 3
//! let expr = Expr::binary(BinaryOp::Gt, Expr::ident("limit"), Expr::literal(3.0));
//! let (bytecode, ty) = compiler.compile(&expr).unwrap();
//! assert_eq!(ty, Type::Bool);
//! println!("{}", bytecode.disassemble());
//! ```
//!
//! # Diagnostics
//!
//! Type errors are reported through [`Error::Compilation`]. Use
//! [`render_error_to_string`] and friends to show them against the source
//! text the trees were parsed from.

mod error_renderer;

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};

// Re-export public API from eml_core
pub use eml_core::api::{
    Binding, Compiler, CompilerOptions, Diagnostic, Error, Globals, SameScopeShadowing,
};

// Re-export the tree, type and value model
pub use eml_core::ast::{self, BinaryOp, Expr, ExprKind, UnaryOp};
pub use eml_core::syntax::{LineIndex, Span};
pub use eml_core::types::{self, Type};
pub use eml_core::values::{self, Value};

// Re-export pass outputs and their errors
pub use eml_core::analyzer::{self, TypeError, TypeErrorKind};
pub use eml_core::compiler::CompileError;
pub use eml_core::vm::{self, Bytecode, DecodeError, Instruction, OpCode};
