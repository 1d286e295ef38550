//! Public API of the EML front end.
//!
//! A [`Compiler`] session runs the two passes over parsed trees:
//!
//! 1. **Type checking** (`type_check` / `check_program`): produces a typed
//!    tree or the collected diagnostics, and installs definitions.
//! 2. **Code generation** (`generate_code` / `generate_program`): produces
//!    [`crate::vm::Bytecode`] plus the result type.
//!
//! # Example
//!
//! ```
//! use eml_core::api::{Compiler, CompilerOptions};
//! use eml_core::ast::Expr;
//! use eml_core::types::Type;
//!
//! let mut compiler = Compiler::new(CompilerOptions::default());
//! let program = [
//!     Expr::definition("x", None, Expr::literal(true)),
//!     Expr::ident("x"),
//! ];
//! let (_bytecode, ty) = compiler.compile_program(&program).unwrap();
//! assert_eq!(ty, Type::Bool);
//! ```

pub mod compiler;
pub mod error;
pub mod globals;
pub mod options;

#[cfg(test)]
mod compiler_test;

pub use compiler::Compiler;
pub use error::{Diagnostic, Error};
pub use globals::{Binding, Globals};
pub use options::{CompilerOptions, SameScopeShadowing};
