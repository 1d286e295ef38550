//! Public error types for the EML API.
//!
//! Internal errors (type errors, code generation errors) are converted to
//! these types at the API boundary.

use core::fmt;

use crate::analyzer::TypeError;
use crate::compiler::CompileError;
use crate::syntax::Span;
use crate::{String, Vec};

/// Public error type for all compilation operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Type errors found by the analyzer, in source order.
    #[error("Compilation failed with {} error(s)", .diagnostics.len())]
    Compilation { diagnostics: Vec<Diagnostic> },

    /// The program does not fit the bytecode encoding.
    #[error(transparent)]
    Codegen(#[from] CompileError),
}

impl From<Vec<TypeError>> for Error {
    fn from(errors: Vec<TypeError>) -> Self {
        Error::Compilation {
            diagnostics: errors.iter().map(TypeError::to_diagnostic).collect(),
        }
    }
}

/// A diagnostic message with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Headline of the diagnostic.
    pub message: String,

    /// Source location of the primary issue.
    pub span: Span,

    /// Further explanation, e.g. a `Requires` / `Has` table.
    pub help: Option<String>,

    /// Optional error code (e.g., "E001") for documentation lookup.
    pub code: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}", self.message)?;

        if let Some(ref code) = self.code {
            write!(f, " [{}]", code)?;
        }

        if let Some(ref help) = self.help {
            write!(f, "\n{}", help)?;
        }

        Ok(())
    }
}
