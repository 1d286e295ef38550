//! Bytecode compilation errors.

use crate::api::Diagnostic;
use crate::syntax::Span;
use crate::{String, ToString};

/// Errors that can occur during bytecode compilation.
///
/// Operands are single bytes, so large programs can legitimately exceed the
/// encoding. Type-related errors are caught by the analyzer before
/// compilation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// More than 256 distinct constants
    #[error("Too many constants (limit: 256)")]
    TooManyConstants,
    /// Jump distance exceeds a single-byte operand
    #[error("Jump distance {distance} too large (limit: 255 bytes)")]
    JumpTooFar { distance: usize },
    /// Construct the generator cannot lower
    #[error("Cannot generate code for {0}")]
    UnsupportedConstruct(&'static str),
}

impl CompileError {
    /// Convert to a Diagnostic for API boundary.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            message: self.to_string(),
            span: Span::default(),
            help: match self {
                CompileError::TooManyConstants | CompileError::JumpTooFar { .. } => {
                    Some(String::from("Split the program into smaller expressions"))
                }
                CompileError::UnsupportedConstruct(_) => None,
            },
            code: None,
        }
    }
}
