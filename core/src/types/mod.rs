//! The closed set of EML types.

use core::fmt;

/// A language type.
///
/// Types are plain values compared structurally. `Error` is not a type a
/// program can mention: it marks a node whose analysis already failed, so
/// that enclosing nodes do not report the same problem again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Number,
    Bool,
    Unit,
    String,
    Error,
}

impl Type {
    pub fn name(self) -> &'static str {
        match self {
            Type::Number => "Number",
            Type::Bool => "Bool",
            Type::Unit => "Unit",
            Type::String => "String",
            Type::Error => "Error",
        }
    }

    pub fn is_error(self) -> bool {
        self == Type::Error
    }
}

impl fmt::Display for Type {
    // `pad` so that width and alignment flags line up diagnostic tables.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
