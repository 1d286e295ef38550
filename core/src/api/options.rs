//! Configuration options for a compiler session.

/// What happens when a top-level definition reuses a name that is already
/// bound in the same session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameScopeShadowing {
    /// The new definition shadows the old one. The old binding is replaced,
    /// never mutated.
    Allow,
    /// The redefinition is reported as a type error.
    #[default]
    Error,
}

/// Configuration options for compilation.
///
/// # Example
///
/// ```
/// use eml_core::api::{CompilerOptions, SameScopeShadowing};
///
/// let options = CompilerOptions {
///     shadowing: SameScopeShadowing::Allow,
/// };
/// assert_ne!(options.shadowing, CompilerOptions::default().shadowing);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CompilerOptions {
    /// Policy for redefining a global in the same session.
    ///
    /// Default: `SameScopeShadowing::Error`
    pub shadowing: SameScopeShadowing,
}
