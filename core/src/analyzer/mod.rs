pub mod analyzer;
pub mod error;
pub mod typed_expr;


pub use analyzer::{analyze, analyze_program};
pub use error::{TypeError, TypeErrorKind};
