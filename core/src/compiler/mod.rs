//! Bytecode compiler for EML expressions.
//!
//! This module transforms typed expressions into VM bytecode.
//!
//! ## Design
//!
//! - Post-order traversal: operands first, then the operator's opcode
//! - Tracks stack depth precisely to record `max_stack_size`
//! - Implements jump patching for if/else
//! - Single-byte operands; overflowing them is a [`CompileError`], never a wrap

mod bytecode;
mod error;


pub use bytecode::BytecodeCompiler;
pub use error::CompileError;
