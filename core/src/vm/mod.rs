//! Bytecode format consumed by the stack-based virtual machine.
//!
//! The virtual machine itself lives outside this crate. It receives a
//! [`Bytecode`] together with the root [`crate::types::Type`] of the
//! compiled expression, which tells its caller how to read the final stack
//! value.

mod code;
mod instruction_set;

#[cfg(test)]
mod code_test;

pub use code::{Bytecode, Instructions};
pub use instruction_set::{DecodeError, Instruction, OpCode};
