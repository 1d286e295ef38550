//! EML VM instruction set - variable-width byte encoding
//!
//! Every instruction is one opcode byte, optionally followed by a single
//! operand byte:
//! ```text
//! ┌────────────┬──────────────────┐
//! │   Opcode   │ Operand (0 or 1) │
//! │  (8 bits)  │     (8 bits)     │
//! └────────────┴──────────────────┘
//! ```
//!
//! # Operands
//!
//! - `PushConstant(index)`: index into the constant pool (0-255)
//! - `Jump(offset)`, `JumpIfFalse(offset)`: forward distance measured from
//!   the byte following the operand
//!
//! # Stack Discipline
//!
//! Stack effect notation: `[..., operand1, operand2] -> [..., result]`.
//! Opcodes carry no type information: the VM applies fixed-arity operations
//! to whatever is on top of its stack.

use core::fmt;

/// Instruction opcode as stored in the byte stream.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    // ========================================================================
    // Stack & Constants (0x01 - 0x0F)
    // ========================================================================
    /// Push constant from pool
    /// Operand: u8 index | Stack: [...] -> [..., value]
    PushConstant = 0x01,

    /// Stack: [...] -> [..., true]
    PushTrue = 0x02,

    /// Stack: [...] -> [..., false]
    PushFalse = 0x03,

    /// Stack: [...] -> [..., ()]
    PushUnit = 0x04,

    /// Discard the result of a statement
    /// Stack: [..., a] -> [...]
    Pop = 0x05,

    // ========================================================================
    // Unary (0x10 - 0x1F)
    // ========================================================================
    /// Stack: [..., a: Number] -> [..., -a: Number]
    Negate = 0x10,

    /// Stack: [..., a: Bool] -> [..., !a: Bool]
    Not = 0x11,

    // ========================================================================
    // Arithmetic (0x20 - 0x2F)
    // ========================================================================
    /// Stack: [..., a: Number, b: Number] -> [..., a + b: Number]
    Add = 0x20,
    Subtract = 0x21,
    Multiply = 0x22,
    Divide = 0x23,

    // ========================================================================
    // Comparison (0x30 - 0x3F)
    // ========================================================================
    /// Stack: [..., a: T, b: T] -> [..., a == b: Bool]
    Equal = 0x30,
    NotEqual = 0x31,

    /// Stack: [..., a: Number, b: Number] -> [..., a < b: Bool]
    Less = 0x32,
    LessEqual = 0x33,
    Greater = 0x34,
    GreaterEqual = 0x35,

    // ========================================================================
    // Control Flow (0x40 - 0x4F)
    // ========================================================================
    /// Unconditional forward jump
    /// Operand: u8 offset | Stack: unchanged
    Jump = 0x40,

    /// Pop the condition and jump forward if it is false
    /// Operand: u8 offset | Stack: [..., cond: Bool] -> [...]
    JumpIfFalse = 0x41,
}

static_assertions::assert_eq_size!(OpCode, u8);

impl OpCode {
    /// Number of operand bytes following the opcode.
    pub fn operand_count(self) -> usize {
        match self {
            OpCode::PushConstant | OpCode::Jump | OpCode::JumpIfFalse => 1,
            _ => 0,
        }
    }

    pub fn is_jump(self) -> bool {
        matches!(self, OpCode::Jump | OpCode::JumpIfFalse)
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::PushConstant => "PushConstant",
            OpCode::PushTrue => "PushTrue",
            OpCode::PushFalse => "PushFalse",
            OpCode::PushUnit => "PushUnit",
            OpCode::Pop => "Pop",
            OpCode::Negate => "Negate",
            OpCode::Not => "Not",
            OpCode::Add => "Add",
            OpCode::Subtract => "Subtract",
            OpCode::Multiply => "Multiply",
            OpCode::Divide => "Divide",
            OpCode::Equal => "Equal",
            OpCode::NotEqual => "NotEqual",
            OpCode::Less => "Less",
            OpCode::LessEqual => "LessEqual",
            OpCode::Greater => "Greater",
            OpCode::GreaterEqual => "GreaterEqual",
            OpCode::Jump => "Jump",
            OpCode::JumpIfFalse => "JumpIfFalse",
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> Self {
        op as u8
    }
}

impl TryFrom<u8> for OpCode {
    type Error = DecodeError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Ok(match byte {
            0x01 => OpCode::PushConstant,
            0x02 => OpCode::PushTrue,
            0x03 => OpCode::PushFalse,
            0x04 => OpCode::PushUnit,
            0x05 => OpCode::Pop,
            0x10 => OpCode::Negate,
            0x11 => OpCode::Not,
            0x20 => OpCode::Add,
            0x21 => OpCode::Subtract,
            0x22 => OpCode::Multiply,
            0x23 => OpCode::Divide,
            0x30 => OpCode::Equal,
            0x31 => OpCode::NotEqual,
            0x32 => OpCode::Less,
            0x33 => OpCode::LessEqual,
            0x34 => OpCode::Greater,
            0x35 => OpCode::GreaterEqual,
            0x40 => OpCode::Jump,
            0x41 => OpCode::JumpIfFalse,
            other => return Err(DecodeError::UnknownOpcode(other)),
        })
    }
}

/// A decoded instruction: opcode plus operand.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Instruction {
    PushConstant(u8),
    PushTrue,
    PushFalse,
    PushUnit,
    Pop,
    Negate,
    Not,
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Jump(u8),
    JumpIfFalse(u8),
}

impl Instruction {
    /// Decode the instruction starting at `offset`.
    pub fn decode(code: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let byte = *code.get(offset).ok_or(DecodeError::OutOfBounds(offset))?;
        let op = OpCode::try_from(byte)?;
        let operand = || {
            code.get(offset + 1)
                .copied()
                .ok_or(DecodeError::MissingOperand(op))
        };

        Ok(match op {
            OpCode::PushConstant => Instruction::PushConstant(operand()?),
            OpCode::PushTrue => Instruction::PushTrue,
            OpCode::PushFalse => Instruction::PushFalse,
            OpCode::PushUnit => Instruction::PushUnit,
            OpCode::Pop => Instruction::Pop,
            OpCode::Negate => Instruction::Negate,
            OpCode::Not => Instruction::Not,
            OpCode::Add => Instruction::Add,
            OpCode::Subtract => Instruction::Subtract,
            OpCode::Multiply => Instruction::Multiply,
            OpCode::Divide => Instruction::Divide,
            OpCode::Equal => Instruction::Equal,
            OpCode::NotEqual => Instruction::NotEqual,
            OpCode::Less => Instruction::Less,
            OpCode::LessEqual => Instruction::LessEqual,
            OpCode::Greater => Instruction::Greater,
            OpCode::GreaterEqual => Instruction::GreaterEqual,
            OpCode::Jump => Instruction::Jump(operand()?),
            OpCode::JumpIfFalse => Instruction::JumpIfFalse(operand()?),
        })
    }

    pub fn opcode(&self) -> OpCode {
        match self {
            Instruction::PushConstant(_) => OpCode::PushConstant,
            Instruction::PushTrue => OpCode::PushTrue,
            Instruction::PushFalse => OpCode::PushFalse,
            Instruction::PushUnit => OpCode::PushUnit,
            Instruction::Pop => OpCode::Pop,
            Instruction::Negate => OpCode::Negate,
            Instruction::Not => OpCode::Not,
            Instruction::Add => OpCode::Add,
            Instruction::Subtract => OpCode::Subtract,
            Instruction::Multiply => OpCode::Multiply,
            Instruction::Divide => OpCode::Divide,
            Instruction::Equal => OpCode::Equal,
            Instruction::NotEqual => OpCode::NotEqual,
            Instruction::Less => OpCode::Less,
            Instruction::LessEqual => OpCode::LessEqual,
            Instruction::Greater => OpCode::Greater,
            Instruction::GreaterEqual => OpCode::GreaterEqual,
            Instruction::Jump(_) => OpCode::Jump,
            Instruction::JumpIfFalse(_) => OpCode::JumpIfFalse,
        }
    }

    pub fn operand(&self) -> Option<u8> {
        match self {
            Instruction::PushConstant(operand)
            | Instruction::Jump(operand)
            | Instruction::JumpIfFalse(operand) => Some(*operand),
            _ => None,
        }
    }

    /// Encoded size in bytes.
    pub fn size(&self) -> usize {
        1 + self.opcode().operand_count()
    }

    /// Absolute target of a jump located at `offset`.
    pub fn jump_target(&self, offset: usize) -> Option<usize> {
        match self {
            Instruction::Jump(distance) | Instruction::JumpIfFalse(distance) => {
                Some(offset + self.size() + *distance as usize)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand() {
            Some(operand) => write!(f, "{} {}", self.opcode().mnemonic(), operand),
            None => write!(f, "{}", self.opcode().mnemonic()),
        }
    }
}

/// Malformed byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("unknown opcode 0x{0:02x}")]
    UnknownOpcode(u8),
    #[error("missing operand for {}", .0.mnemonic())]
    MissingOperand(OpCode),
    #[error("offset {0} is past the end of the code")]
    OutOfBounds(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToString;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_opcode_round_trips_through_byte() {
        for op in [OpCode::PushConstant, OpCode::Pop, OpCode::GreaterEqual, OpCode::JumpIfFalse] {
            assert_eq!(OpCode::try_from(u8::from(op)), Ok(op));
        }
        assert_eq!(OpCode::try_from(0x00), Err(DecodeError::UnknownOpcode(0x00)));
    }

    #[test]
    fn test_decode_with_operand() {
        let code = [OpCode::PushConstant as u8, 7, OpCode::Add as u8];
        assert_eq!(Instruction::decode(&code, 0), Ok(Instruction::PushConstant(7)));
        assert_eq!(Instruction::decode(&code, 2), Ok(Instruction::Add));
        assert_eq!(Instruction::decode(&code, 3), Err(DecodeError::OutOfBounds(3)));
    }

    #[test]
    fn test_decode_truncated_operand() {
        let code = [OpCode::Jump as u8];
        assert_eq!(
            Instruction::decode(&code, 0),
            Err(DecodeError::MissingOperand(OpCode::Jump))
        );
        assert_eq!(
            DecodeError::MissingOperand(OpCode::Jump).to_string(),
            "missing operand for Jump"
        );
    }

    #[test]
    fn test_jump_target_is_relative_to_next_instruction() {
        assert_eq!(Instruction::JumpIfFalse(5).jump_target(3), Some(10));
        assert_eq!(Instruction::Jump(0).jump_target(8), Some(10));
        assert_eq!(Instruction::Add.jump_target(0), None);
        assert_eq!(Instruction::JumpIfFalse(5).to_string(), "JumpIfFalse 5");
        assert_eq!(Instruction::Negate.size(), 1);
    }
}
