use super::*;
use crate::{String, Vec, values::Value};
use pretty_assertions::assert_eq;

#[test]
fn test_write_records_lines() {
    let mut code = Bytecode::new();
    assert!(code.is_empty());
    assert_eq!(code.write_op(OpCode::PushTrue, 1), 0);
    assert_eq!(code.write_op(OpCode::Not, 2), 1);
    assert_eq!(code.next_instruction_index(), 2);
    assert_eq!(code.lines(), &[1, 2]);
    assert_eq!(code.line_at(1), Some(2));
    assert_eq!(code.line_at(2), None);
}

#[test]
fn test_constants_are_deduplicated() {
    let mut code = Bytecode::new();
    assert_eq!(code.add_constant(Value::Number(3.0)), Some(0));
    assert_eq!(code.add_constant(Value::from("three")), Some(1));
    assert_eq!(code.add_constant(Value::Number(3.0)), Some(0));
    assert_eq!(code.add_constant(Value::Number(-0.0)), Some(2));
    assert_eq!(code.constants().len(), 3);
    assert_eq!(code.constant(1), Some(&Value::from("three")));
}

#[test]
fn test_constant_pool_is_capped_at_256() {
    let mut code = Bytecode::new();
    for i in 0..256 {
        assert_eq!(code.add_constant(Value::Number(i as f64)), Some(i as u8));
    }
    assert_eq!(code.add_constant(Value::Number(256.0)), None);
    // Existing constants are still reachable.
    assert_eq!(code.add_constant(Value::Number(255.0)), Some(255));
}

#[test]
fn test_write_at_patches_operand() {
    let mut code = Bytecode::new();
    code.write_op(OpCode::Jump, 0);
    let placeholder = code.write(0, 0);
    code.write_op(OpCode::PushUnit, 0);
    code.write_at(placeholder, 1);
    assert_eq!(
        code.decode(),
        Ok(Vec::from([Instruction::Jump(1), Instruction::PushUnit]))
    );
}

#[test]
fn test_instructions_stop_at_malformed_byte() {
    let mut code = Bytecode::new();
    code.write_op(OpCode::PushTrue, 0);
    code.write(0xff, 0);
    code.write_op(OpCode::PushFalse, 0);

    let decoded: Vec<_> = code.instructions().collect();
    assert_eq!(
        decoded,
        Vec::from([
            (0, Ok(Instruction::PushTrue)),
            (1, Err(DecodeError::UnknownOpcode(0xff))),
        ])
    );
    assert_eq!(code.decode(), Err(DecodeError::UnknownOpcode(0xff)));
}

#[test]
fn test_disassemble_labels_jump_targets() {
    // if true then 1 else ()
    let mut code = Bytecode::new();
    code.write_op(OpCode::PushTrue, 1);
    code.write_op(OpCode::JumpIfFalse, 1);
    code.write(4, 1);
    code.write_op(OpCode::PushConstant, 2);
    let one = code.add_constant(Value::Number(1.0)).unwrap();
    code.write(one, 2);
    code.write_op(OpCode::Jump, 2);
    code.write(1, 2);
    code.write_op(OpCode::PushUnit, 3);

    let expected = String::from(
        "constants: [\n  [0] = 1\n]\ninstructions:\n  0000         1  PushTrue\n  0001         1  JumpIfFalse 4 (to L0)\n  0003         2  PushConstant 0 (1)\n  0005         2  Jump 1 (to L1)\n  0007  L0:    3  PushUnit\n  0008  L1:\n",
    );
    assert_eq!(code.disassemble(), expected);
}

#[test]
fn test_disassemble_empty() {
    assert_eq!(
        Bytecode::new().disassemble(),
        "constants: []\ninstructions:\n"
    );
}
