use core::fmt;
use core::fmt::Write;

use hashbrown::HashMap;

use crate::{
    String, Vec,
    values::Value,
    vm::{DecodeError, Instruction, OpCode},
};

/// Compiled program handed to the virtual machine.
///
/// The byte stream, the constant pool and the line table are append-only
/// while the generator runs and read-only afterwards.
#[derive(Clone, Default, PartialEq)]
pub struct Bytecode {
    code: Vec<u8>,
    constants: Vec<Value>,
    /// Source line of every byte in `code` (0 when unknown).
    lines: Vec<u32>,
    /// Deepest operand stack the program can reach.
    pub max_stack_size: usize,
}

impl Bytecode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one byte and return its index.
    pub fn write(&mut self, byte: u8, line: u32) -> usize {
        self.code.push(byte);
        self.lines.push(line);
        self.code.len() - 1
    }

    pub fn write_op(&mut self, op: OpCode, line: u32) -> usize {
        self.write(op.into(), line)
    }

    /// Overwrite a previously written byte (jump patching).
    pub fn write_at(&mut self, index: usize, byte: u8) {
        self.code[index] = byte;
    }

    pub fn next_instruction_index(&self) -> usize {
        self.code.len()
    }

    /// Add a constant to the pool (or reuse an identical one) and return its index.
    ///
    /// Returns `None` once the pool holds 256 distinct constants.
    pub fn add_constant(&mut self, value: Value) -> Option<u8> {
        if let Some(existing) = self
            .constants
            .iter()
            .position(|constant| constant.is_same_constant(&value))
        {
            return u8::try_from(existing).ok();
        }

        let index = u8::try_from(self.constants.len()).ok()?;
        self.constants.push(value);
        Some(index)
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn constants(&self) -> &[Value] {
        &self.constants
    }

    pub fn constant(&self, index: u8) -> Option<&Value> {
        self.constants.get(index as usize)
    }

    pub fn lines(&self) -> &[u32] {
        &self.lines
    }

    pub fn line_at(&self, offset: usize) -> Option<u32> {
        self.lines.get(offset).copied()
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Iterate over `(offset, instruction)` pairs.
    ///
    /// Stops after the first malformed instruction.
    pub fn instructions(&self) -> Instructions<'_> {
        Instructions {
            code: &self.code,
            offset: 0,
            failed: false,
        }
    }

    /// Decode the whole stream, dropping offsets.
    pub fn decode(&self) -> Result<Vec<Instruction>, DecodeError> {
        self.instructions()
            .map(|(_, instruction)| instruction)
            .collect()
    }

    /// Human-readable listing of the constant pool and the instructions.
    ///
    /// Jump targets get labels (`L0`, `L1`, ...) in address order.
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_listing(&mut out);
        out
    }

    fn write_listing(&self, out: &mut String) -> fmt::Result {
        if self.constants.is_empty() {
            writeln!(out, "constants: []")?;
        } else {
            writeln!(out, "constants: [")?;
            for (i, constant) in self.constants.iter().enumerate() {
                writeln!(out, "  [{}] = {}", i, constant)?;
            }
            writeln!(out, "]")?;
        }

        // First pass: collect all jump targets to determine which addresses need labels
        let mut targets: Vec<usize> = self
            .instructions()
            .filter_map(|(offset, instruction)| instruction.ok()?.jump_target(offset))
            .collect();
        targets.sort_unstable();
        targets.dedup();
        let labels: HashMap<usize, usize> = targets
            .into_iter()
            .enumerate()
            .map(|(label, addr)| (addr, label))
            .collect();
        let label_of = |addr: usize| {
            labels
                .get(&addr)
                .map(|label| alloc::format!("L{}:", label))
                .unwrap_or_default()
        };

        // Second pass: print instructions with labels
        writeln!(out, "instructions:")?;
        for (offset, instruction) in self.instructions() {
            let line = self.lines[offset];
            match instruction {
                Ok(instruction) => {
                    write!(out, "  {:04} {:>4} {:>4}  {}", offset, label_of(offset), line, instruction)?;
                    if let Instruction::PushConstant(index) = instruction {
                        match self.constant(index) {
                            Some(value) => write!(out, " ({})", value)?,
                            None => write!(out, " (<missing>)")?,
                        }
                    }
                    if let Some(target) = instruction.jump_target(offset) {
                        let target_label = labels
                            .get(&target)
                            .map(|label| alloc::format!("L{}", label))
                            .unwrap_or_else(|| alloc::format!("@{}", target));
                        write!(out, " (to {})", target_label)?;
                    }
                    writeln!(out)?;
                }
                Err(err) => writeln!(out, "  {:04} {:>4} {:>4}  <{}>", offset, label_of(offset), line, err)?,
            }
        }

        // A jump may land just past the last instruction.
        if labels.contains_key(&self.code.len()) {
            writeln!(out, "  {:04} {:>4}", self.code.len(), label_of(self.code.len()))?;
        }
        Ok(())
    }
}

/// Iterator returned by [`Bytecode::instructions`].
pub struct Instructions<'a> {
    code: &'a [u8],
    offset: usize,
    failed: bool,
}

impl Iterator for Instructions<'_> {
    type Item = (usize, Result<Instruction, DecodeError>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.code.len() {
            return None;
        }
        let offset = self.offset;
        match Instruction::decode(self.code, offset) {
            Ok(instruction) => {
                self.offset += instruction.size();
                Some((offset, Ok(instruction)))
            }
            Err(err) => {
                self.failed = true;
                Some((offset, Err(err)))
            }
        }
    }
}

impl fmt::Display for Bytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.disassemble())
    }
}

impl fmt::Debug for Bytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bytecode {{")?;
        writeln!(f, "  max_stack_size: {}", self.max_stack_size)?;
        for line in self.disassemble().lines() {
            writeln!(f, "  {}", line)?;
        }
        write!(f, "}}")
    }
}
