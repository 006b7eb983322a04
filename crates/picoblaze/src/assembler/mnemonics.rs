//! The mnemonic table and the operand-shape rules for each entry.
//!
//! Generated once as a static array, per §9's design note: no runtime
//! reflection over opcode types, multi-word mnemonics included verbatim so
//! the longest-prefix match in `parse_mnemonic_and_operands` can find them.

use crate::error::PicoBlazeError;
use crate::instruction::{Condition, Instruction, Operand, ShiftOp};

/// Every recognized mnemonic, longest (2-word) entries included so the
/// tokenizer's longest-prefix-match has something to match against.
pub(super) const MNEMONICS: &[&str] = &[
    "ADD", "ADDCY", "ADDC", "SUB", "SUBCY", "SUBC",
    "AND", "OR", "XOR",
    "RL", "RR", "SL0", "SL1", "SLX", "SLA", "SR0", "SR1", "SRX", "SRA",
    "COMPARE", "COMP", "TEST",
    "FETCH", "STORE", "INPUT", "IN", "OUTPUT", "OUT", "LOAD", "OUTPUTK",
    "JUMP", "JUMP Z", "JUMP NZ", "JUMP C", "JUMP NC", "JUMP@",
    "CALL", "CALL Z", "CALL NZ", "CALL C", "CALL NC",
    "RETURN", "RETURN Z", "RETURN NZ", "RETURN C", "RETURN NC",
    "RET", "RET Z", "RET NZ", "RET C", "RET NC",
    "RETURNI ENABLE", "RETURNI DISABLE",
    "ENABLE INTERRUPT", "DISABLE INTERRUPT", "EINT", "DINT",
    "ADDRESS", "CONSTANT",
];

/// An operand after label/constant substitution: either a register index
/// or a plain integer value (destined to become a literal or an address).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ResolvedOperand {
    Register(u8),
    Value(i64),
}

fn as_operand(op: ResolvedOperand) -> Operand {
    match op {
        ResolvedOperand::Register(idx) => Operand::Register(idx),
        ResolvedOperand::Value(v) => Operand::Literal(v as u8),
    }
}

fn as_register(op: ResolvedOperand, context: &str) -> Result<u8, PicoBlazeError> {
    match op {
        ResolvedOperand::Register(idx) => Ok(idx),
        ResolvedOperand::Value(_) => Err(PicoBlazeError::ParseError(format!(
            "expected a register operand for {context}"
        ))),
    }
}

fn as_target(op: ResolvedOperand, context: &str) -> Result<u32, PicoBlazeError> {
    match op {
        ResolvedOperand::Value(v) => Ok(v.rem_euclid(1024) as u32),
        ResolvedOperand::Register(_) => Err(PicoBlazeError::ParseError(format!(
            "expected an address operand for {context}"
        ))),
    }
}

struct Operands {
    items: std::vec::IntoIter<ResolvedOperand>,
    mnemonic: &'static str,
}

impl Operands {
    fn take(&mut self) -> Result<ResolvedOperand, PicoBlazeError> {
        self.items.next().ok_or_else(|| {
            PicoBlazeError::ParseError(format!("missing operand for {}", self.mnemonic))
        })
    }
}

/// Build the `Instruction` for a recognized mnemonic from its already
/// label/constant-resolved operands.
pub(super) fn build_instruction(
    mnemonic: &str,
    operands: Vec<ResolvedOperand>,
) -> Result<Instruction, PicoBlazeError> {
    // Safety net: `mnemonic` always came from `MNEMONICS` via the
    // tokenizer, but matching against the static strings keeps this in
    // sync with that table rather than inventing a second spelling.
    let canonical = MNEMONICS
        .iter()
        .find(|m| **m == mnemonic)
        .copied()
        .ok_or_else(|| PicoBlazeError::ParseError(format!("unknown mnemonic '{mnemonic}'")))?;

    let mut ops = Operands {
        items: operands.into_iter(),
        mnemonic: canonical,
    };

    let instr = match canonical {
        "ADD" => Instruction::Add {
            rd: as_register(ops.take()?, "ADD rd")?,
            op2: as_operand(ops.take()?),
        },
        "ADDCY" | "ADDC" => Instruction::AddCarry {
            rd: as_register(ops.take()?, "ADDCY rd")?,
            op2: as_operand(ops.take()?),
        },
        "SUB" => Instruction::Sub {
            rd: as_register(ops.take()?, "SUB rd")?,
            op2: as_operand(ops.take()?),
        },
        "SUBCY" | "SUBC" => Instruction::SubCarry {
            rd: as_register(ops.take()?, "SUBCY rd")?,
            op2: as_operand(ops.take()?),
        },
        "AND" => Instruction::And {
            rd: as_register(ops.take()?, "AND rd")?,
            op2: as_operand(ops.take()?),
        },
        "OR" => Instruction::Or {
            rd: as_register(ops.take()?, "OR rd")?,
            op2: as_operand(ops.take()?),
        },
        "XOR" => Instruction::Xor {
            rd: as_register(ops.take()?, "XOR rd")?,
            op2: as_operand(ops.take()?),
        },

        "RL" => shift_instruction(&mut ops, ShiftOp::Rl)?,
        "RR" => shift_instruction(&mut ops, ShiftOp::Rr)?,
        "SL0" => shift_instruction(&mut ops, ShiftOp::Sl0)?,
        "SL1" => shift_instruction(&mut ops, ShiftOp::Sl1)?,
        "SLX" => shift_instruction(&mut ops, ShiftOp::Slx)?,
        "SLA" => shift_instruction(&mut ops, ShiftOp::Sla)?,
        "SR0" => shift_instruction(&mut ops, ShiftOp::Sr0)?,
        "SR1" => shift_instruction(&mut ops, ShiftOp::Sr1)?,
        "SRX" => shift_instruction(&mut ops, ShiftOp::Srx)?,
        "SRA" => shift_instruction(&mut ops, ShiftOp::Sra)?,

        "COMPARE" | "COMP" => Instruction::Compare {
            a: as_register(ops.take()?, "COMPARE a")?,
            b: as_operand(ops.take()?),
        },
        "TEST" => Instruction::Test {
            a: as_register(ops.take()?, "TEST a")?,
            b: as_operand(ops.take()?),
        },

        "LOAD" => Instruction::Load {
            rd: as_register(ops.take()?, "LOAD rd")?,
            src: as_operand(ops.take()?),
        },
        "FETCH" => Instruction::Fetch {
            rd: as_register(ops.take()?, "FETCH rd")?,
            addr: as_operand(ops.take()?),
        },
        "STORE" => Instruction::Store {
            rs: as_register(ops.take()?, "STORE rs")?,
            addr: as_operand(ops.take()?),
        },
        "INPUT" | "IN" => Instruction::Input {
            rd: as_register(ops.take()?, "INPUT rd")?,
            port: as_operand(ops.take()?),
        },
        "OUTPUT" | "OUT" => Instruction::Output {
            rs: as_register(ops.take()?, "OUTPUT rs")?,
            port: as_operand(ops.take()?),
        },
        "OUTPUTK" => Instruction::OutputK,

        "JUMP" => Instruction::Jump {
            target: as_target(ops.take()?, "JUMP target")?,
            cond: Condition::Always,
        },
        "JUMP Z" => Instruction::Jump {
            target: as_target(ops.take()?, "JUMP Z target")?,
            cond: Condition::Zero,
        },
        "JUMP NZ" => Instruction::Jump {
            target: as_target(ops.take()?, "JUMP NZ target")?,
            cond: Condition::NotZero,
        },
        "JUMP C" => Instruction::Jump {
            target: as_target(ops.take()?, "JUMP C target")?,
            cond: Condition::Carry,
        },
        "JUMP NC" => Instruction::Jump {
            target: as_target(ops.take()?, "JUMP NC target")?,
            cond: Condition::NotCarry,
        },
        "JUMP@" => Instruction::JumpIndirect {
            rh: as_register(ops.take()?, "JUMP@ rh")?,
            rl: as_register(ops.take()?, "JUMP@ rl")?,
        },

        "CALL" => Instruction::Call {
            target: as_target(ops.take()?, "CALL target")?,
            cond: Condition::Always,
        },
        "CALL Z" => Instruction::Call {
            target: as_target(ops.take()?, "CALL Z target")?,
            cond: Condition::Zero,
        },
        "CALL NZ" => Instruction::Call {
            target: as_target(ops.take()?, "CALL NZ target")?,
            cond: Condition::NotZero,
        },
        "CALL C" => Instruction::Call {
            target: as_target(ops.take()?, "CALL C target")?,
            cond: Condition::Carry,
        },
        "CALL NC" => Instruction::Call {
            target: as_target(ops.take()?, "CALL NC target")?,
            cond: Condition::NotCarry,
        },

        "RETURN" | "RET" => Instruction::Return {
            cond: Condition::Always,
        },
        "RETURN Z" | "RET Z" => Instruction::Return {
            cond: Condition::Zero,
        },
        "RETURN NZ" | "RET NZ" => Instruction::Return {
            cond: Condition::NotZero,
        },
        "RETURN C" | "RET C" => Instruction::Return {
            cond: Condition::Carry,
        },
        "RETURN NC" | "RET NC" => Instruction::Return {
            cond: Condition::NotCarry,
        },

        "RETURNI ENABLE" => Instruction::ReturnInterrupt { enable: true },
        "RETURNI DISABLE" => Instruction::ReturnInterrupt { enable: false },

        "ENABLE INTERRUPT" | "EINT" => Instruction::EnableInterrupt,
        "DISABLE INTERRUPT" | "DINT" => Instruction::DisableInterrupt,

        other => {
            return Err(PicoBlazeError::ParseError(format!(
                "'{other}' is an assembler directive, not an instruction"
            )));
        }
    };

    Ok(instr)
}

fn shift_instruction(ops: &mut Operands, op: ShiftOp) -> Result<Instruction, PicoBlazeError> {
    Ok(Instruction::Shift {
        rd: as_register(ops.take()?, "shift rd")?,
        op,
    })
}
