//! Instruction dispatch: `Processor::apply` matches on the `Instruction`
//! tag and mutates flags/memory/ports/pc accordingly. Each arm is
//! responsible for advancing `pc` itself, per §4.5's shared contract.

use super::Processor;
use crate::error::PicoBlazeError;
use crate::instruction::{Condition, Instruction, Operand, ShiftOp};

impl Processor {
    fn resolve(&self, op: Operand) -> u32 {
        match op {
            Operand::Register(idx) => self.memory.fetch_register_by_index(idx),
            Operand::Literal(v) => u32::from(v),
        }
    }

    fn condition_met(&self, cond: Condition) -> bool {
        match cond {
            Condition::Always => true,
            Condition::Zero => self.zero,
            Condition::NotZero => !self.zero,
            Condition::Carry => self.carry,
            Condition::NotCarry => !self.carry,
        }
    }

    /// Shared ADD/ADDCY/SUB/SUBCY semantics: combine `rd` and `op2` in
    /// mathematical integers (optionally folding in the carry flag), then
    /// set carry/zero from the pre-normalized result before writing the
    /// normalized 8-bit value back.
    fn arithmetic(&mut self, rd: u8, op2: Operand, subtract: bool, with_carry: bool) {
        let a = i64::from(self.memory.fetch_register_by_index(rd));
        let b = i64::from(self.resolve(op2));
        let carry_in = i64::from(self.carry);

        let raw = match (subtract, with_carry) {
            (false, false) => a + b,
            (false, true) => a + b + carry_in,
            (true, false) => a - b,
            (true, true) => a - b - carry_in,
        };

        self.carry = if subtract { raw < 0 } else { raw >= 256 };
        self.zero = raw.rem_euclid(256) == 0;
        self.memory.set_register_by_index(rd, raw);
        self.program.next();
    }

    fn logic(&mut self, rd: u8, op2: Operand, f: impl Fn(u8, u8) -> u8) {
        let a = self.memory.fetch_register_by_index(rd) as u8;
        let b = self.resolve(op2) as u8;
        let result = f(a, b);
        self.memory.set_register_by_index(rd, i64::from(result));
        self.zero = result == 0;
        self.carry = false;
        self.program.next();
    }

    /// The ten bitwise single-register rotate/shift operations of §4.5's
    /// table. `b0` is the MSB, `b7` the LSB in the spec's own numbering,
    /// which lines up with `u8`'s bit 7 (0x80) and bit 0 (0x01)
    /// respectively.
    fn shift(&mut self, rd: u8, op: ShiftOp) {
        let v = self.memory.fetch_register_by_index(rd) as u8;
        let msb = (v & 0x80) != 0;
        let lsb = (v & 0x01) != 0;
        let carry_in: u8 = u8::from(self.carry);

        let (result, carry_out, zero_effect): (u8, bool, Option<bool>) = match op {
            ShiftOp::Rl => (v.rotate_left(1), msb, None),
            ShiftOp::Rr => (v.rotate_right(1), lsb, None),
            ShiftOp::Sl0 => (v << 1, msb, None),
            ShiftOp::Sl1 => ((v << 1) | 1, msb, Some(false)),
            ShiftOp::Slx => ((v << 1) | (v & 1), msb, None),
            ShiftOp::Sla => ((v << 1) | carry_in, msb, Some(false)),
            ShiftOp::Sr0 => (v >> 1, lsb, None),
            ShiftOp::Sr1 => ((v >> 1) | 0x80, lsb, Some(false)),
            ShiftOp::Srx => ((v >> 1) | (v & 0x80), lsb, None),
            ShiftOp::Sra => ((v >> 1) | (carry_in << 7), lsb, Some(false)),
        };

        self.memory.set_register_by_index(rd, i64::from(result));
        self.carry = carry_out;
        if let Some(zero) = zero_effect {
            self.zero = zero;
        }
        self.program.next();
    }

    pub(crate) fn apply(&mut self, instr: &Instruction) -> Result<(), PicoBlazeError> {
        match *instr {
            Instruction::Add { rd, op2 } => self.arithmetic(rd, op2, false, false),
            Instruction::AddCarry { rd, op2 } => self.arithmetic(rd, op2, false, true),
            Instruction::Sub { rd, op2 } => self.arithmetic(rd, op2, true, false),
            Instruction::SubCarry { rd, op2 } => self.arithmetic(rd, op2, true, true),

            Instruction::And { rd, op2 } => self.logic(rd, op2, |a, b| a & b),
            Instruction::Or { rd, op2 } => self.logic(rd, op2, |a, b| a | b),
            Instruction::Xor { rd, op2 } => self.logic(rd, op2, |a, b| a ^ b),

            Instruction::Shift { rd, op } => self.shift(rd, op),

            Instruction::Compare { a, b } => {
                let av = i64::from(self.memory.fetch_register_by_index(a));
                let bv = i64::from(self.resolve(b));
                self.zero = av == bv;
                self.carry = av < bv;
                self.program.next();
            }

            Instruction::Test { a, b } => {
                let av = self.memory.fetch_register_by_index(a) as u8;
                let bv = self.resolve(b) as u8;
                let x = av & bv;
                self.zero = x == 0;
                self.carry = x.count_ones() % 2 == 1;
                self.program.next();
            }

            Instruction::Load { rd, src } => {
                let v = self.resolve(src);
                self.memory.set_register_by_index(rd, i64::from(v));
                self.program.next();
            }

            Instruction::Fetch { rd, addr } => {
                let a = self.resolve(addr);
                let v = self.memory.fetch_data(a);
                self.memory.set_register_by_index(rd, i64::from(v));
                self.program.next();
            }

            Instruction::Store { rs, addr } => {
                let a = self.resolve(addr);
                let v = self.memory.fetch_register_by_index(rs);
                self.memory.store_data(a, i64::from(v));
                self.program.next();
            }

            Instruction::Input { rd, port } => {
                let p = self.resolve(port) as u8;
                self.port_id = p;
                self.memory.set_register_by_index(rd, i64::from(self.in_port));
                self.program.next();
            }

            Instruction::Output { rs, port } => {
                let p = self.resolve(port) as u8;
                self.port_id = p;
                self.out_port = self.memory.fetch_register_by_index(rs) as u8;
                self.program.next();
            }

            Instruction::OutputK => self.program.next(),

            Instruction::Jump { target, cond } => {
                if self.condition_met(cond) {
                    self.program.jump(target);
                } else {
                    self.program.next();
                }
            }

            Instruction::JumpIndirect { rh, rl } => {
                let high = self.memory.fetch_register_by_index(rh) & 0xF;
                let low = self.memory.fetch_register_by_index(rl);
                self.program.jump((high << 8) | low);
            }

            Instruction::Call { target, cond } => {
                if self.condition_met(cond) {
                    self.memory.push_stack(self.program.pc())?;
                    self.program.jump(target);
                } else {
                    self.program.next();
                }
            }

            Instruction::Return { cond } => {
                if self.condition_met(cond) {
                    let ret = self.memory.pop_stack()?;
                    self.program.jump(ret + 1);
                } else {
                    self.program.next();
                }
            }

            Instruction::ReturnInterrupt { enable } => {
                let ret = self.memory.pop_stack()?;
                self.program.jump(ret);
                self.carry = self.preserved_carry;
                self.zero = self.preserved_zero;
                self.interrupt_enabled = enable;
            }

            Instruction::EnableInterrupt => {
                self.interrupt_enabled = true;
                self.program.next();
            }

            Instruction::DisableInterrupt => {
                self.interrupt_enabled = false;
                self.program.next();
            }
        }
        Ok(())
    }
}
