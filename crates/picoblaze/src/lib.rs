//! Functional simulator and assembler for the Xilinx PicoBlaze 8-bit
//! soft-core microcontroller.
//!
//! Given a text assembly program, [`Assembler::assemble`] resolves it to an
//! address -> [`Instruction`] map; [`Processor`] then executes that program
//! cycle-by-cycle (one [`Processor::execute`] call per instruction) against
//! a model of the core's architectural state: sixteen 8-bit registers, a
//! 1024-word program store, a 64-byte scratchpad, a 31-entry call stack,
//! carry/zero flags with interrupt-time preservation, an I/O port bus, and
//! a single maskable interrupt.
//!
//! This crate has no host loop of its own: the caller drives
//! [`Processor::execute`] while [`Processor::outside_program`] is false,
//! and owns the assembly source ([`LineSource`]), the I/O peripherals
//! ([`IoBackend`]), and the interrupt line ([`InterruptSource`]).

pub mod assembler;
pub mod error;
pub mod instruction;
pub mod io;
pub mod memory;
pub mod processor;
pub mod program;
pub mod word;

pub use assembler::{Assembler, Line};
pub use error::PicoBlazeError;
pub use instruction::{Condition, Instruction, Operand, ShiftOp};
pub use io::{IoBackend, InterruptSource, LatchingIoBackend, LineSource, VecLineSource};
pub use memory::{Memory, RegisterInit};
pub use processor::{ExternalInterface, Flags, PortState, Processor, Program, RegisterSnapshot};
pub use program::ProgramManager;
pub use word::Word;
