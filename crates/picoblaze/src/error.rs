//! Error types surfaced by the assembler and the processor.
//!
//! Plain hand-rolled enum + `Display` + `Error`, the pattern this workspace
//! uses everywhere instead of pulling in `thiserror`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PicoBlazeError {
    /// Unknown mnemonic, malformed numeric literal, or a shape the operand
    /// parser didn't expect. Carries a human-readable description of what
    /// went wrong, not a structured diagnostic.
    ParseError(String),
    /// Runtime or assembly-time access to a name outside `s0`..`sf`.
    UnknownRegister(String),
    /// `push_stack` attempted on a full 31-entry call stack.
    StackOverflow,
    /// `pop_stack` attempted on an empty call stack.
    StackUnderflow,
    /// The host called `execute` while `outside_program()` was already true.
    OutOfProgram,
}

impl fmt::Display for PicoBlazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseError(msg) => write!(f, "parse error: {msg}"),
            Self::UnknownRegister(name) => write!(f, "unknown register: {name}"),
            Self::StackOverflow => write!(f, "call stack overflow (31 entries)"),
            Self::StackUnderflow => write!(f, "call stack underflow"),
            Self::OutOfProgram => write!(f, "pc is outside the populated program"),
        }
    }
}

impl std::error::Error for PicoBlazeError {}
