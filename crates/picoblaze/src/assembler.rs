//! Single-pass-in-one-pass assembler: tokenizes lines, resolves labels and
//! named constants, recognizes multi-word mnemonics, and emits an
//! address -> `Instruction` map.

mod mnemonics;

use std::collections::HashMap;

use crate::error::PicoBlazeError;
use crate::io::LineSource;
use crate::memory::register_index_from_token;
use crate::processor::Program;

use mnemonics::{build_instruction, ResolvedOperand, MNEMONICS};

/// Bookkeeping record for one source line, kept for diagnostics — carried
/// forward from the Python prototype's per-line `Line(address, tag,
/// instruction)` record (`ops/assembler.py`).
#[derive(Debug, Clone)]
pub struct Line {
    pub address: u32,
    pub label: Option<String>,
    pub text: String,
}

struct PendingInstruction {
    address: u32,
    mnemonic: String,
    operand_tokens: Vec<String>,
}

/// Tokenizes and resolves an assembly source into a `Program`.
#[derive(Debug, Clone)]
pub struct Assembler {
    start_address: u32,
    labels: HashMap<String, u32>,
    constants: HashMap<String, i64>,
    lines: Vec<Line>,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            start_address: 0,
            labels: HashMap::new(),
            constants: HashMap::new(),
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_start_address(mut self, addr: u32) -> Self {
        self.start_address = addr;
        self
    }

    #[must_use]
    pub fn labels(&self) -> &HashMap<String, u32> {
        &self.labels
    }

    #[must_use]
    pub fn constants(&self) -> &HashMap<String, i64> {
        &self.constants
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Assemble `source` into an address -> `Instruction` map.
    ///
    /// Labels and constants resolve in a second pass over the instructions
    /// recorded during the first, per §4.6: every symbolic operand is
    /// rewritten by substituting first from the constants table, then the
    /// labels table.
    pub fn assemble(&mut self, mut source: impl LineSource) -> Result<Program, PicoBlazeError> {
        let mut address = self.start_address;
        let mut pending = Vec::new();

        while let Some(raw) = source.next_line() {
            let (label, rest) = split_comment_and_label(&raw);
            let rest = rest.replace(['(', ')'], "");
            let rest = rest.trim();
            if rest.is_empty() {
                if let Some(label) = label {
                    self.labels.insert(label.to_ascii_lowercase(), address);
                }
                continue;
            }

            let (mnemonic, operand_tokens) = parse_mnemonic_and_operands(rest)?;

            match mnemonic.as_str() {
                "ADDRESS" => {
                    let token = operand_tokens.first().ok_or_else(|| {
                        PicoBlazeError::ParseError("ADDRESS requires an operand".to_string())
                    })?;
                    address = parse_numeral(token)?.rem_euclid(1024) as u32;
                    if let Some(label) = label {
                        self.labels.insert(label.to_ascii_lowercase(), address);
                    }
                    self.lines.push(Line {
                        address,
                        label: None,
                        text: rest.to_string(),
                    });
                }
                "CONSTANT" => {
                    let name = operand_tokens.first().ok_or_else(|| {
                        PicoBlazeError::ParseError("CONSTANT requires a name".to_string())
                    })?;
                    let value_token = operand_tokens.get(1).ok_or_else(|| {
                        PicoBlazeError::ParseError("CONSTANT requires a value".to_string())
                    })?;
                    let value = parse_numeral(value_token)?;
                    self.constants.insert(name.clone(), value);
                    if let Some(label) = label {
                        self.labels.insert(label.to_ascii_lowercase(), address);
                    }
                    self.lines.push(Line {
                        address,
                        label: None,
                        text: rest.to_string(),
                    });
                }
                _ => {
                    if let Some(label) = label.clone() {
                        self.labels.insert(label.to_ascii_lowercase(), address);
                    }
                    self.lines.push(Line {
                        address,
                        label,
                        text: rest.to_string(),
                    });
                    pending.push(PendingInstruction {
                        address,
                        mnemonic,
                        operand_tokens,
                    });
                    address += 1;
                }
            }
        }

        let mut program = Program::new();
        for instr in pending {
            let resolved = instr
                .operand_tokens
                .iter()
                .map(|token| resolve_operand(token, &self.constants, &self.labels))
                .collect::<Result<Vec<_>, _>>()?;
            let built = build_instruction(&instr.mnemonic, resolved)?;
            program.insert(instr.address % 1024, built);
        }
        Ok(program)
    }
}

/// Split off the `;` comment first, then split the remainder on the first
/// `:` to separate an optional label — the same order the Python prototype
/// uses (`line.split(';')[0]` then `line.split(':')`).
fn split_comment_and_label(raw: &str) -> (Option<String>, String) {
    let without_comment = raw.split(';').next().unwrap_or("");
    if let Some(idx) = without_comment.find(':') {
        let label = without_comment[..idx].trim();
        let rest = without_comment[idx + 1..].to_string();
        let label = if label.is_empty() {
            None
        } else {
            Some(label.to_string())
        };
        (label, rest)
    } else {
        (None, without_comment.to_string())
    }
}

/// Mnemonic recognition: the longest (word-count) prefix of `text` that
/// equals a known mnemonic wins, so `JUMP NC` is preferred over `JUMP`
/// when both could match. Whatever head words remain after the mnemonic
/// form the first operand; subsequent comma-separated parts are the rest.
fn parse_mnemonic_and_operands(text: &str) -> Result<(String, Vec<String>), PicoBlazeError> {
    let (head, tail) = match text.find(',') {
        Some(idx) => (&text[..idx], &text[idx + 1..]),
        None => (text, ""),
    };
    let head_words: Vec<&str> = head.split_whitespace().collect();
    if head_words.is_empty() {
        return Err(PicoBlazeError::ParseError(format!(
            "empty instruction in '{text}'"
        )));
    }

    for len in [2usize, 1usize] {
        if head_words.len() < len {
            continue;
        }
        let candidate = head_words[..len].join(" ").to_uppercase();
        if !MNEMONICS.contains(&candidate.as_str()) {
            continue;
        }
        let mut operands = Vec::new();
        if head_words.len() > len {
            operands.push(head_words[len..].concat());
        }
        for part in tail.split(',') {
            let trimmed = part.trim();
            if !trimmed.is_empty() {
                operands.push(trimmed.to_string());
            }
        }
        return Ok((candidate, operands));
    }

    Err(PicoBlazeError::ParseError(format!(
        "unrecognized mnemonic in '{text}'"
    )))
}

fn resolve_operand(
    token: &str,
    constants: &HashMap<String, i64>,
    labels: &HashMap<String, u32>,
) -> Result<ResolvedOperand, PicoBlazeError> {
    if let Some(idx) = register_index_from_token(token) {
        return Ok(ResolvedOperand::Register(idx));
    }
    if let Some(&value) = constants.get(token) {
        return Ok(ResolvedOperand::Value(value));
    }
    if let Some(&addr) = labels.get(&token.to_ascii_lowercase()) {
        return Ok(ResolvedOperand::Value(i64::from(addr)));
    }
    parse_numeral(token).map(ResolvedOperand::Value)
}

/// Parse a numeric literal with an optional radix postfix (`'b`, `'o`,
/// `'d`, `'h`); hexadecimal is the default when no postfix is present,
/// the PicoBlaze assembly convention.
fn parse_numeral(token: &str) -> Result<i64, PicoBlazeError> {
    if let Some(pos) = token.find('\'') {
        let (digits, postfix) = token.split_at(pos);
        let radix_char = postfix[1..].chars().next().ok_or_else(|| {
            PicoBlazeError::ParseError(format!("malformed numeral '{token}'"))
        })?;
        let radix = match radix_char.to_ascii_lowercase() {
            'b' => 2,
            'o' => 8,
            'd' => 10,
            'h' => 16,
            _ => {
                return Err(PicoBlazeError::ParseError(format!(
                    "unknown radix postfix in '{token}'"
                )));
            }
        };
        i64::from_str_radix(digits, radix)
            .map_err(|_| PicoBlazeError::ParseError(format!("malformed numeral '{token}'")))
    } else {
        i64::from_str_radix(token, 16)
            .map_err(|_| PicoBlazeError::ParseError(format!("malformed numeral '{token}'")))
    }
}
