//! Translates Hack assembly into 16-bit binary machine code, two-pass
//!
//! The first pass walks the parsed instruction stream and builds a symbol
//! table mapping every `(label)` declaration to the address of the next
//! real instruction. The second pass walks the same stream again,
//! resolving `@symbol` references (allocating a fresh RAM address starting
//! at 16 for anything not already known) and emitting one 16-character
//! '0'/'1' line per instruction.
//!
//! Comments start with `//` and run to the end of the line. Labels,
//! A-instructions and C-instructions may be indented however you like.
//!
//! ```ignore
//! (LOOP)
//!     @counter
//!     D=M
//!     @END
//!     D;JEQ
//!     @counter
//!     M=M-1
//!     @LOOP
//!     0;JMP
//! (END)
//! ```

pub mod encode;
pub mod error;
pub mod instruction;
pub mod parser;
pub mod symbol_table;

use std::fs;

pub use error::Error;
use instruction::Instruction;
use symbol_table::SymbolTable;
use tracing::debug;

/// Assemble a Hack assembly file into a vector of 16-char binary lines
pub fn assemble_from_file(path: &str) -> Result<Vec<String>, Error> {
    let source = fs::read_to_string(path).map_err(|_| Error::ReadError { path: path.to_string() })?;
    assemble(&source)
}

/// Assemble Hack assembly source into a vector of 16-char binary lines,
/// one per emitted instruction
pub fn assemble(source: &str) -> Result<Vec<String>, Error> {
    let instructions = parser::parse(source)?;
    debug!(count = instructions.len(), "parsed assembly instructions");
    let symbol_table = first_pass(&instructions)?;
    second_pass(&instructions, symbol_table)
}

fn first_pass(instructions: &[(Instruction, usize)]) -> Result<SymbolTable, Error> {
    let mut table = SymbolTable::new();
    let mut address: u16 = 0;
    for (instruction, line_number) in instructions {
        match instruction {
            Instruction::Label(name) => {
                if !table.define_label(name, address) {
                    return Err(Error::LabelCollision {
                        label: name.clone(),
                        line_number: *line_number,
                        line: format!("({})", name),
                    });
                }
            }
            Instruction::ADecimal(_) | Instruction::ASymbolic(_) | Instruction::C { .. } => {
                address += 1;
            }
        }
    }
    Ok(table)
}

fn second_pass(instructions: &[(Instruction, usize)], mut symbol_table: SymbolTable) -> Result<Vec<String>, Error> {
    let mut output = Vec::new();
    let mut next_variable: u16 = 16;
    for (instruction, line_number) in instructions {
        match instruction {
            Instruction::ADecimal(value) => output.push(encode::encode_a(*value)),
            Instruction::ASymbolic(name) => {
                let address = match symbol_table.get(name) {
                    Some(address) => address,
                    None => {
                        let address = next_variable;
                        symbol_table.define_variable(name, address);
                        next_variable += 1;
                        address
                    }
                };
                output.push(encode::encode_a(address));
            }
            Instruction::C { dest, comp, jump } => {
                // line text isn't retained past pass 1, so reconstruct a
                // representative one for error messages
                let line = format_c(dest, comp, jump);
                output.push(encode::encode_c(dest, comp, jump, *line_number, &line)?);
            }
            Instruction::Label(_) => {}
        }
    }
    Ok(output)
}

fn format_c(dest: &str, comp: &str, jump: &str) -> String {
    let mut s = String::new();
    if !dest.is_empty() {
        s.push_str(dest);
        s.push('=');
    }
    s.push_str(comp);
    if !jump.is_empty() {
        s.push(';');
        s.push_str(jump);
    }
    s
}
