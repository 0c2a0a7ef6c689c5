//! The [Instruction] type parsed from one line of Hack assembly

use super::error::Error;

/// A parsed line of Hack assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `@value`, value already known at parse time
    ADecimal(u16),
    /// `@symbol`, resolved against the symbol table in pass 2
    ASymbolic(String),
    /// `dest=comp;jump`, either `dest=` or `;jump` may be absent
    C {
        dest: String,
        comp: String,
        jump: String,
    },
    /// `(symbol)`, a label pseudo-instruction; contributes no output word
    Label(String),
}

/// Parse one already-trimmed, comment-free, non-empty line into an instruction
pub fn parse_line(line: &str, line_number: usize) -> Result<Instruction, Error> {
    if let Some(symbol) = line.strip_prefix('(') {
        let symbol = symbol.strip_suffix(')').ok_or_else(|| Error::MalformedLabel {
            line_number,
            line: line.to_string(),
        })?;
        if !is_valid_symbol(symbol) {
            return Err(Error::MalformedLabel {
                line_number,
                line: line.to_string(),
            });
        }
        return Ok(Instruction::Label(symbol.to_string()));
    }

    if let Some(rest) = line.strip_prefix('@') {
        if rest.is_empty() {
            return Err(Error::MalformedAInstruction {
                line_number,
                line: line.to_string(),
            });
        }
        if is_valid_symbol(rest) {
            return Ok(Instruction::ASymbolic(rest.to_string()));
        }
        let value: u32 = rest.parse().map_err(|_| Error::MalformedAInstruction {
            line_number,
            line: line.to_string(),
        })?;
        if value > 32767 {
            return Err(Error::MalformedAInstruction {
                line_number,
                line: line.to_string(),
            });
        }
        return Ok(Instruction::ADecimal(value as u16));
    }

    let (dest, remaining) = match line.split_once('=') {
        Some((dest, remaining)) => (dest.to_string(), remaining),
        None => (String::new(), line),
    };
    let (comp, jump) = match remaining.split_once(';') {
        Some((comp, jump)) => (comp.to_string(), jump.to_string()),
        None => (remaining.to_string(), String::new()),
    };
    Ok(Instruction::C { dest, comp, jump })
}

/// A valid Hack assembly symbol: `[A-Za-z_.$:][A-Za-z0-9_.$:]*`
pub fn is_valid_symbol(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || matches!(first, '_' | '.' | '$' | ':')) {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_a_instruction() {
        assert_eq!(parse_line("@21", 1).unwrap(), Instruction::ADecimal(21));
    }

    #[test]
    fn rejects_out_of_range_decimal() {
        assert!(parse_line("@32768", 1).is_err());
        assert!(parse_line("@32767", 1).is_ok());
    }

    #[test]
    fn symbolic_a_instruction() {
        assert_eq!(
            parse_line("@LOOP", 1).unwrap(),
            Instruction::ASymbolic("LOOP".to_string())
        );
    }

    #[test]
    fn label_declaration() {
        assert_eq!(
            parse_line("(LOOP)", 1).unwrap(),
            Instruction::Label("LOOP".to_string())
        );
    }

    #[test]
    fn malformed_label_is_rejected() {
        assert!(parse_line("(LOOP", 1).is_err());
    }

    #[test]
    fn c_instruction_full() {
        assert_eq!(
            parse_line("MD=D+1;JMP", 1).unwrap(),
            Instruction::C {
                dest: "MD".to_string(),
                comp: "D+1".to_string(),
                jump: "JMP".to_string(),
            }
        );
    }

    #[test]
    fn c_instruction_comp_only() {
        assert_eq!(
            parse_line("0", 1).unwrap(),
            Instruction::C {
                dest: String::new(),
                comp: "0".to_string(),
                jump: String::new(),
            }
        );
    }

    #[test]
    fn c_instruction_no_dest() {
        assert_eq!(
            parse_line("D;JGT", 1).unwrap(),
            Instruction::C {
                dest: String::new(),
                comp: "D".to_string(),
                jump: "JGT".to_string(),
            }
        );
    }

    #[test]
    fn valid_symbol_allows_dots_dollars_colons() {
        assert!(is_valid_symbol("Foo.bar$baz:qux"));
        assert!(!is_valid_symbol("1abc"));
        assert!(!is_valid_symbol(""));
    }
}
