//! Strips comments/whitespace and parses Hack assembly line by line

use super::error::Error;
use super::instruction::{parse_line, Instruction};

/// Parse a full Hack assembly source into its sequence of instructions,
/// alongside the 1-based source line number each instruction came from
pub fn parse(source: &str) -> Result<Vec<(Instruction, usize)>, Error> {
    let mut instructions = Vec::new();
    for (index, raw_line) in source.lines().enumerate() {
        let line_number = index + 1;
        let without_comment = raw_line.split("//").next().unwrap_or("");
        let line = without_comment.trim();
        if line.is_empty() {
            continue;
        }
        let instruction = parse_line(line, line_number)?;
        instructions.push((instruction, line_number));
    }
    Ok(instructions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_comments_and_blank_lines() {
        let source = "\n// a comment\n@21  // inline comment\nD=A\n\n";
        let parsed = parse(source).unwrap();
        assert_eq!(
            parsed,
            vec![
                (Instruction::ADecimal(21), 3),
                (
                    Instruction::C {
                        dest: "D".to_string(),
                        comp: "A".to_string(),
                        jump: String::new()
                    },
                    4
                ),
            ]
        );
    }
}
