//! Strips comments/whitespace and parses VM commands line by line

use super::command::{ArithOp, Command, Segment};
use super::error::Error;

/// Parse a full VM source into its sequence of commands, alongside the
/// 1-based source line number each command came from
pub fn parse(source: &str) -> Result<Vec<(Command, usize)>, Error> {
    let mut commands = Vec::new();
    for (index, raw_line) in source.lines().enumerate() {
        let line_number = index + 1;
        let without_comment = raw_line.split("//").next().unwrap_or("");
        let line = without_comment.trim();
        if line.is_empty() {
            continue;
        }
        let command = parse_line(line, line_number)?;
        commands.push((command, line_number));
    }
    Ok(commands)
}

fn parse_line(line: &str, line_number: usize) -> Result<Command, Error> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let malformed = || Error::MalformedCommand {
        line_number,
        line: line.to_string(),
    };

    match fields.as_slice() {
        [op] if ArithOp::parse(op).is_some() => Ok(Command::Arithmetic(ArithOp::parse(op).unwrap())),
        ["label", name] => Ok(Command::Label(name.to_string())),
        ["goto", name] => Ok(Command::Goto(name.to_string())),
        ["if-goto", name] => Ok(Command::IfGoto(name.to_string())),
        ["return"] => Ok(Command::Return),
        ["push", segment, index] => {
            let segment = Segment::parse(segment).ok_or_else(|| Error::UnknownSegment {
                segment: segment.to_string(),
                line_number,
                line: line.to_string(),
            })?;
            let index = parse_index(index, line_number, line)?;
            Ok(Command::Push(segment, index))
        }
        ["pop", segment, index] => {
            let segment = Segment::parse(segment).ok_or_else(|| Error::UnknownSegment {
                segment: segment.to_string(),
                line_number,
                line: line.to_string(),
            })?;
            let index = parse_index(index, line_number, line)?;
            Ok(Command::Pop(segment, index))
        }
        ["function", name, n_vars] => {
            let n_vars = parse_index(n_vars, line_number, line)?;
            Ok(Command::Function(name.to_string(), n_vars))
        }
        ["call", name, n_args] => {
            let n_args = parse_index(n_args, line_number, line)?;
            Ok(Command::Call(name.to_string(), n_args))
        }
        [op] => Err(Error::UnknownArithmetic {
            op: op.to_string(),
            line_number,
            line: line.to_string(),
        }),
        _ => Err(malformed()),
    }
}

fn parse_index(text: &str, line_number: usize, line: &str) -> Result<u16, Error> {
    text.parse().map_err(|_| Error::MalformedIndex {
        index: text.to_string(),
        line_number,
        line: line.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_push_pop() {
        let parsed = parse("push constant 7\npop local 2\n").unwrap();
        assert_eq!(
            parsed,
            vec![
                (Command::Push(Segment::Constant, 7), 1),
                (Command::Pop(Segment::Local, 2), 2),
            ]
        );
    }

    #[test]
    fn parses_arithmetic_and_branches() {
        let parsed = parse("add\nlabel LOOP\ngoto LOOP\nif-goto LOOP\n").unwrap();
        assert_eq!(
            parsed,
            vec![
                (Command::Arithmetic(ArithOp::Add), 1),
                (Command::Label("LOOP".to_string()), 2),
                (Command::Goto("LOOP".to_string()), 3),
                (Command::IfGoto("LOOP".to_string()), 4),
            ]
        );
    }

    #[test]
    fn parses_function_call_return() {
        let parsed = parse("function Main.main 0\ncall Sys.init 0\nreturn\n").unwrap();
        assert_eq!(
            parsed,
            vec![
                (Command::Function("Main.main".to_string(), 0), 1),
                (Command::Call("Sys.init".to_string(), 0), 2),
                (Command::Return, 3),
            ]
        );
    }

    #[test]
    fn strips_comments_and_blank_lines() {
        let parsed = parse("\n// comment\npush constant 1 // inline\n").unwrap();
        assert_eq!(parsed, vec![(Command::Push(Segment::Constant, 1), 3)]);
    }

    #[test]
    fn unknown_segment_is_an_error() {
        assert!(parse("push bogus 0").is_err());
    }

    #[test]
    fn malformed_command_is_an_error() {
        assert!(parse("push constant").is_err());
        assert!(parse("frobnicate").is_err());
    }
}
