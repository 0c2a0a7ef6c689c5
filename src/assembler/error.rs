//! Error type for the assembler

use colored::Colorize;
use std::fmt;

/// A span of text in the source line. Used to neatly underline errors
#[derive(Debug, Clone, Copy)]
pub struct LineSpan {
    start: usize,
    end: usize,
}

impl LineSpan {
    /// Create a new line span
    pub fn new(start: usize, end: usize) -> LineSpan {
        LineSpan { start, end }
    }

    /// A span covering the whole line
    pub fn whole(line: &str) -> LineSpan {
        LineSpan::new(0, line.len())
    }
}

/// An error that can occur during assembly
#[derive(Debug)]
pub enum Error {
    /// An A-instruction was malformed (e.g. `@` with nothing after it, or a
    /// decimal value that doesn't fit in 15 bits)
    MalformedAInstruction { line_number: usize, line: String },
    /// A label declaration `(...)` was malformed
    MalformedLabel { line_number: usize, line: String },
    /// The same label was declared more than once
    LabelCollision {
        label: String,
        line_number: usize,
        line: String,
    },
    /// An unknown `comp` mnemonic was used in a C-instruction
    UnknownComp {
        comp: String,
        span: LineSpan,
        line_number: usize,
        line: String,
    },
    /// An unknown `dest` mnemonic was used in a C-instruction
    UnknownDest {
        dest: String,
        span: LineSpan,
        line_number: usize,
        line: String,
    },
    /// An unknown `jump` mnemonic was used in a C-instruction
    UnknownJump {
        jump: String,
        span: LineSpan,
        line_number: usize,
        line: String,
    },
    /// A file could not be read
    ReadError { path: String },
}

impl std::error::Error for Error {}

fn underline(line: &str, span: LineSpan) -> String {
    let mut underline = vec![' '; line.len()];
    for i in span.start..span.end.min(underline.len()) {
        underline[i] = '^';
    }
    underline.into_iter().collect()
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (message, line, line_number, span) = match self {
            Error::MalformedAInstruction { line_number, line } => (
                format!("malformed A-instruction at line {}", line_number),
                Some(line),
                Some(line_number),
                None,
            ),
            Error::MalformedLabel { line_number, line } => (
                format!("malformed label declaration at line {}", line_number),
                Some(line),
                Some(line_number),
                None,
            ),
            Error::LabelCollision {
                label,
                line_number,
                line,
            } => (
                format!("label \"{}\" redefined at line {}", label, line_number),
                Some(line),
                Some(line_number),
                None,
            ),
            Error::UnknownComp {
                comp,
                span,
                line_number,
                line,
            } => (
                format!("unknown comp mnemonic \"{}\" at line {}", comp, line_number),
                Some(line),
                Some(line_number),
                Some(*span),
            ),
            Error::UnknownDest {
                dest,
                span,
                line_number,
                line,
            } => (
                format!("unknown dest mnemonic \"{}\" at line {}", dest, line_number),
                Some(line),
                Some(line_number),
                Some(*span),
            ),
            Error::UnknownJump {
                jump,
                span,
                line_number,
                line,
            } => (
                format!("unknown jump mnemonic \"{}\" at line {}", jump, line_number),
                Some(line),
                Some(line_number),
                Some(*span),
            ),
            Error::ReadError { path } => (format!("failed to read file {}", path), None, None, None),
        };
        writeln!(f, "{}", message)?;
        if let (Some(line), Some(line_number)) = (line, line_number) {
            write!(f, "{}\t{}", line_number, line)?;
            if let Some(span) = span {
                writeln!(f)?;
                write!(f, "\t{}", underline(line, span).green())?;
            }
        }
        Ok(())
    }
}
