//! Error type for the VM translator

use std::fmt;

/// An error that can occur while translating VM commands to assembly
#[derive(Debug)]
pub enum Error {
    /// An unknown arithmetic mnemonic was used
    UnknownArithmetic { op: String, line_number: usize, line: String },
    /// An unknown segment name was used in a `push`/`pop`
    UnknownSegment { segment: String, line_number: usize, line: String },
    /// A segment index wasn't a valid non-negative integer
    MalformedIndex { index: String, line_number: usize, line: String },
    /// `push`/`pop` into `pointer`/`temp` with an index outside the segment's size
    IndexOutOfRange {
        segment: String,
        index: u16,
        line_number: usize,
        line: String,
    },
    /// A command had the wrong number of fields, or an unrecognized first field
    MalformedCommand { line_number: usize, line: String },
    /// A file could not be read
    ReadError { path: String },
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (message, line, line_number) = match self {
            Error::UnknownArithmetic { op, line_number, line } => (
                format!("unknown arithmetic command \"{}\" at line {}", op, line_number),
                Some(line),
                Some(line_number),
            ),
            Error::UnknownSegment {
                segment,
                line_number,
                line,
            } => (
                format!("unknown segment \"{}\" at line {}", segment, line_number),
                Some(line),
                Some(line_number),
            ),
            Error::MalformedIndex { index, line_number, line } => (
                format!("malformed segment index \"{}\" at line {}", index, line_number),
                Some(line),
                Some(line_number),
            ),
            Error::IndexOutOfRange {
                segment,
                index,
                line_number,
                line,
            } => (
                format!("index {} out of range for segment \"{}\" at line {}", index, segment, line_number),
                Some(line),
                Some(line_number),
            ),
            Error::MalformedCommand { line_number, line } => (
                format!("malformed command at line {}", line_number),
                Some(line),
                Some(line_number),
            ),
            Error::ReadError { path } => (format!("failed to read file {}", path), None, None),
        };
        writeln!(f, "{}", message)?;
        if let (Some(line), Some(line_number)) = (line, line_number) {
            write!(f, "{}\t{}", line_number, line)?;
        }
        Ok(())
    }
}
