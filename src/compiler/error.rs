//! Error type for the Jack compiler

use super::token::Token;
use std::fmt;

/// An error that can occur while tokenizing, parsing, or generating code
/// for a Jack class. The first error aborts compilation of the current class.
#[derive(Debug)]
pub enum Error {
    /// A character outside the lexical grammar was encountered
    UnexpectedCharacter { ch: char, line_number: usize },
    /// A `/* ... */` comment was never closed
    UnterminatedComment { line_number: usize },
    /// A `"..."` string constant ran into a newline or end of file
    UnterminatedString { line_number: usize },
    /// An integer literal exceeded 32767
    IntConstantOutOfRange { text: String, line_number: usize },
    /// The parser expected one construct and found a different token
    Expected {
        expected: String,
        found: Option<Token>,
        line_number: usize,
    },
    /// A name was declared twice in the same symbol table
    DuplicateSymbol { name: String, line_number: usize },
    /// An identifier was used somewhere that requires a known variable
    /// (e.g. an array index into something that isn't a declared variable)
    UnknownIdentifier { name: String, line_number: usize },
    /// A file or directory could not be read
    ReadError { path: String },
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnexpectedCharacter { ch, line_number } => {
                write!(f, "unexpected character '{}' at line {}", ch, line_number)
            }
            Error::UnterminatedComment { line_number } => {
                write!(f, "unterminated block comment starting at line {}", line_number)
            }
            Error::UnterminatedString { line_number } => {
                write!(f, "unterminated string constant at line {}", line_number)
            }
            Error::IntConstantOutOfRange { text, line_number } => {
                write!(f, "integer constant \"{}\" out of range at line {}", text, line_number)
            }
            Error::Expected {
                expected,
                found,
                line_number,
            } => match found {
                Some(token) => write!(f, "expected {} but found {} at line {}", expected, token, line_number),
                None => write!(f, "expected {} but found end of input", expected),
            },
            Error::DuplicateSymbol { name, line_number } => {
                write!(f, "\"{}\" is already declared in this scope, at line {}", name, line_number)
            }
            Error::UnknownIdentifier { name, line_number } => {
                write!(f, "unknown identifier \"{}\" at line {}", name, line_number)
            }
            Error::ReadError { path } => write!(f, "failed to read {}", path),
        }
    }
}
