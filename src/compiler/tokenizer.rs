//! Character-stream tokenizer with two-character lookahead

use super::error::Error;
use super::token::{Keyword, Token, SYMBOL_CHARS};

/// Turns Jack source text into a sequence of tokens, skipping whitespace and
/// both comment forms (`// ...` and `/* ... */`, non-nesting).
///
/// Once a lexical error occurs the tokenizer is fused: it yields that one
/// error and then behaves as an exhausted stream.
pub struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    failed: bool,
}

impl Tokenizer {
    /// Build a tokenizer over the given source text
    pub fn new(source: &str) -> Tokenizer {
        Tokenizer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            failed: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), Error> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek2() == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek2() == Some('*') => {
                    let start_line = self.line;
                    self.advance();
                    self.advance();
                    loop {
                        match (self.peek(), self.peek2()) {
                            (Some('*'), Some('/')) => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            (None, _) => {
                                return Err(Error::UnterminatedComment { line_number: start_line });
                            }
                            _ => {
                                self.advance();
                            }
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Produce the next token, or `None` at end of stream
    fn next_token(&mut self) -> Option<Result<(Token, usize), Error>> {
        if self.failed {
            return None;
        }
        if let Err(e) = self.skip_whitespace_and_comments() {
            self.failed = true;
            return Some(Err(e));
        }
        let line_number = self.line;
        let c = self.peek()?;

        if SYMBOL_CHARS.contains(&c) {
            self.advance();
            return Some(Ok((Token::Symbol(c), line_number)));
        }

        if c.is_ascii_digit() {
            let mut text = String::new();
            while let Some(c) = self.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                text.push(c);
                self.advance();
            }
            return Some(match text.parse::<u32>() {
                Ok(n) if n <= 32767 => Ok((Token::IntConstant(n as u16), line_number)),
                _ => {
                    self.failed = true;
                    Err(Error::IntConstantOutOfRange {
                        text,
                        line_number,
                    })
                }
            });
        }

        if c == '"' {
            self.advance();
            let mut text = String::new();
            loop {
                match self.peek() {
                    Some('"') => {
                        self.advance();
                        break;
                    }
                    Some('\n') | None => {
                        self.failed = true;
                        return Some(Err(Error::UnterminatedString { line_number }));
                    }
                    Some(c) => {
                        text.push(c);
                        self.advance();
                    }
                }
            }
            return Some(Ok((Token::StringConstant(text), line_number)));
        }

        if c == '_' || c.is_ascii_alphabetic() {
            let mut text = String::new();
            while let Some(c) = self.peek() {
                if !(c == '_' || c.is_ascii_alphanumeric()) {
                    break;
                }
                text.push(c);
                self.advance();
            }
            return Some(Ok((match Keyword::parse(&text) {
                Some(k) => Token::Keyword(k),
                None => Token::Identifier(text),
            }, line_number)));
        }

        self.failed = true;
        Some(Err(Error::UnexpectedCharacter { ch: c, line_number }))
    }
}

impl Iterator for Tokenizer {
    type Item = Result<(Token, usize), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenize a full source string, collecting every token eagerly (used by
/// the parser, which needs to look at already-produced tokens freely)
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, Error> {
    Tokenizer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_minimal_class() {
        let tokens = tokenize("class Main {\n  function void main() { return; }\n}\n").unwrap();
        let kinds: Vec<Token> = tokens.into_iter().map(|(t, _)| t).collect();
        assert_eq!(
            kinds,
            vec![
                Token::Keyword(Keyword::Class),
                Token::Identifier("Main".to_string()),
                Token::Symbol('{'),
                Token::Keyword(Keyword::Function),
                Token::Keyword(Keyword::Void),
                Token::Identifier("main".to_string()),
                Token::Symbol('('),
                Token::Symbol(')'),
                Token::Symbol('{'),
                Token::Keyword(Keyword::Return),
                Token::Symbol(';'),
                Token::Symbol('}'),
                Token::Symbol('}'),
            ]
        );
    }

    #[test]
    fn skips_line_and_block_comments() {
        let tokens = tokenize("// a comment\nlet /* inline */ x = 1;\n").unwrap();
        let kinds: Vec<Token> = tokens.into_iter().map(|(t, _)| t).collect();
        assert!(kinds.contains(&Token::Identifier("x".to_string())));
    }

    #[test]
    fn distinguishes_slash_from_comment_markers() {
        let tokens = tokenize("let x = a / b;\n").unwrap();
        let kinds: Vec<Token> = tokens.into_iter().map(|(t, _)| t).collect();
        assert!(kinds.contains(&Token::Symbol('/')));
    }

    #[test]
    fn rejects_integer_over_32767() {
        assert!(tokenize("32768").is_err());
        assert!(tokenize("32767").is_ok());
    }

    #[test]
    fn rejects_unterminated_string() {
        assert!(tokenize("\"unterminated").is_err());
    }

    #[test]
    fn rejects_unterminated_block_comment() {
        assert!(tokenize("/* never closes").is_err());
    }

    #[test]
    fn string_constant_excludes_quotes() {
        let tokens = tokenize("\"hello world\"").unwrap();
        assert_eq!(tokens[0].0, Token::StringConstant("hello world".to_string()));
    }

    #[test]
    fn rejects_unexpected_character() {
        assert!(tokenize("let x = @;").is_err());
    }
}
