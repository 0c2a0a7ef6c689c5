//! Single-pass recursive-descent compiler: parses a class and emits VM code
//! directly, with no intermediate parse tree.

use super::error::Error;
use super::symbol_table::{Kind, Symbol, SymbolTable};
use super::token::{Keyword, Token};
use super::tokenizer::tokenize;
use super::writer::VmWriter;
use tracing::trace;

/// Compile one Jack class's source text into its VM command lines
pub fn compile(source: &str) -> Result<Vec<String>, Error> {
    let tokens = tokenize(source)?;
    let mut engine = Engine {
        tokens,
        pos: 0,
        class_name: String::new(),
        symbols: SymbolTable::new(),
        writer: VmWriter::new(),
        if_count: 0,
        while_count: 0,
    };
    engine.compile_class()?;
    Ok(engine.writer.into_lines())
}

struct Engine {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    class_name: String,
    symbols: SymbolTable,
    writer: VmWriter,
    if_count: u32,
    while_count: u32,
}

impl Engine {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, l)| *l)
            .or_else(|| self.tokens.last().map(|(_, l)| *l))
            .unwrap_or(0)
    }

    fn peek_symbol(&self, c: char) -> bool {
        matches!(self.peek(), Some(Token::Symbol(s)) if *s == c)
    }

    fn peek_keyword(&self, k: Keyword) -> bool {
        matches!(self.peek(), Some(Token::Keyword(kw)) if *kw == k)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expected(&self, what: &str) -> Error {
        Error::Expected {
            expected: what.to_string(),
            found: self.peek().cloned(),
            line_number: self.peek_line(),
        }
    }

    fn expect_symbol(&mut self, c: char) -> Result<(), Error> {
        if self.peek_symbol(c) {
            self.advance();
            Ok(())
        } else {
            Err(self.expected(&format!("symbol \"{}\"", c)))
        }
    }

    fn expect_keyword(&mut self, k: Keyword) -> Result<(), Error> {
        if self.peek_keyword(k) {
            self.advance();
            Ok(())
        } else {
            Err(self.expected(&format!("keyword \"{}\"", k)))
        }
    }

    fn expect_identifier(&mut self) -> Result<String, Error> {
        match self.peek().cloned() {
            Some(Token::Identifier(name)) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.expected("identifier")),
        }
    }

    /// `'int' | 'char' | 'boolean' | className`
    fn expect_type(&mut self) -> Result<String, Error> {
        match self.peek().cloned() {
            Some(Token::Keyword(k @ (Keyword::Int | Keyword::Char | Keyword::Boolean))) => {
                self.advance();
                Ok(k.to_string())
            }
            Some(Token::Identifier(name)) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.expected("type")),
        }
    }

    fn segment_for(symbol: &Symbol) -> &'static str {
        match symbol.kind {
            Kind::Static => "static",
            Kind::Field => "this",
            Kind::Arg => "argument",
            Kind::Var => "local",
        }
    }

    fn push_variable(&mut self, symbol: &Symbol) {
        self.writer.write_push(Self::segment_for(symbol), symbol.index);
    }

    fn resolve(&self, name: &str, line_number: usize) -> Result<Symbol, Error> {
        self.symbols
            .resolve(name)
            .cloned()
            .ok_or(Error::UnknownIdentifier {
                name: name.to_string(),
                line_number,
            })
    }

    fn compile_class(&mut self) -> Result<(), Error> {
        self.expect_keyword(Keyword::Class)?;
        self.class_name = self.expect_identifier()?;
        self.expect_symbol('{')?;
        while self.peek_keyword(Keyword::Static) || self.peek_keyword(Keyword::Field) {
            self.compile_class_var_dec()?;
        }
        while self.peek_keyword(Keyword::Constructor)
            || self.peek_keyword(Keyword::Function)
            || self.peek_keyword(Keyword::Method)
        {
            self.compile_subroutine_dec()?;
        }
        self.expect_symbol('}')?;
        trace!(class = %self.class_name, "compiled class");
        Ok(())
    }

    fn compile_class_var_dec(&mut self) -> Result<(), Error> {
        let kind = match self.advance() {
            Some(Token::Keyword(Keyword::Static)) => Kind::Static,
            Some(Token::Keyword(Keyword::Field)) => Kind::Field,
            _ => return Err(self.expected("\"static\" or \"field\"")),
        };
        let type_name = self.expect_type()?;
        self.declare_var_list(&type_name, kind)?;
        self.expect_symbol(';')?;
        Ok(())
    }

    fn declare_var_list(&mut self, type_name: &str, kind: Kind) -> Result<(), Error> {
        loop {
            let line_number = self.peek_line();
            let name = self.expect_identifier()?;
            if !self.symbols.define(&name, type_name, kind) {
                return Err(Error::DuplicateSymbol { name, line_number });
            }
            if self.peek_symbol(',') {
                self.advance();
                continue;
            }
            break;
        }
        Ok(())
    }

    fn compile_subroutine_dec(&mut self) -> Result<(), Error> {
        let kind = match self.advance() {
            Some(Token::Keyword(k @ (Keyword::Constructor | Keyword::Function | Keyword::Method))) => k,
            _ => return Err(self.expected("\"constructor\", \"function\" or \"method\"")),
        };
        // return type: 'void' or a type, discarded -- VM output has no types
        match self.peek().cloned() {
            Some(Token::Keyword(Keyword::Void)) => {
                self.advance();
            }
            _ => {
                self.expect_type()?;
            }
        }
        let name = self.expect_identifier()?;
        self.symbols.start_subroutine(kind == Keyword::Method);
        self.if_count = 0;
        self.while_count = 0;
        self.expect_symbol('(')?;
        self.compile_parameter_list()?;
        self.expect_symbol(')')?;
        self.compile_subroutine_body(&name, kind)?;
        Ok(())
    }

    fn compile_parameter_list(&mut self) -> Result<(), Error> {
        if self.peek_symbol(')') {
            return Ok(());
        }
        loop {
            let type_name = self.expect_type()?;
            let line_number = self.peek_line();
            let name = self.expect_identifier()?;
            if !self.symbols.define(&name, &type_name, Kind::Arg) {
                return Err(Error::DuplicateSymbol { name, line_number });
            }
            if self.peek_symbol(',') {
                self.advance();
                continue;
            }
            break;
        }
        Ok(())
    }

    fn compile_subroutine_body(&mut self, name: &str, kind: Keyword) -> Result<(), Error> {
        self.expect_symbol('{')?;
        while self.peek_keyword(Keyword::Var) {
            self.compile_var_dec()?;
        }
        let n_locals = self.symbols.var_count();
        self.writer.write_function(&format!("{}.{}", self.class_name, name), n_locals);
        match kind {
            Keyword::Constructor => {
                self.writer.write_push("constant", self.symbols.field_count());
                self.writer.write_call("Memory.alloc", 1);
                self.writer.write_pop("pointer", 0);
            }
            Keyword::Method => {
                self.writer.write_push("argument", 0);
                self.writer.write_pop("pointer", 0);
            }
            Keyword::Function => {}
            _ => unreachable!(),
        }
        self.compile_statements()?;
        self.expect_symbol('}')?;
        self.ensure_subroutine_returns();
        Ok(())
    }

    /// Every subroutine must end with a VM `return`. If the body fell off
    /// the end without an explicit `return` statement, synthesize one.
    fn ensure_subroutine_returns(&mut self) {
        let lines = self.writer_lines_ref();
        if lines.last().map(String::as_str) != Some("return") {
            self.writer.write_push("constant", 0);
            self.writer.write_return();
        }
    }

    fn writer_lines_ref(&self) -> &[String] {
        self.writer.lines_ref()
    }

    fn compile_var_dec(&mut self) -> Result<(), Error> {
        self.expect_keyword(Keyword::Var)?;
        let type_name = self.expect_type()?;
        self.declare_var_list(&type_name, Kind::Var)?;
        self.expect_symbol(';')?;
        Ok(())
    }

    fn compile_statements(&mut self) -> Result<(), Error> {
        loop {
            match self.peek() {
                Some(Token::Keyword(Keyword::Let)) => self.compile_let()?,
                Some(Token::Keyword(Keyword::If)) => self.compile_if()?,
                Some(Token::Keyword(Keyword::While)) => self.compile_while()?,
                Some(Token::Keyword(Keyword::Do)) => self.compile_do()?,
                Some(Token::Keyword(Keyword::Return)) => self.compile_return()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn compile_let(&mut self) -> Result<(), Error> {
        self.expect_keyword(Keyword::Let)?;
        let line_number = self.peek_line();
        let name = self.expect_identifier()?;
        let symbol = self.resolve(&name, line_number)?;

        let is_array = if self.peek_symbol('[') {
            self.advance();
            self.push_variable(&symbol);
            self.compile_expression()?;
            self.expect_symbol(']')?;
            self.writer.write_arithmetic("add");
            true
        } else {
            false
        };

        self.expect_symbol('=')?;
        self.compile_expression()?;
        self.expect_symbol(';')?;

        if is_array {
            self.writer.write_pop("temp", 0);
            self.writer.write_pop("pointer", 1);
            self.writer.write_push("temp", 0);
            self.writer.write_pop("that", 0);
        } else {
            self.writer.write_pop(Self::segment_for(&symbol), symbol.index);
        }
        Ok(())
    }

    fn compile_if(&mut self) -> Result<(), Error> {
        self.expect_keyword(Keyword::If)?;
        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        let n = self.if_count;
        self.if_count += 1;
        let false_label = format!("IF_FALSE{}", n);
        let end_label = format!("IF_END{}", n);

        self.writer.write_arithmetic("not");
        self.writer.write_if(&false_label);

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;

        if self.peek_keyword(Keyword::Else) {
            self.writer.write_goto(&end_label);
            self.writer.write_label(&false_label);
            self.advance();
            self.expect_symbol('{')?;
            self.compile_statements()?;
            self.expect_symbol('}')?;
            self.writer.write_label(&end_label);
        } else {
            self.writer.write_label(&false_label);
        }
        Ok(())
    }

    fn compile_while(&mut self) -> Result<(), Error> {
        self.expect_keyword(Keyword::While)?;
        let n = self.while_count;
        self.while_count += 1;
        let top_label = format!("WHILE_EXP{}", n);
        let end_label = format!("WHILE_END{}", n);

        self.writer.write_label(&top_label);
        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.writer.write_arithmetic("not");
        self.writer.write_if(&end_label);

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;

        self.writer.write_goto(&top_label);
        self.writer.write_label(&end_label);
        Ok(())
    }

    fn compile_do(&mut self) -> Result<(), Error> {
        self.expect_keyword(Keyword::Do)?;
        let line_number = self.peek_line();
        let first = self.expect_identifier()?;
        self.compile_call_after_name(first, line_number)?;
        self.expect_symbol(';')?;
        self.writer.write_pop("temp", 0);
        Ok(())
    }

    fn compile_return(&mut self) -> Result<(), Error> {
        self.expect_keyword(Keyword::Return)?;
        if self.peek_symbol(';') {
            self.writer.write_push("constant", 0);
        } else {
            self.compile_expression()?;
        }
        self.expect_symbol(';')?;
        self.writer.write_return();
        Ok(())
    }

    fn compile_expression(&mut self) -> Result<(), Error> {
        self.compile_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Symbol(c @ ('+' | '-' | '*' | '/' | '&' | '|' | '<' | '>' | '='))) => *c,
                _ => break,
            };
            self.advance();
            self.compile_term()?;
            self.emit_op(op);
        }
        Ok(())
    }

    fn emit_op(&mut self, op: char) {
        match op {
            '+' => self.writer.write_arithmetic("add"),
            '-' => self.writer.write_arithmetic("sub"),
            '&' => self.writer.write_arithmetic("and"),
            '|' => self.writer.write_arithmetic("or"),
            '<' => self.writer.write_arithmetic("lt"),
            '>' => self.writer.write_arithmetic("gt"),
            '=' => self.writer.write_arithmetic("eq"),
            '*' => self.writer.write_call("Math.multiply", 2),
            '/' => self.writer.write_call("Math.divide", 2),
            _ => unreachable!(),
        }
    }

    fn compile_term(&mut self) -> Result<(), Error> {
        match self.peek().cloned() {
            Some(Token::IntConstant(n)) => {
                self.advance();
                self.writer.write_push("constant", n);
            }
            Some(Token::StringConstant(s)) => {
                self.advance();
                self.compile_string_constant(&s);
            }
            Some(Token::Keyword(Keyword::True)) => {
                self.advance();
                self.writer.write_push("constant", 0);
                self.writer.write_arithmetic("not");
            }
            Some(Token::Keyword(Keyword::False)) | Some(Token::Keyword(Keyword::Null)) => {
                self.advance();
                self.writer.write_push("constant", 0);
            }
            Some(Token::Keyword(Keyword::This)) => {
                self.advance();
                self.writer.write_push("pointer", 0);
            }
            Some(Token::Symbol('(')) => {
                self.advance();
                self.compile_expression()?;
                self.expect_symbol(')')?;
            }
            Some(Token::Symbol('-')) => {
                self.advance();
                self.compile_term()?;
                self.writer.write_arithmetic("neg");
            }
            Some(Token::Symbol('~')) => {
                self.advance();
                self.compile_term()?;
                self.writer.write_arithmetic("not");
            }
            Some(Token::Identifier(name)) => {
                let line_number = self.peek_line();
                self.advance();
                match self.peek() {
                    Some(Token::Symbol('[')) => {
                        self.advance();
                        let symbol = self.resolve(&name, line_number)?;
                        self.push_variable(&symbol);
                        self.compile_expression()?;
                        self.expect_symbol(']')?;
                        self.writer.write_arithmetic("add");
                        self.writer.write_pop("pointer", 1);
                        self.writer.write_push("that", 0);
                    }
                    Some(Token::Symbol('(')) | Some(Token::Symbol('.')) => {
                        self.compile_call_after_name(name, line_number)?;
                    }
                    _ => {
                        let symbol = self.resolve(&name, line_number)?;
                        self.push_variable(&symbol);
                    }
                }
            }
            _ => return Err(self.expected("term")),
        }
        Ok(())
    }

    fn compile_string_constant(&mut self, s: &str) {
        self.writer.write_push("constant", s.chars().count() as u16);
        self.writer.write_call("String.new", 1);
        for c in s.chars() {
            self.writer.write_push("constant", c as u16);
            self.writer.write_call("String.appendChar", 2);
        }
    }

    /// `name(args)`, `ident.name(args)` -- `name`/`ident` already consumed
    fn compile_call_after_name(&mut self, first: String, line_number: usize) -> Result<(), Error> {
        match self.peek() {
            Some(Token::Symbol('(')) => {
                self.advance();
                self.writer.write_push("pointer", 0);
                let n = self.compile_expression_list()?;
                self.expect_symbol(')')?;
                self.writer.write_call(&format!("{}.{}", self.class_name, first), n + 1);
            }
            Some(Token::Symbol('.')) => {
                self.advance();
                let method_name = self.expect_identifier()?;
                self.expect_symbol('(')?;
                if let Some(symbol) = self.symbols.resolve(&first).cloned() {
                    self.push_variable(&symbol);
                    let n = self.compile_expression_list()?;
                    self.expect_symbol(')')?;
                    self.writer.write_call(&format!("{}.{}", symbol.type_name, method_name), n + 1);
                } else {
                    let n = self.compile_expression_list()?;
                    self.expect_symbol(')')?;
                    self.writer.write_call(&format!("{}.{}", first, method_name), n);
                }
            }
            _ => return Err(self.expected_at(line_number, "\"(\" or \".\"")),
        }
        Ok(())
    }

    fn expected_at(&self, line_number: usize, what: &str) -> Error {
        Error::Expected {
            expected: what.to_string(),
            found: self.peek().cloned(),
            line_number,
        }
    }

    fn compile_expression_list(&mut self) -> Result<u16, Error> {
        if self.peek_symbol(')') {
            return Ok(0);
        }
        let mut count = 1;
        self.compile_expression()?;
        while self.peek_symbol(',') {
            self.advance();
            self.compile_expression()?;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s6_minimal_class() {
        let lines = compile("class Main {\n  function void main() { return; }\n}\n").unwrap();
        assert_eq!(lines, vec!["function Main.main 0", "push constant 0", "return"]);
    }

    #[test]
    fn s7_method_with_field_access() {
        let lines = compile("class P {\n  field int x;\n  method int getX() { return x; }\n}\n").unwrap();
        assert_eq!(
            lines,
            vec![
                "function P.getX 0",
                "push argument 0",
                "pop pointer 0",
                "push this 0",
                "return",
            ]
        );
    }

    #[test]
    fn expression_parses_without_precedence() {
        // a + b * c must parse as ((a+b)*c): add emitted before multiply call
        let lines = compile(
            "class Main {\n  function int f(int a, int b, int c) { return a + b * c; }\n}\n",
        )
        .unwrap();
        let add_pos = lines.iter().position(|l| l == "add").unwrap();
        let mul_pos = lines.iter().position(|l| l == "call Math.multiply 2").unwrap();
        assert!(add_pos < mul_pos);
    }

    #[test]
    fn constructor_allocates_and_sets_this() {
        let lines = compile(
            "class Point {\n  field int x, y;\n  constructor Point new() { let x = 0; return this; }\n}\n",
        )
        .unwrap();
        assert!(lines.contains(&"push constant 2".to_string()));
        assert!(lines.contains(&"call Memory.alloc 1".to_string()));
        assert!(lines.contains(&"pop pointer 0".to_string()));
    }

    #[test]
    fn empty_string_constant() {
        let lines = compile("class Main {\n  method void f() { do g(\"\"); return; }\n}\n").unwrap();
        let new_pos = lines.iter().position(|l| l == "call String.new 1").unwrap();
        assert_eq!(lines[new_pos - 1], "push constant 0");
    }

    #[test]
    fn missing_explicit_return_is_synthesized() {
        let lines = compile("class Main {\n  method void noop() {\n  }\n}\n").unwrap();
        assert_eq!(lines.last().map(String::as_str), Some("return"));
        assert_eq!(lines[lines.len() - 2], "push constant 0");
    }

    #[test]
    fn array_write_orders_temp_before_pointer() {
        let lines = compile(
            "class Main {\n  function void f(Array a, int i, int v) { let a[i] = v; return; }\n}\n",
        )
        .unwrap();
        let temp_pop = lines.iter().position(|l| l == "pop temp 0").unwrap();
        let pointer_pop = lines.iter().position(|l| l == "pop pointer 1").unwrap();
        assert!(temp_pop < pointer_pop);
    }

    #[test]
    fn unknown_identifier_is_an_error() {
        assert!(compile("class Main {\n  function void f() { return bogus; }\n}\n").is_err());
    }

    #[test]
    fn duplicate_symbol_is_an_error() {
        assert!(compile("class Main {\n  field int x;\n  field int x;\n}\n").is_err());
    }
}
