//! Accumulates emitted VM command text

/// Writes VM commands, one line at a time, into an in-memory buffer
pub struct VmWriter {
    lines: Vec<String>,
}

impl VmWriter {
    /// Create an empty writer
    pub fn new() -> VmWriter {
        VmWriter { lines: Vec::new() }
    }

    /// Emit `push <segment> <index>`
    pub fn write_push(&mut self, segment: &str, index: u16) {
        self.lines.push(format!("push {} {}", segment, index));
    }

    /// Emit `pop <segment> <index>`
    pub fn write_pop(&mut self, segment: &str, index: u16) {
        self.lines.push(format!("pop {} {}", segment, index));
    }

    /// Emit an arithmetic-logical command (`add`, `neg`, ...)
    pub fn write_arithmetic(&mut self, command: &str) {
        self.lines.push(command.to_string());
    }

    /// Emit `label <name>`
    pub fn write_label(&mut self, name: &str) {
        self.lines.push(format!("label {}", name));
    }

    /// Emit `goto <name>`
    pub fn write_goto(&mut self, name: &str) {
        self.lines.push(format!("goto {}", name));
    }

    /// Emit `if-goto <name>`
    pub fn write_if(&mut self, name: &str) {
        self.lines.push(format!("if-goto {}", name));
    }

    /// Emit `call <name> <nArgs>`
    pub fn write_call(&mut self, name: &str, n_args: u16) {
        self.lines.push(format!("call {} {}", name, n_args));
    }

    /// Emit `function <name> <nLocals>`
    pub fn write_function(&mut self, name: &str, n_locals: u16) {
        self.lines.push(format!("function {} {}", name, n_locals));
    }

    /// Emit `return`
    pub fn write_return(&mut self) {
        self.lines.push("return".to_string());
    }

    /// Consume the writer, returning the accumulated lines
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Peek at the accumulated lines without consuming the writer
    pub fn lines_ref(&self) -> &[String] {
        &self.lines
    }
}

impl Default for VmWriter {
    fn default() -> VmWriter {
        VmWriter::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_expected_text() {
        let mut w = VmWriter::new();
        w.write_push("constant", 7);
        w.write_function("Main.main", 0);
        w.write_return();
        assert_eq!(w.into_lines(), vec!["push constant 7", "function Main.main 0", "return"]);
    }
}
