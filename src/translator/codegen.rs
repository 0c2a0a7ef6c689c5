//! Lowers VM commands to Hack assembly

use super::command::{ArithOp, Command, Segment};
use super::error::Error;
use super::writer::InstructionWriter;

/// Translates a stream of VM commands belonging to one source file into
/// Hack assembly, tracking the current function (for label namespacing)
/// and handing out fresh labels for comparisons and call return addresses
pub struct Translator {
    writer: InstructionWriter,
    filename: String,
    current_function: String,
    return_seq: u32,
}

impl Translator {
    /// Start a translator for one VM source file. `filename` should be the
    /// file's basename without extension, used for `static` addressing and
    /// as the initial label namespace before any `function` is seen.
    pub fn new(filename: &str) -> Translator {
        Translator {
            writer: InstructionWriter::new(),
            filename: filename.to_string(),
            current_function: filename.to_string(),
            return_seq: 0,
        }
    }

    /// Emit the fixed bootstrap preamble: `SP = 256`, then `call Sys.init 0`
    pub fn bootstrap(&mut self) -> Result<(), Error> {
        self.writer.write_comment("bootstrap");
        self.writer.write_a_decimal(256);
        self.writer.write_c("D", "A", "");
        self.writer.write_a_symbolic("SP");
        self.writer.write_c("M", "D", "");
        self.translate_call("Sys.init", 0);
        Ok(())
    }

    /// Emit the trailing infinite loop so a program that falls off the end halts
    pub fn halt(&mut self) {
        self.writer.write_label("END");
        self.writer.write_a_symbolic("END");
        self.writer.write_c("", "0", "JMP");
    }

    /// Translate one command, emitting a leading comment mirroring the source
    pub fn translate_command(&mut self, command: &Command, line_number: usize, line: &str) -> Result<(), Error> {
        self.writer.write_comment(line);
        match command {
            Command::Arithmetic(op) => self.translate_arithmetic(*op),
            Command::Push(segment, index) => self.translate_push(*segment, *index, line_number, line)?,
            Command::Pop(segment, index) => self.translate_pop(*segment, *index, line_number, line)?,
            Command::Label(name) => self.translate_label(name),
            Command::Goto(name) => self.translate_goto(name),
            Command::IfGoto(name) => self.translate_if_goto(name),
            Command::Function(name, n_vars) => self.translate_function(name, *n_vars),
            Command::Call(name, n_args) => self.translate_call(name, *n_args),
            Command::Return => self.translate_return(),
        }
        Ok(())
    }

    /// Hand back the accumulated assembly lines
    pub fn into_lines(self) -> Vec<String> {
        self.writer.into_lines()
    }

    fn push_d(&mut self) {
        self.writer.write_a_symbolic("SP");
        self.writer.write_c("A", "M", "");
        self.writer.write_c("M", "D", "");
        self.writer.write_a_symbolic("SP");
        self.writer.write_c("M", "M+1", "");
    }

    fn pop_to_d(&mut self) {
        self.writer.write_a_symbolic("SP");
        self.writer.write_c("M", "M-1", "");
        self.writer.write_c("A", "M", "");
        self.writer.write_c("D", "M", "");
    }

    fn segment_base(segment: Segment) -> Option<&'static str> {
        Some(match segment {
            Segment::Local => "LCL",
            Segment::Argument => "ARG",
            Segment::This => "THIS",
            Segment::That => "THAT",
            _ => return None,
        })
    }

    fn translate_push(&mut self, segment: Segment, index: u16, line_number: usize, line: &str) -> Result<(), Error> {
        match segment {
            Segment::Constant => {
                self.writer.write_a_decimal(index);
                self.writer.write_c("D", "A", "");
            }
            Segment::Static => {
                self.writer.write_a_symbolic(&format!("{}.{}", self.filename, index));
                self.writer.write_c("D", "M", "");
            }
            Segment::Temp => {
                let address = check_fixed_index("temp", index, 8, line_number, line)? + 5;
                self.writer.write_a_decimal(address);
                self.writer.write_c("D", "M", "");
            }
            Segment::Pointer => {
                let address = check_fixed_index("pointer", index, 2, line_number, line)? + 3;
                self.writer.write_a_decimal(address);
                self.writer.write_c("D", "M", "");
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let base = Self::segment_base(segment).unwrap();
                self.writer.write_a_symbolic(base);
                self.writer.write_c("D", "M", "");
                self.writer.write_a_decimal(index);
                self.writer.write_c("A", "D+A", "");
                self.writer.write_c("D", "M", "");
            }
        }
        self.push_d();
        Ok(())
    }

    fn translate_pop(&mut self, segment: Segment, index: u16, line_number: usize, line: &str) -> Result<(), Error> {
        match segment {
            Segment::Constant => {
                return Err(Error::MalformedCommand {
                    line_number,
                    line: line.to_string(),
                })
            }
            Segment::Static => {
                self.pop_to_d();
                self.writer.write_a_symbolic(&format!("{}.{}", self.filename, index));
                self.writer.write_c("M", "D", "");
            }
            Segment::Temp => {
                let address = check_fixed_index("temp", index, 8, line_number, line)? + 5;
                self.pop_to_d();
                self.writer.write_a_decimal(address);
                self.writer.write_c("M", "D", "");
            }
            Segment::Pointer => {
                let address = check_fixed_index("pointer", index, 2, line_number, line)? + 3;
                self.pop_to_d();
                self.writer.write_a_decimal(address);
                self.writer.write_c("M", "D", "");
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let base = Self::segment_base(segment).unwrap();
                self.writer.write_a_symbolic(base);
                self.writer.write_c("D", "M", "");
                self.writer.write_a_decimal(index);
                self.writer.write_c("D", "D+A", "");
                self.writer.write_a_symbolic("R13");
                self.writer.write_c("M", "D", "");
                self.pop_to_d();
                self.writer.write_a_symbolic("R13");
                self.writer.write_c("A", "M", "");
                self.writer.write_c("M", "D", "");
            }
        }
        Ok(())
    }

    fn translate_arithmetic(&mut self, op: ArithOp) {
        if op.is_unary() {
            self.pop_to_d();
            let comp = if op == ArithOp::Neg { "-D" } else { "!D" };
            self.writer.write_c("D", comp, "");
            self.push_d();
            return;
        }
        match op {
            ArithOp::Add | ArithOp::Sub | ArithOp::And | ArithOp::Or => {
                self.pop_to_d();
                self.writer.write_a_symbolic("R13");
                self.writer.write_c("M", "D", "");
                self.pop_to_d();
                self.writer.write_a_symbolic("R13");
                let comp = match op {
                    ArithOp::Add => "D+M",
                    ArithOp::Sub => "D-M",
                    ArithOp::And => "D&M",
                    ArithOp::Or => "D|M",
                    _ => unreachable!(),
                };
                self.writer.write_c("D", comp, "");
                self.push_d();
            }
            ArithOp::Eq | ArithOp::Gt | ArithOp::Lt => {
                self.pop_to_d();
                self.writer.write_a_symbolic("R13");
                self.writer.write_c("M", "D", "");
                self.pop_to_d();
                self.writer.write_a_symbolic("R13");
                self.writer.write_c("D", "D-M", "");
                let jump = match op {
                    ArithOp::Eq => "JEQ",
                    ArithOp::Gt => "JGT",
                    ArithOp::Lt => "JLT",
                    _ => unreachable!(),
                };
                let true_raw = self.writer.new_label("COMPARE_TRUE");
                let end_raw = self.writer.new_label("COMPARE_END");
                let true_label = self.namespaced(&true_raw);
                let end_label = self.namespaced(&end_raw);
                self.writer.write_a_symbolic(&true_label);
                self.writer.write_c("", "D", jump);
                self.writer.write_c("D", "0", "");
                self.writer.write_a_symbolic(&end_label);
                self.writer.write_c("", "0", "JMP");
                self.writer.write_label(&true_label);
                self.writer.write_c("D", "-1", "");
                self.writer.write_label(&end_label);
                self.push_d();
            }
            ArithOp::Neg | ArithOp::Not => unreachable!("handled above"),
        }
    }

    fn namespaced(&self, label: &str) -> String {
        format!("{}.{}${}", self.filename, self.current_function, label)
    }

    fn translate_label(&mut self, name: &str) {
        let label = self.namespaced(name);
        self.writer.write_label(&label);
    }

    fn translate_goto(&mut self, name: &str) {
        let label = self.namespaced(name);
        self.writer.write_a_symbolic(&label);
        self.writer.write_c("", "0", "JMP");
    }

    fn translate_if_goto(&mut self, name: &str) {
        self.pop_to_d();
        let label = self.namespaced(name);
        self.writer.write_a_symbolic(&label);
        self.writer.write_c("", "D", "JNE");
    }

    fn translate_function(&mut self, name: &str, n_vars: u16) {
        self.current_function = name.to_string();
        self.writer.write_label(name);
        for _ in 0..n_vars {
            self.writer.write_c("D", "0", "");
            self.push_d();
        }
    }

    fn translate_call(&mut self, name: &str, n_args: u16) {
        self.return_seq += 1;
        let return_label = format!("{}$ret.{}", self.current_function, self.return_seq);

        self.writer.write_a_symbolic(&return_label);
        self.writer.write_c("D", "A", "");
        self.push_d();

        for segment in ["LCL", "ARG", "THIS", "THAT"] {
            self.writer.write_a_symbolic(segment);
            self.writer.write_c("D", "M", "");
            self.push_d();
        }

        self.writer.write_a_symbolic("SP");
        self.writer.write_c("D", "M", "");
        self.writer.write_a_decimal(n_args + 5);
        self.writer.write_c("D", "D-A", "");
        self.writer.write_a_symbolic("ARG");
        self.writer.write_c("M", "D", "");

        self.writer.write_a_symbolic("SP");
        self.writer.write_c("D", "M", "");
        self.writer.write_a_symbolic("LCL");
        self.writer.write_c("M", "D", "");

        self.writer.write_a_symbolic(name);
        self.writer.write_c("", "0", "JMP");

        self.writer.write_label(&return_label);
    }

    fn restore_frame_field(&mut self, offset: u16, target: &str) {
        self.writer.write_a_symbolic("R13");
        self.writer.write_c("D", "M", "");
        self.writer.write_a_decimal(offset);
        self.writer.write_c("A", "D-A", "");
        self.writer.write_c("D", "M", "");
        self.writer.write_a_symbolic(target);
        self.writer.write_c("M", "D", "");
    }

    fn translate_return(&mut self) {
        self.writer.write_a_symbolic("LCL");
        self.writer.write_c("D", "M", "");
        self.writer.write_a_symbolic("R13");
        self.writer.write_c("M", "D", "");

        self.writer.write_a_symbolic("R13");
        self.writer.write_c("D", "M", "");
        self.writer.write_a_decimal(5);
        self.writer.write_c("A", "D-A", "");
        self.writer.write_c("D", "M", "");
        self.writer.write_a_symbolic("R14");
        self.writer.write_c("M", "D", "");

        self.pop_to_d();
        self.writer.write_a_symbolic("ARG");
        self.writer.write_c("A", "M", "");
        self.writer.write_c("M", "D", "");

        self.writer.write_a_symbolic("ARG");
        self.writer.write_c("D", "M+1", "");
        self.writer.write_a_symbolic("SP");
        self.writer.write_c("M", "D", "");

        self.restore_frame_field(1, "THAT");
        self.restore_frame_field(2, "THIS");
        self.restore_frame_field(3, "ARG");
        self.restore_frame_field(4, "LCL");

        self.writer.write_a_symbolic("R14");
        self.writer.write_c("A", "M", "");
        self.writer.write_c("", "0", "JMP");
    }
}

/// Render a command back to VM source text, for the comment emitted ahead
/// of each translated block
pub fn describe(command: &Command) -> String {
    match command {
        Command::Arithmetic(op) => op.to_string(),
        Command::Push(segment, index) => format!("push {} {}", segment, index),
        Command::Pop(segment, index) => format!("pop {} {}", segment, index),
        Command::Label(name) => format!("label {}", name),
        Command::Goto(name) => format!("goto {}", name),
        Command::IfGoto(name) => format!("if-goto {}", name),
        Command::Function(name, n_vars) => format!("function {} {}", name, n_vars),
        Command::Call(name, n_args) => format!("call {} {}", name, n_args),
        Command::Return => "return".to_string(),
    }
}

fn check_fixed_index(segment: &str, index: u16, size: u16, line_number: usize, line: &str) -> Result<u16, Error> {
    if index >= size {
        return Err(Error::IndexOutOfRange {
            segment: segment.to_string(),
            index,
            line_number,
            line: line.to_string(),
        });
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_constant_then_add_nets_sum() {
        let mut t = Translator::new("Test");
        t.translate_command(&Command::Push(Segment::Constant, 7), 1, "push constant 7").unwrap();
        t.translate_command(&Command::Push(Segment::Constant, 8), 2, "push constant 8").unwrap();
        t.translate_command(&Command::Arithmetic(ArithOp::Add), 3, "add").unwrap();
        let lines = t.into_lines();
        assert!(lines.iter().any(|l| l == "D=D+M"));
    }

    #[test]
    fn labels_are_namespaced_by_file_and_function() {
        let mut t = Translator::new("Main");
        t.translate_command(&Command::Function("Main.main".to_string(), 0), 1, "function Main.main 0")
            .unwrap();
        t.translate_command(&Command::Label("LOOP".to_string()), 2, "label LOOP").unwrap();
        let lines = t.into_lines();
        assert!(lines.contains(&"(Main.Main.main$LOOP)".to_string()));
    }

    #[test]
    fn temp_index_out_of_range_is_an_error() {
        let mut t = Translator::new("Test");
        assert!(t.translate_command(&Command::Push(Segment::Temp, 8), 1, "push temp 8").is_err());
    }

    #[test]
    fn pointer_accepts_zero_and_one() {
        let mut t = Translator::new("Test");
        assert!(t.translate_command(&Command::Push(Segment::Pointer, 0), 1, "push pointer 0").is_ok());
        assert!(t.translate_command(&Command::Push(Segment::Pointer, 1), 2, "push pointer 1").is_ok());
        assert!(t.translate_command(&Command::Push(Segment::Pointer, 2), 3, "push pointer 2").is_err());
    }

    #[test]
    fn comparison_labels_are_namespaced_by_file_and_function() {
        let mut t = Translator::new("Main");
        t.translate_command(&Command::Function("Main.main".to_string(), 0), 1, "function Main.main 0")
            .unwrap();
        t.translate_command(&Command::Push(Segment::Constant, 1), 2, "push constant 1").unwrap();
        t.translate_command(&Command::Push(Segment::Constant, 1), 3, "push constant 1").unwrap();
        t.translate_command(&Command::Arithmetic(ArithOp::Eq), 4, "eq").unwrap();
        let lines = t.into_lines();
        assert!(lines.contains(&"(Main.Main.main$COMPARE_TRUE.0)".to_string()));
        assert!(lines.contains(&"(Main.Main.main$COMPARE_END.1)".to_string()));
    }

    #[test]
    fn call_return_address_labels_use_a_separate_counter() {
        let mut t = Translator::new("Main");
        t.translate_command(&Command::Call("Foo.bar".to_string(), 0), 1, "call Foo.bar 0").unwrap();
        t.translate_command(&Command::Call("Foo.baz".to_string(), 0), 2, "call Foo.baz 0").unwrap();
        let lines = t.into_lines();
        assert!(lines.iter().any(|l| l == "(Main$ret.1)"));
        assert!(lines.iter().any(|l| l == "(Main$ret.2)"));
    }
}
