//! Translates VM commands into Hack assembly
//!
//! A single file is translated with [`translate`]; [`translate_batch`]
//! combines several files (as in directory mode) behind one shared bootstrap
//! preamble and trailing halt loop, matching how a Hack program built from
//! multiple VM files is meant to run.

pub mod codegen;
pub mod command;
pub mod error;
pub mod parser;
pub mod writer;

use std::fs;
use std::path::Path;

use codegen::{describe, Translator};
pub use error::Error;
use tracing::debug;

/// Translate one VM source file's text into Hack assembly lines, with no
/// bootstrap preamble or halt loop (those are a property of the whole
/// program, not of a single file -- see [`translate_batch`]).
pub fn translate(source: &str, filename: &str) -> Result<Vec<String>, Error> {
    let commands = parser::parse(source)?;
    debug!(count = commands.len(), file = filename, "parsed vm commands");
    let mut translator = Translator::new(filename);
    for (command, line_number) in &commands {
        translator.translate_command(command, *line_number, &describe(command))?;
    }
    Ok(translator.into_lines())
}

/// Translate a single `.vm` file on disk, bootstrap preamble and halt loop
/// included, as `translator input.vm` does.
pub fn translate_file(path: &str) -> Result<Vec<String>, Error> {
    let source = fs::read_to_string(path).map_err(|_| Error::ReadError { path: path.to_string() })?;
    let filename = file_stem(path);
    let mut translator = Translator::new(&filename);
    translator.bootstrap()?;
    let commands = parser::parse(&source)?;
    for (command, line_number) in &commands {
        translator.translate_command(command, *line_number, &describe(command))?;
    }
    translator.halt();
    Ok(translator.into_lines())
}

/// Translate several named VM sources as one program: one shared bootstrap
/// preamble, each file's commands namespaced by its own filename, and one
/// trailing halt loop -- as `translator dir/` does across every `.vm` child.
pub fn translate_batch(sources: &[(String, String)]) -> Result<Vec<String>, Error> {
    let mut lines = Vec::new();
    {
        let mut boot = Translator::new("Bootstrap");
        boot.bootstrap()?;
        lines.extend(boot.into_lines());
    }
    for (filename, source) in sources {
        let commands = parser::parse(source)?;
        debug!(count = commands.len(), file = %filename, "parsed vm commands");
        let mut translator = Translator::new(filename);
        for (command, line_number) in &commands {
            translator.translate_command(command, *line_number, &describe(command))?;
        }
        lines.extend(translator.into_lines());
    }
    {
        let mut tail = Translator::new("Bootstrap");
        tail.halt();
        lines.extend(tail.into_lines());
    }
    Ok(lines)
}

/// Translate every `.vm` file directly inside `dir`, combined as one program
pub fn translate_directory(dir: &str) -> Result<Vec<String>, Error> {
    let entries = fs::read_dir(dir).map_err(|_| Error::ReadError { path: dir.to_string() })?;
    let mut sources = Vec::new();
    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "vm"))
        .collect();
    paths.sort();
    for path in paths {
        let text = fs::read_to_string(&path).map_err(|_| Error::ReadError {
            path: path.display().to_string(),
        })?;
        sources.push((file_stem(&path.display().to_string()), text));
    }
    translate_batch(&sources)
}

fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s4_arithmetic_pushes_sum() {
        let lines = translate("push constant 7\npush constant 8\nadd\n", "Test").unwrap();
        assert!(!lines.is_empty());
        assert!(lines.iter().any(|l| l == "D=D+M"));
    }

    #[test]
    fn s5_eq_compares_equal_operands() {
        let lines = translate("push constant 3\npush constant 3\neq\n", "Test").unwrap();
        assert!(lines.iter().any(|l| l.contains("JEQ")));
        assert!(lines.iter().any(|l| l == "D=-1"));
    }

    #[test]
    fn translate_file_wraps_in_bootstrap_and_halt() {
        use std::io::Write;
        let mut file = tempfile::Builder::new().suffix(".vm").tempfile().unwrap();
        write!(file, "push constant 1\npop temp 0\n").unwrap();
        let lines = translate_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(lines.first().map(String::as_str), Some("// bootstrap"));
        assert_eq!(lines.last().map(String::as_str), Some("0;JMP"));
    }

    #[test]
    fn translate_batch_namespaces_each_file_independently() {
        let sources = vec![
            ("Foo".to_string(), "function Foo.run 0\nreturn\n".to_string()),
            ("Bar".to_string(), "function Bar.run 0\nreturn\n".to_string()),
        ];
        let lines = translate_batch(&sources).unwrap();
        assert!(lines.contains(&"(Foo.run)".to_string()));
        assert!(lines.contains(&"(Bar.run)".to_string()));
    }

    #[test]
    fn translate_batch_does_not_collide_comparison_labels_across_files() {
        // Each file gets its own Translator (and so its own label counter); two files that
        // both contain a comparison must not mint the same assembly label.
        let body = "function Run.run 0\npush constant 1\npush constant 1\neq\npop temp 0\nreturn\n";
        let sources = vec![("Foo".to_string(), body.to_string()), ("Bar".to_string(), body.to_string())];
        let lines = translate_batch(&sources).unwrap();

        let labels: Vec<&String> = lines.iter().filter(|l| l.starts_with('(') && l.ends_with(')')).collect();
        let mut unique = labels.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(labels.len(), unique.len(), "duplicate label across files: {:?}", labels);

        assert!(lines.contains(&"(Foo.Run.run$COMPARE_TRUE.0)".to_string()));
        assert!(lines.contains(&"(Bar.Run.run$COMPARE_TRUE.0)".to_string()));
    }
}
