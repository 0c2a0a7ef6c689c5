//! Compiles Jack source, class by class, straight into VM commands
//!
//! There is no intermediate parse tree and no cross-class linking: each
//! `.jack` file is compiled independently into its own sequence of VM
//! command lines (`engine::compile` drives the tokenizer, the class/
//! subroutine symbol tables, and the VM writer together in one pass).

pub mod engine;
pub mod error;
pub mod symbol_table;
pub mod token;
pub mod tokenizer;
pub mod writer;

use std::fs;
use std::path::Path;

pub use error::Error;

/// Compile one class's Jack source text into VM command lines
pub fn compile_class(source: &str) -> Result<Vec<String>, Error> {
    engine::compile(source)
}

/// Compile a single `.jack` file on disk
pub fn compile_file(path: &str) -> Result<Vec<String>, Error> {
    let source = fs::read_to_string(path).map_err(|_| Error::ReadError { path: path.to_string() })?;
    compile_class(&source)
}

/// Compile every `.jack` file directly inside `dir`, independently.
/// Returns one `(stem, lines)` pair per file; there is no linking step.
pub fn compile_directory(dir: &str) -> Result<Vec<(String, Vec<String>)>, Error> {
    let entries = fs::read_dir(dir).map_err(|_| Error::ReadError { path: dir.to_string() })?;
    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "jack"))
        .collect();
    paths.sort();

    let mut results = Vec::new();
    for path in paths {
        let source = fs::read_to_string(&path).map_err(|_| Error::ReadError {
            path: path.display().to_string(),
        })?;
        let lines = compile_class(&source)?;
        let stem = Path::new(&path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        results.push((stem, lines));
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_file_reads_disk() {
        use std::io::Write;
        let mut file = tempfile::Builder::new().suffix(".jack").tempfile().unwrap();
        write!(file, "class Main {{ function void main() {{ return; }} }}").unwrap();
        let lines = compile_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(lines, vec!["function Main.main 0", "push constant 0", "return"]);
    }

    #[test]
    fn compile_directory_compiles_each_class_independently() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.jack"), "class A { function void f() { return; } }").unwrap();
        fs::write(dir.path().join("B.jack"), "class B { function void g() { return; } }").unwrap();
        let results = compile_directory(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(results.len(), 2);
        let names: Vec<&String> = results.iter().map(|(name, _)| name).collect();
        assert!(names.contains(&&"A".to_string()));
        assert!(names.contains(&&"B".to_string()));
    }
}
