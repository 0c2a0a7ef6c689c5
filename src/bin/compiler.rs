use jack2hack::compiler;
use jack2hack::config::Options;
use jack2hack::logging::error;
use std::{env, fs};

fn write_vm_file(stem: &str, dir: Option<&str>, lines: &[String]) -> std::io::Result<()> {
    let filename = format!("{}.vm", stem);
    let path = match dir {
        Some(dir) => format!("{}/{}", dir, filename),
        None => filename,
    };
    let mut contents = lines.join("\n");
    contents.push('\n');
    fs::write(path, contents)
}

fn main() {
    let options = Options::from_env();
    options.apply();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <input.jack | dir>", args[0]);
        std::process::exit(1);
    }

    let input_path = &args[1];
    let metadata = fs::metadata(input_path).unwrap_or_else(|e| {
        error(format!("cannot read {}: {}", input_path, e));
        std::process::exit(2);
    });

    if metadata.is_dir() {
        let results = compiler::compile_directory(input_path).unwrap_or_else(|e| {
            error(e.to_string());
            std::process::exit(3);
        });
        let trimmed = input_path.trim_end_matches('/');
        for (stem, lines) in &results {
            write_vm_file(stem, Some(trimmed), lines).unwrap_or_else(|e| {
                error(format!("failed to write {}.vm: {}", stem, e));
                std::process::exit(4);
            });
        }
    } else {
        let Some(stem) = input_path.strip_suffix(".jack") else {
            error(format!("input file must end in .jack: {}", input_path));
            std::process::exit(1);
        };
        let lines = compiler::compile_file(input_path).unwrap_or_else(|e| {
            error(e.to_string());
            std::process::exit(3);
        });
        write_vm_file(stem, None, &lines).unwrap_or_else(|e| {
            error(format!("failed to write output file: {}", e));
            std::process::exit(4);
        });
    }
}
