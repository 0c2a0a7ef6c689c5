use jack2hack::config::Options;
use jack2hack::logging::error;
use jack2hack::translator;
use std::{env, fs};

fn main() {
    let options = Options::from_env();
    options.apply();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <input.vm | dir>", args[0]);
        std::process::exit(1);
    }

    let input_path = &args[1];
    let metadata = fs::metadata(input_path).unwrap_or_else(|e| {
        error(format!("cannot read {}: {}", input_path, e));
        std::process::exit(2);
    });

    let (output_path, lines) = if metadata.is_dir() {
        let trimmed = input_path.trim_end_matches('/');
        let name = trimmed.rsplit('/').next().unwrap_or(trimmed);
        let output_path = format!("{}.asm", name);
        let lines = translator::translate_directory(input_path).unwrap_or_else(|e| {
            error(e.to_string());
            std::process::exit(3);
        });
        (output_path, lines)
    } else {
        let Some(output_path) = input_path.strip_suffix(".vm").map(|stem| format!("{}.asm", stem)) else {
            error(format!("input file must end in .vm: {}", input_path));
            std::process::exit(1);
        };
        let lines = translator::translate_file(input_path).unwrap_or_else(|e| {
            error(e.to_string());
            std::process::exit(3);
        });
        (output_path, lines)
    };

    let mut contents = lines.join("\n");
    contents.push('\n');

    fs::write(&output_path, contents).unwrap_or_else(|e| {
        error(format!("failed to write to output file: {}", e));
        std::process::exit(4);
    });
}
