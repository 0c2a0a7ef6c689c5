use jack2hack::assembler;
use jack2hack::config::Options;
use jack2hack::logging::error;
use std::{env, fs};

fn main() {
    let options = Options::from_env();
    options.apply();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <input.asm>", args[0]);
        std::process::exit(1);
    }

    let input_path = &args[1];
    let Some(output_path) = input_path.strip_suffix(".asm").map(|stem| format!("{}.hack", stem)) else {
        error(format!("input file must end in .asm: {}", input_path));
        std::process::exit(1);
    };

    let lines = assembler::assemble_from_file(input_path).unwrap_or_else(|e| {
        error(e.to_string());
        std::process::exit(2);
    });

    let mut contents = lines.join("\n");
    contents.push('\n');

    fs::write(&output_path, contents).unwrap_or_else(|e| {
        error(format!("failed to write to output file: {}", e));
        std::process::exit(3);
    });
}
