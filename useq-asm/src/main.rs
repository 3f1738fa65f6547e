use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use useq_asm::{assemble, hex, report};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    // spec.md §6: exactly one positional argument; any other count
    // prints usage and exits 0 (non-fatal misuse, not an error).
    if args.len() != 2 {
        let program = args.first().map(String::as_str).unwrap_or("useq-as");
        println!("Usage: {} input.s", program);
        return ExitCode::SUCCESS;
    }

    match run(&args[1]) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(input: &str) -> Result<(), String> {
    let input_path = PathBuf::from(input);
    let source = std::fs::read_to_string(&input_path)
        .map_err(|err| format!("reading \"{}\" failed: {}", input_path.display(), err))?;

    let assembly = assemble(&source).map_err(|err| err.to_string())?;

    // spec.md §6: "Output file name is derived as `<input>.hex`" — a
    // literal suffix append, not an extension swap (matches
    // examples/original_source/lib/useq/useq_as.c's `sprintf("%s.hex", ...)`).
    let output_path = PathBuf::from(format!("{}.hex", input));
    let output_file = File::create(&output_path)
        .map_err(|err| format!("writing \"{}\" failed: {}", output_path.display(), err))?;
    let mut hex_writer = BufWriter::new(output_file);
    hex::write_hex(&mut hex_writer, &assembly.rom)
        .map_err(|err| format!("writing \"{}\" failed: {}", output_path.display(), err))?;
    hex_writer
        .flush()
        .map_err(|err| format!("writing \"{}\" failed: {}", output_path.display(), err))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    report::write_report(&mut handle, &assembly.rom, &assembly.symbols, &assembly.source_lines)
        .map_err(|err| err.to_string())?;

    Ok(())
}
