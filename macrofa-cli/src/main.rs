mod machine;

use clap::Parser;
use machine::{Machine, MachineType};
use std::path::PathBuf;
use std::process::ExitCode;
use std::fs;

/// Compiles a DFA, one-counter or pushdown automaton description into a set
/// of C preprocessor headers that decide membership at translation time.
///
/// The caller defines INPUT as the encoded word and includes the flavor's
/// top-level header (dfa.h, ctr.h or dpda.h); afterwards RECOGNIZED is
/// defined iff the word is in the language.
#[derive(Debug, Parser)]
#[command(name = "macrofa", version)]
struct MacrofaArgs {
    /// Flavor of the description to compile
    #[arg(short = 't', long = "type", value_enum, default_value = "dfa")]
    r#type: MachineType,
    /// Print the parsed machine before emitting
    #[arg(long)]
    dump: bool,
    /// Suppress progress output
    #[arg(long)]
    no_log: bool,
    /// The description file to compile
    input: PathBuf,
    /// Directory the headers are written to (created if absent)
    output: PathBuf,
}

fn main() -> ExitCode {
    let args = MacrofaArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &MacrofaArgs) -> Result<(), String> {
    #[allow(unused_variables)]
    let log = |s: &str| {
        if !args.no_log {
            println!("{s}")
        }
    };
    macro_rules! log {
        ($($t:tt)*) => (log(&format!($($t)*)))
    }

    let file = fs::read_to_string(&args.input)
        .map_err(|e| format!("Error loading file {}: {e}", args.input.display()))?;
    let machine = Machine::load(&file, args.r#type).map_err(|e| e.to_string())?;

    if args.dump {
        log!("Parsed {}:", args.r#type.describe());
        log!("{}", machine.table());
    }

    let headers = machine.emit();
    macrofa::emit::write_headers(&headers, &args.output).map_err(|e| e.to_string())?;
    log!(
        "Wrote {} headers to {}; define INPUT and include \"{}\"",
        headers.len(),
        args.output.display(),
        machine.entry_header()
    );
    Ok(())
}
