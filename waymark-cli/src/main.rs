//! Entry point for the `waymark` binary.
#![forbid(unsafe_code)]

use waymark_cli::CliError;

fn main() {
    match waymark_cli::run() {
        Ok(()) => {}
        // Help and version output are not failures.
        Err(CliError::ArgumentParsing(err)) if !err.use_stderr() => err.exit(),
        Err(err) => {
            eprintln!("waymark: {err}");
            std::process::exit(1);
        }
    }
}
