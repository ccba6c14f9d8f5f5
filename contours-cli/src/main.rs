//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use contours_cli::CliError;
use env_logger::Env;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    match contours_cli::run() {
        Ok(()) => {}
        // Clap renders help, version and usage errors with its own exit codes.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("building-contours: {err}");
            std::process::exit(1);
        }
    }
}
