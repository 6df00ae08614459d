//! fxpack - release packaging for desktop Java applications.
//!
//! Runs the requested packaging targets and exits with 0 only if every
//! task succeeded.

use std::process;

#[tokio::main]
async fn main() {
    let args = fxpack::cli::Args::parse_args();

    // Initialize logging; RUST_LOG takes precedence over the flags
    let default_filter = match (args.verbose, args.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "warn",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    // Run CLI and get exit code
    let exit_code = match fxpack::cli::run_with(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for suggestion in e.recovery_suggestions() {
                eprintln!("  • {}", suggestion);
            }
            1
        }
    };

    process::exit(exit_code);
}
