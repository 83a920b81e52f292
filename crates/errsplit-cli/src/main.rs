use errsplit_core::logging::LogConfig;

mod cli;

fn main() {
    // Verbosity is decided once from the environment and passed down.
    let log = LogConfig::from_env();

    std::process::exit(cli::run_from_args(&log));
}
