use clap::Parser;
use gsq::cli::{self, exit_codes, Cli};
use gsq::query::install_panic_hook;
use tracing_subscriber::EnvFilter;

/// env var holding the log filter, e.g. `GSQ_LOG=debug`
const LOG_ENV_VAR: &str = "GSQ_LOG";

fn main() {
    // handle broken pipe gracefully (e.g., when piping to `head` or `jq` that exits early)
    reset_sigpipe();

    let cli = Cli::parse();
    init_logging(cli.verbose);
    install_panic_hook();

    if let Err(e) = cli::run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(exit_codes::ERROR);
    }
}

/// reset SIGPIPE to default behavior (terminate process) instead of panicking
/// this is the standard Unix behavior for CLI tools
fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

/// log to stderr; `--verbose` wins over `GSQ_LOG`, which defaults to warn
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
