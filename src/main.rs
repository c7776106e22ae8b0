use autopipe::cli::commands::{CliArgs, Commands};
use autopipe::cli::handlers::handle_generate;
use autopipe::util::logging::{init_from_env, init_logging, parse_level, LoggingConfig};
use autopipe::VERSION;

use clap::Parser;
use std::process;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("autopipe v{} starting", VERSION);

    let exit_code = match &args.command {
        Commands::Generate(generate_args) => handle_generate(generate_args).await,
    };

    process::exit(exit_code);
}

/// Explicit flags override the level; everything else comes from the
/// environment.
fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        init_from_env();
        return;
    };

    init_logging(LoggingConfig {
        level,
        ..LoggingConfig::from_env()
    });
}
