use anyhow::Result;
use clap::Parser;
use termprof::cli::{self, Cli, LogLevelArg};

fn main() -> Result<()> {
    // Parse first so --help and usage errors print before any logging
    let cli = Cli::parse();

    // CLI --log-level takes precedence, then RUST_LOG, then warn
    termprof::debug::init_logging(cli.log_level.map(LogLevelArg::to_level_filter));

    log::info!("Starting termprof {}", termprof::VERSION);

    cli::run(cli)
}
