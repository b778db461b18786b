mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli_opts = cli::Cli::parse();
    let _logger = logging::init(&cli_opts.log_level)?;
    cli::run(cli_opts.command)
}
