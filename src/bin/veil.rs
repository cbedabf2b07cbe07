use anyhow::Result;
use clap::Parser;

use veil::cli::args::CliArgs;
use veil::cli::driver;

fn main() -> Result<()> {
    // Installs a subscriber only when VEIL_LOG or RUST_LOG is set.
    veil::tracing_config::init_tracing();

    let args = CliArgs::parse();
    driver::run(&args)
}
