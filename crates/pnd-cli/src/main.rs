use clap::Parser;
use pnd_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // Usage errors exit here, before any work starts.
    let cli = Cli::parse();

    if let Err(err) = logging::init_logging(cli.debug) {
        eprintln!("pnd: {:#}", err);
    }

    if let Err(err) = cli.run().await {
        eprintln!("pnd error: {:#}", err);
        std::process::exit(1);
    }
}
