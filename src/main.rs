mod cli;
mod error;
mod export;
mod flatten;
mod interactive;
mod models;
mod source;
mod state;
mod tree;
mod utils;

use clap::Parser;
use error::Result;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Initialize logger
    env_logger::init();

    cli::handle_args(args)
}
