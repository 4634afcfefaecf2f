//! Folder Mirror CLI
//!
//! Keeps a replica folder identical to a source folder, re-synchronizing
//! on a fixed interval until interrupted.

mod cli;
mod error;
mod logging;
mod mirror;

use clap::Parser;
use clap::error::ErrorKind;
use colored::Colorize;

use cli::Cli;
use error::Result;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        // Usage mistakes are a no-op: show usage and stop without syncing.
        Err(e) => {
            println!("{}", e.render());
            return;
        }
    };

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.mirror_config()?;
    mirror_core::validate_roots(&cli.source, &cli.replica)?;

    logging::init(&cli.log_file, cli.verbose)?;

    println!("{} {}", "Source Folder:".bold(), cli.source.display());
    println!("{} {}", "Replica Folder:".bold(), cli.replica.display());
    println!("{} {}", "Log File:".bold(), cli.log_file.display());
    println!("{}", "Synchronization started...".green());

    if cli.once {
        mirror::run_once(&cli.source, &cli.replica, &config)
    } else {
        mirror::run_forever(&cli.source, &cli.replica, &config)
    }
}
