//! `assetprep`: run-once preparation of SDF font and texture atlas assets.

mod cli;
mod commands;
mod config;
mod logger;

use std::path::Path;
use std::process;

use clap::{CommandFactory, Parser};

use crate::cli::Cli;
use crate::config::{Config, DEFAULT_CONFIG_FILE};

fn main() {
    let cli = Cli::parse();

    if cli.print_config {
        match toml::to_string_pretty(&Config::default()) {
            Ok(s) => print!("{s}"),
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        }
        return;
    }

    let Some(command) = cli.command else {
        Cli::command()
            .error(
                clap::error::ErrorKind::MissingSubcommand,
                "a command is required",
            )
            .exit();
    };

    if let Err(e) = logger::init(logger::level_for(cli.verbose, cli.quiet)) {
        eprintln!("error: {e}");
    }

    let loaded = match &cli.config {
        Some(path) => Config::try_load(path),
        None => Config::load(Path::new(DEFAULT_CONFIG_FILE)),
    };
    let config = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("config: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = commands::run(command, config) {
        log::error!("{e}");
        process::exit(1);
    }
}
