pub mod cli;
pub mod codec;
pub mod data;
pub mod export;
pub mod extract;
pub mod io_utils;
pub mod normalize;
pub mod output;
pub mod preview;
pub mod project;
pub mod repair;
pub mod run;
pub mod schema;
pub mod statement;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("table2sql", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run::execute(&args),
        Commands::Repair(args) => repair::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Export(args) => export::execute(&args),
    }
}
