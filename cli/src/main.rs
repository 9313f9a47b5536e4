//! cohort: operator CLI for the proposal & whitelist allocation engine.
//!
//! Each invocation loads the ledger snapshot, runs one engine call as
//! `--caller` at logical time `--now`, and saves the snapshot again if the
//! call changed anything.

mod commands;
mod ledger;

use anyhow::Context;
use clap::Parser;
use cohort_engine::{Engine, EngineConfig};
use cohort_types::{Address, LogicalTime};
use commands::{Command, Invocation};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cohort", about = "Proposal & whitelist allocation engine")]
struct Cli {
    /// Path to the TOML engine configuration.
    #[arg(long, env = "COHORT_CONFIG")]
    config: PathBuf,

    /// Ledger snapshot file; created on the first write.
    #[arg(long, default_value = "./cohort.ledger", env = "COHORT_STATE")]
    state: PathBuf,

    /// Address the call is made as (defaults to the configured admin).
    #[arg(long, env = "COHORT_CALLER")]
    caller: Option<String>,

    /// Logical time of the call.
    #[arg(long, default_value_t = 0, env = "COHORT_NOW")]
    now: u64,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = EngineConfig::from_toml_file(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    cohort_utils::init_logging(config.log_format, &config.log_level)
        .context("initialising logging")?;

    let invocation = Invocation {
        caller: cli
            .caller
            .map(Address::new)
            .unwrap_or_else(|| config.admin.clone()),
        now: LogicalTime::new(cli.now),
    };

    let store = ledger::load(&cli.state)?;
    let engine = Engine::new(store, config)?;

    let mutating = cli.command.is_mutating();
    let output = cli.command.execute(&engine, &invocation)?;
    if mutating {
        ledger::save(&cli.state, engine.store())?;
    }
    println!("{output}");
    Ok(())
}
