mod demo;
mod menu;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ledger_core::{constants::DEFAULT_GENESIS_DIFFICULTY, hashing, Chain, ChainConfig};
use std::io;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ledger-cli")]
#[command(about = "Menu driven proof-of-work ledger")]
struct Cli {
    /// Difficulty of the genesis block (leading hex zeros)
    #[arg(long, global = true, default_value_t = DEFAULT_GENESIS_DIFFICULTY)]
    genesis_difficulty: u32,

    /// Transaction text stored in the genesis block
    #[arg(long, global = true, default_value = "")]
    genesis_data: String,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive menu on stdin/stdout (default)
    Interactive,
    /// Append, corrupt and repair a small chain, printing each step
    Demo,
    /// Measure SHA-256 digests per second
    Benchmark {
        /// Measurement window in seconds
        #[arg(long, default_value_t = 1)]
        seconds: u64,
    },
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    hashing::ensure_available().context("SHA-256 self test failed")?;

    let cli = Cli::parse();
    let config = ChainConfig::new(cli.genesis_difficulty, cli.genesis_data)
        .context("invalid genesis configuration")?;

    match cli.cmd.unwrap_or(Command::Interactive) {
        Command::Interactive => {
            let chain = Chain::with_genesis(&config)?;
            info!(difficulty = %config.genesis_difficulty, "genesis block mined");
            let stdin = io::stdin();
            menu::Menu::new(chain, stdin.lock(), io::stdout()).run()?;
        }
        Command::Demo => demo::run(&config, &mut io::stdout())?,
        Command::Benchmark { seconds } => {
            let seconds = seconds.max(1);
            let count = hashing::hash_rate(Duration::from_secs(seconds));
            println!("Hashes per second: {}", count / seconds);
        }
    }
    Ok(())
}
