use crate::render;
use anyhow::{Context, Result};
use ledger_core::{new_block, Chain, ChainConfig, Timestamp};
use std::io::Write;

const DEMO_TX: &str = "Alice pays Bob 10";
const FORGED_TX: &str = "Eve pays Bob 1000";

/// Scripted walk through append, verify, corrupt and repair.
pub fn run<W: Write>(config: &ChainConfig, out: &mut W) -> Result<()> {
    let mut chain = Chain::with_genesis(config).context("mining genesis block")?;
    writeln!(out, "Genesis mined, chain hash: {}", chain.tip_hash())?;

    let difficulty = i64::from(config.genesis_difficulty.get());
    let index = chain.size() as u64;
    chain.append(new_block(index, Timestamp::now(), DEMO_TX, difficulty)?)?;
    writeln!(out, "Appended: {}", render::block_json(chain.latest()?)?)?;
    writeln!(out, "Chain size: {}", chain.size())?;
    writeln!(out, "Chain verification: {}", chain.is_valid())?;

    let position = chain.size() - 1;
    chain.set_block_data(position, FORGED_TX)?;
    writeln!(out, "Block {position} now holds {FORGED_TX}")?;
    let report = chain.validate();
    writeln!(out, "Chain verification: {}", report.is_valid())?;
    for fault in report.faults() {
        writeln!(out, "  {fault}")?;
    }

    chain.repair();
    writeln!(out, "Chain repaired")?;
    writeln!(out, "Chain verification: {}", chain.is_valid())?;
    writeln!(out, "Chain hash: {}", chain.tip_hash())?;
    Ok(())
}
