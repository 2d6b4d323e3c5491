use crate::render;
use anyhow::{bail, Context, Result};
use ledger_core::{new_block, Chain, Timestamp};
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::debug;

const OPTIONS: &[&str] = &[
    "0. View basic blockchain status.",
    "1. Add a transaction to the blockchain.",
    "2. Verify the blockchain.",
    "3. View the blockchain.",
    "4. Corrupt the chain.",
    "5. Hide the corruption by recomputing hashes.",
    "6. Exit",
];

/// Line-oriented menu over a chain. Core errors are reported to the user
/// and the loop carries on; only I/O failures on the output end it.
pub struct Menu<R, W> {
    chain: Chain,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(chain: Chain, input: R, output: W) -> Self {
        Self { chain, input, output }
    }

    #[cfg(test)]
    pub fn into_chain(self) -> Chain {
        self.chain
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            for line in OPTIONS {
                writeln!(self.output, "{line}")?;
            }
            let Some(choice) = self.read_line()? else {
                debug!("input closed, leaving menu");
                return Ok(());
            };
            let outcome = match choice.as_str() {
                "0" => self.show_status(),
                "1" => self.add_transaction(),
                "2" => self.verify(),
                "3" => self.view(),
                "4" => self.corrupt(),
                "5" => self.repair(),
                "6" => return Ok(()),
                other => {
                    writeln!(self.output, "Not supported option: {other:?}")?;
                    Ok(())
                }
            };
            if let Err(err) = outcome {
                writeln!(self.output, "Something went wrong: {err:#}")?;
            }
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line).context("reading input")? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt(&mut self, message: &str) -> Result<String> {
        writeln!(self.output, "{message}")?;
        match self.read_line()? {
            Some(line) => Ok(line),
            None => bail!("input ended while waiting for a reply"),
        }
    }

    fn show_status(&mut self) -> Result<()> {
        let latest = self.chain.latest()?;
        let difficulty = latest.difficulty();
        let nonce = latest.nonce_decimal();
        writeln!(self.output, "Current chain size: {}", self.chain.size())?;
        writeln!(
            self.output,
            "Current hashes per second by this machine: {}",
            self.chain.benchmark_hash_rate()
        )?;
        writeln!(self.output, "Difficulty of most recent block: {difficulty}")?;
        writeln!(self.output, "Nonce for most recent block: {nonce}")?;
        writeln!(self.output, "Chain hash: {}", self.chain.tip_hash())?;
        Ok(())
    }

    fn add_transaction(&mut self) -> Result<()> {
        let difficulty = self.prompt("Enter difficulty (0-64)")?;
        let difficulty: i64 = difficulty
            .parse()
            .with_context(|| format!("{difficulty:?} is not a number"))?;
        let data = self.prompt("Enter transaction")?;

        let start = Instant::now();
        let block = new_block(self.chain.size() as u64, Timestamp::now(), data, difficulty)?;
        self.chain.append(block)?;
        writeln!(
            self.output,
            "Total time to add new block was {} milliseconds.",
            start.elapsed().as_millis()
        )?;
        Ok(())
    }

    fn verify(&mut self) -> Result<()> {
        writeln!(self.output, "Verifying entire chain...")?;
        let start = Instant::now();
        let report = self.chain.validate();
        let elapsed = start.elapsed().as_millis();
        writeln!(self.output, "Chain verification: {}", report.is_valid())?;
        for fault in report.faults() {
            writeln!(self.output, "  {fault}")?;
        }
        writeln!(self.output, "Total time required for verification: {elapsed} milliseconds.")?;
        Ok(())
    }

    fn view(&mut self) -> Result<()> {
        let json = render::chain_json(&self.chain)?;
        writeln!(self.output, "{json}")?;
        Ok(())
    }

    fn corrupt(&mut self) -> Result<()> {
        let id = self.prompt("Enter position (0-based) of block to corrupt")?;
        let position: usize = id
            .parse()
            .with_context(|| format!("{id:?} is not a block position"))?;
        let data = self.prompt(&format!("Enter new data for block {position}"))?;
        self.chain.set_block_data(position, data.as_str())?;
        writeln!(self.output, "Block {position} now holds {data}")?;
        Ok(())
    }

    fn repair(&mut self) -> Result<()> {
        let start = Instant::now();
        let remined = self.chain.repair();
        writeln!(self.output, "Chain repaired ({remined} blocks re-mined).")?;
        writeln!(
            self.output,
            "Total time required for repair: {} milliseconds.",
            start.elapsed().as_millis()
        )?;
        Ok(())
    }
}
