use assert_cmd::Command;
use predicates::prelude::*;

fn ledger_cli() -> Command {
    let mut cmd = Command::cargo_bin("ledger-cli").unwrap();
    cmd.env("RUST_LOG", "off");
    cmd
}

#[test]
fn demo_walks_through_corruption_and_repair() {
    ledger_cli()
        .args(["--genesis-difficulty", "1", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chain verification: true"))
        .stdout(predicate::str::contains("Chain verification: false"))
        .stdout(predicate::str::contains("Block 1 now holds Eve pays Bob 1000"));
}

#[test]
fn interactive_menu_reads_stdin() {
    ledger_cli()
        .arg("--genesis-difficulty=1")
        .write_stdin("1\n1\nAlice pays Bob 10\n2\n6\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total time to add new block was"))
        .stdout(predicate::str::contains("Chain verification: true"));
}

#[test]
fn out_of_range_genesis_difficulty_fails() {
    ledger_cli()
        .args(["--genesis-difficulty", "65", "demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid genesis configuration"));
}

#[test]
fn benchmark_prints_rate() {
    ledger_cli()
        .args(["benchmark", "--seconds", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Hashes per second: "));
}
