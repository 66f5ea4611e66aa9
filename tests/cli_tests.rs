//! End-to-end tests for the `surebet` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tempfile::TempDir;

use surebet::testkit::domain::{scenario_a, scenario_b};

fn surebet() -> Command {
    cargo_bin_cmd!("surebet")
}

fn template() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("config.toml.example")
}

fn write_bare_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, "[logging]\nlevel = \"warn\"\nformat = \"pretty\"\n").unwrap();
    path
}

fn write_odds(dir: &TempDir, records: &[surebet::domain::RawOddsRecord]) -> PathBuf {
    let path = dir.path().join("odds.json");
    fs::write(&path, serde_json::to_string(records).unwrap()).unwrap();
    path
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("stdout is one JSON document")
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal as string")).unwrap()
}

#[test]
fn help_lists_subcommands() {
    surebet()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("detect"))
        .stdout(predicate::str::contains("normalize"));
}

#[test]
fn unknown_subcommand_fails() {
    surebet().arg("bogus").assert().failure();
}

#[test]
fn normalize_applies_template_aliases() {
    surebet()
        .args(["normalize", "Man Utd", "-c"])
        .arg(template())
        .arg("--quiet")
        .assert()
        .success()
        .stdout("manchester united\n");
}

#[test]
fn normalize_json_pairs_input_and_output() {
    let json = stdout_json(
        surebet()
            .args(["--json", "normalize", "PSG", "Real Madrid C.F."])
            .arg("-c")
            .arg(template()),
    );

    assert_eq!(json["command"], "normalize");
    assert_eq!(json["results"][0]["normalized"], "paris saint germain");
    assert_eq!(json["results"][1]["input"], "Real Madrid C.F.");
}

#[test]
fn config_validate_accepts_template() {
    surebet()
        .args(["config", "validate", "-c"])
        .arg(template())
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn config_validate_reports_bad_threshold() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(
        &path,
        "[logging]\nlevel = \"info\"\nformat = \"pretty\"\n[matching]\nfuzzy_threshold = 150\n",
    )
    .unwrap();

    surebet()
        .args(["config", "validate", "-c"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("fuzzy_threshold"));
}

#[test]
fn config_init_writes_template_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    surebet().args(["config", "init"]).arg(&path).assert().success();
    assert!(fs::read_to_string(&path).unwrap().contains("[matching]"));

    surebet().args(["config", "init"]).arg(&path).assert().failure();
    surebet()
        .args(["config", "init", "--force"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn detect_reports_arbitrage_from_file() {
    let dir = TempDir::new().unwrap();
    let odds = write_odds(&dir, &scenario_a());

    let json = stdout_json(
        surebet()
            .args(["detect", "--json", "--file"])
            .arg(&odds)
            .arg("-c")
            .arg(template()),
    );

    assert_eq!(json["command"], "detect");
    let opportunities = json["opportunities"].as_array().unwrap();
    assert_eq!(opportunities.len(), 1);
    assert_eq!(
        opportunities[0]["event_name"],
        "Manchester United vs Liverpool"
    );
    assert_eq!(decimal(&opportunities[0]["profit_percentage"]), dec!(1.0766));
    assert_eq!(json["diagnostics"]["records_received"], 9);
}

#[test]
fn detect_market_flag_narrows_markets() {
    let dir = TempDir::new().unwrap();
    let odds = write_odds(&dir, &scenario_a());

    let detect = |market: &str| {
        stdout_json(
            surebet()
                .args(["detect", "--json", "--market", market, "--file"])
                .arg(&odds)
                .arg("-c")
                .arg(template()),
        )
    };

    let other = detect("moneyline");
    assert!(other["opportunities"].as_array().unwrap().is_empty());

    let same = detect("1x2,totals");
    assert_eq!(same["opportunities"].as_array().unwrap().len(), 1);
}

#[test]
fn detect_rejects_start_window_beyond_a_week() {
    let dir = TempDir::new().unwrap();
    let odds = write_odds(&dir, &scenario_a());

    surebet()
        .args(["detect", "--max-start-hours", "169", "--file"])
        .arg(&odds)
        .arg("-c")
        .arg(template())
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_start_hours"));
}

#[test]
fn detect_bankroll_override_scales_profit() {
    let dir = TempDir::new().unwrap();
    let odds = write_odds(&dir, &scenario_a());

    let json = stdout_json(
        surebet()
            .args(["detect", "--json", "--bankroll", "100", "--file"])
            .arg(&odds)
            .arg("-c")
            .arg(template()),
    );

    let opportunity = &json["opportunities"][0];
    assert_eq!(decimal(&opportunity["bankroll"]), dec!(100));
    assert_eq!(decimal(&opportunity["guaranteed_profit"]), dec!(1.08));
}

#[test]
fn detect_threshold_controls_fuzzy_merge() {
    let dir = TempDir::new().unwrap();
    let odds = write_odds(&dir, &scenario_b());
    let config = write_bare_config(&dir);

    let strict = stdout_json(
        surebet()
            .args(["detect", "--json", "--threshold", "99", "--file"])
            .arg(&odds)
            .arg("-c")
            .arg(&config),
    );
    assert!(strict["opportunities"].as_array().unwrap().is_empty());

    let loose = stdout_json(
        surebet()
            .args(["detect", "--json", "--threshold", "80", "--file"])
            .arg(&odds)
            .arg("-c")
            .arg(&config),
    );
    assert_eq!(loose["opportunities"].as_array().unwrap().len(), 1);
}

#[test]
fn detect_with_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    surebet()
        .args(["detect", "--file"])
        .arg(dir.path().join("missing.json"))
        .arg("-c")
        .arg(template())
        .assert()
        .failure()
        .stderr(predicate::str::contains("detection failed"));
}

#[test]
fn detect_synthetic_seed_succeeds() {
    let json = stdout_json(
        surebet()
            .args(["detect", "--json", "--seed", "7", "-c"])
            .arg(template()),
    );

    assert!(json["diagnostics"]["records_received"].as_u64().unwrap() > 0);
}

#[test]
fn match_lists_clustered_events() {
    let dir = TempDir::new().unwrap();
    let odds = write_odds(&dir, &scenario_a());

    let json = stdout_json(
        surebet()
            .args(["match", "--json", "--file"])
            .arg(&odds)
            .arg("-c")
            .arg(template()),
    );

    assert_eq!(json["command"], "match");
    let events = json["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["canonical_name"], "Manchester United vs Liverpool");
}

#[test]
fn run_stops_after_requested_cycles() {
    let dir = TempDir::new().unwrap();
    let odds = write_odds(&dir, &scenario_a());

    let json = stdout_json(
        surebet()
            .args(["run", "--json", "--cycles", "1", "--interval", "1", "--file"])
            .arg(&odds)
            .arg("-c")
            .arg(template()),
    );

    assert_eq!(json["command"], "run");
    assert_eq!(json["opportunities"].as_array().unwrap().len(), 1);
}
