use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn zelocalc() -> Command {
    let mut cmd = Command::cargo_bin("zelocalc").unwrap();
    cmd.env_remove("ZELO__FACTORS__URL").env_remove("ZELO__FACTORS__PATH");
    cmd
}

#[test]
fn list_shows_every_calculator() {
    zelocalc()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("tank_dilution"))
        .stdout(predicate::str::contains("pasteurization"));
}

#[test]
fn list_filters_and_rejects_short_queries() {
    zelocalc()
        .args(["list", "acidity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("acidity_blend"))
        .stdout(predicate::str::contains("net_weight").not());

    zelocalc()
        .args(["list", "a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("at least 2 characters"));
}

#[test]
fn describe_lists_fields_and_defaults() {
    zelocalc()
        .args(["describe", "net_weight"])
        .assert()
        .success()
        .stdout(predicate::str::contains("grossWeight"))
        .stdout(predicate::str::contains("required"))
        .stdout(predicate::str::contains("2.5"));
}

#[test]
fn calc_prints_result_lines() {
    zelocalc()
        .args(["calc", "tank_dilution", "currentBrix=65", "targetBrix=11", "currentVolume=100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("490.91"));
}

#[test]
fn calc_reports_the_offending_field() {
    zelocalc()
        .args(["calc", "net_weight", "grossWeight=abc", "tare=10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("grossWeight"));
}

#[test]
fn calc_rejects_unknown_kind() {
    zelocalc()
        .args(["calc", "flux_capacitor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("flux_capacitor"));
}

#[test]
fn calc_json_uses_factor_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("factors.json");
    fs::write(&file, r#"{ "cristal_to_liquido": 0.9 }"#).unwrap();

    let output = zelocalc()
        .args(["calc", "sugar_conversion", "direction=crystalToLiquid", "quantity=100", "--json"])
        .arg("--factors-file")
        .arg(&file)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["kind"], "sugar_conversion");
    let converted = report["outcome"]["metrics"][0]["value"].as_f64().unwrap();
    assert!((converted - 90.0).abs() < 1e-9);
}

#[test]
fn factors_fall_back_with_a_warning() {
    let dir = tempfile::tempdir().unwrap();

    zelocalc()
        .args(["factors", "--factors-file"])
        .arg(dir.path().join("missing.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Origin: defaults"))
        .stdout(predicate::str::contains("cristal_to_liquido"))
        .stderr(predicate::str::contains("warning"));
}

#[test]
fn explicit_config_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("plant.toml");

    zelocalc()
        .arg("--config")
        .arg(&missing)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"))
        .stderr(predicate::str::contains("plant.toml"));
}

#[test]
fn explicit_config_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let factors = dir.path().join("factors.json");
    fs::write(&factors, r#"{ "cristal_to_liquido": 0.9 }"#).unwrap();
    let config = dir.path().join("plant.toml");
    fs::write(&config, format!("[factors]\npath = {:?}\n", factors.display().to_string()))
        .unwrap();

    zelocalc()
        .arg("--config")
        .arg(&config)
        .arg("factors")
        .assert()
        .success()
        .stdout(predicate::str::contains("Origin: file"));
}
