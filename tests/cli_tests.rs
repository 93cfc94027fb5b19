mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use support::TempStores;

fn airgap() -> Command {
    let mut cmd = Command::cargo_bin("airgap").expect("binary built");
    cmd.env_remove("AIRGAP_DEMO_DATABASE_URL")
        .env_remove("AIRGAP_REAL_DATABASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn whitelist_lists_builtin_connectors() {
    airgap()
        .args(["--color", "never", "whitelist"])
        .assert()
        .success()
        .stdout(predicate::str::contains("binance"))
        .stdout(predicate::str::contains("hyperliquid"));
}

#[test]
fn whitelist_json_is_parseable() {
    let output = airgap().args(["--json", "whitelist"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["type"], "whitelist");
    let connectors = value["payload"]["connectors"].as_array().unwrap();
    assert!(connectors.iter().any(|c| c == "okx"));
    assert!(value["payload"]["testnet_markers"]
        .as_array()
        .unwrap()
        .iter()
        .any(|m| m == "testnet"));
}

#[test]
fn resolve_unknown_wallet_is_demo() {
    let stores = TempStores::new();
    let config = stores.write_config();

    let output = airgap()
        .arg("--json")
        .arg("--config")
        .arg(&config)
        .args(["resolve", "wallet", "w-missing"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["payload"]["mode"], "demo");
    assert_eq!(value["payload"]["classification"]["found_in"], serde_json::Value::Null);
}

#[test]
fn check_reports_both_stores() {
    let stores = TempStores::new();
    let config = stores.write_config();

    airgap()
        .args(["--color", "never", "--config"])
        .arg(&config)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo store reachable"))
        .stdout(predicate::str::contains("real store reachable"));
}

#[test]
fn migrate_creates_both_databases() {
    let stores = TempStores::new();
    let config = stores.write_config();

    airgap()
        .args(["--config"])
        .arg(&config)
        .arg("migrate")
        .assert()
        .success();

    assert!(stores.path().join("demo.db").exists());
    assert!(stores.path().join("real.db").exists());
}

#[test]
fn invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::write_temp_config(
        dir.path(),
        "[database]\ndemo_url = \"same.db\"\nreal_url = \"same.db\"\n",
    );

    airgap()
        .arg("--config")
        .arg(&config)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("different databases"));
}
