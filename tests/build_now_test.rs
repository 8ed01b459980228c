use std::fs;
use std::path::Path;

use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn wakama_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("wakama-now");
    cmd.current_dir(home)
        .env("WAKAMA_HOME", home.join(".wakama"))
        .env("WAKAMA_CONFIG_PATH", home.join("absent.toml"))
        .env_remove("WAKAMA_RECEIPTS_DIR")
        .env_remove("WAKAMA_SNAPSHOT_PATH")
        .env_remove("WAKAMA_WARN_SKIPPED");
    cmd
}

fn read_json(path: &Path) -> Value {
    let raw = fs::read_to_string(path).expect("read snapshot");
    serde_json::from_str(&raw).expect("parse snapshot")
}

fn write_mixed_receipts(dir: &Path) {
    fs::create_dir_all(dir).expect("mkdir receipts");
    fs::write(
        dir.join("2024-01-01.json"),
        r#"{"cid":"bafyA","ts":"2024-01-01T00:00:00Z","team":"Wakama Core","count":12}"#,
    )
    .expect("write a");
    fs::write(
        dir.join("2024-03-01.json"),
        r#"{"IpfsHash":"bafyA","tx":"5sig","status":"unknown","ts":"2024-03-01T00:00:00Z","team_id":"team_wakama"}"#,
    )
    .expect("write b");
    fs::write(
        dir.join("scak-korhogo-1000-zone-A-Prod-1.json"),
        r#"{"cid":"bafyB","ts":"2024-02-01T00:00:00Z","slot":"n/a","source":" iot "}"#,
    )
    .expect("write c");
    fs::write(dir.join("broken.json"), "{\"cid\": ").expect("write broken");
    fs::write(dir.join("no-cid.json"), r#"{"tx":"orphan"}"#).expect("write no cid");
    fs::write(dir.join("README.md"), "not a receipt").expect("write readme");
}

#[test]
fn build_reconciles_flat_receipts_into_sorted_snapshot() {
    let tmp = tempdir().expect("tempdir");
    let receipts = tmp.path().join("receipts");
    let out = tmp.path().join("dash/public/now.json");
    write_mixed_receipts(&receipts);

    wakama_cmd(tmp.path())
        .arg("build")
        .arg(&receipts)
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote snapshot:"))
        .stdout(predicate::str::contains("discovery=flat"))
        .stdout(predicate::str::contains("receipts.skipped=2"));

    let snap = read_json(&out);
    assert_eq!(snap["totals"]["files"], 3);
    assert_eq!(snap["totals"]["cids"], 2);
    assert_eq!(snap["totals"]["onchainTx"], 1);
    assert_eq!(snap["totals"]["lastTs"], "2024-03-01T00:00:00Z");

    let items = snap["items"].as_array().expect("items");
    let order = items
        .iter()
        .map(|it| it["ts"].as_str().unwrap_or_default())
        .collect::<Vec<_>>();
    assert_eq!(
        order,
        vec![
            "2024-03-01T00:00:00Z",
            "2024-02-01T00:00:00Z",
            "2024-01-01T00:00:00Z"
        ]
    );

    assert_eq!(items[0]["cid"], "bafyA");
    assert_eq!(items[0]["status"], "submitted");
    assert_eq!(items[0]["team"], "Wakama_team");

    assert_eq!(items[1]["team"], "team_scak");
    assert_eq!(items[1]["count"], 1000);
    assert_eq!(items[1]["points"], 1000);
    assert_eq!(items[1]["slot"], Value::Null);
    assert_eq!(items[1]["source"], "iot");
    assert_eq!(items[1]["status"], "n/a");

    assert_eq!(items[2]["team"], "Wakama_team");
    assert_eq!(items[2]["count"], 12);
    assert_eq!(items[2]["file"], "2024-01-01.json");
}

#[test]
fn build_is_byte_identical_across_runs() {
    let tmp = tempdir().expect("tempdir");
    let receipts = tmp.path().join("receipts");
    let out = tmp.path().join("now.json");
    write_mixed_receipts(&receipts);

    wakama_cmd(tmp.path())
        .args(["build", "receipts", "now.json"])
        .assert()
        .success();
    let first = fs::read(&out).expect("read first");

    wakama_cmd(tmp.path())
        .args(["build", "receipts", "now.json"])
        .assert()
        .success();
    let second = fs::read(&out).expect("read second");

    assert_eq!(first, second);
}

#[test]
fn build_scans_project_tree_when_root_has_no_flat_receipts() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path().join("workspace");
    let proj_a = root.join("farm-a/receipts");
    let proj_b = root.join("farm-b/receipts");
    fs::create_dir_all(&proj_a).expect("mkdir a");
    fs::create_dir_all(&proj_b).expect("mkdir b");
    fs::write(
        proj_a.join("batch-250-receipt.json"),
        r#"{"cid":"c-a","ts":"2024-05-02"}"#,
    )
    .expect("write a");
    fs::write(
        proj_b.join("batch-receipt.json"),
        r#"{"cid":"c-b","ts":"2024-05-03","tx":"sig"}"#,
    )
    .expect("write b");
    fs::write(proj_b.join("draft.json"), r#"{"cid":"ignored"}"#).expect("write draft");

    let out = tmp.path().join("now.json");
    wakama_cmd(tmp.path())
        .arg("build")
        .arg(&root)
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("discovery=scan"));

    let snap = read_json(&out);
    assert_eq!(snap["totals"]["files"], 2);
    assert_eq!(snap["items"][0]["cid"], "c-b");
    assert_eq!(snap["items"][1]["cid"], "c-a");
    assert_eq!(snap["items"][1]["count"], 250);
}

#[test]
fn missing_receipts_dir_writes_empty_snapshot() {
    let tmp = tempdir().expect("tempdir");
    let out = tmp.path().join("now.json");

    wakama_cmd(tmp.path())
        .arg("build")
        .arg(tmp.path().join("nowhere"))
        .arg(&out)
        .assert()
        .success();

    let snap = read_json(&out);
    assert_eq!(snap["totals"]["files"], 0);
    assert_eq!(snap["totals"]["cids"], 0);
    assert_eq!(snap["totals"]["lastTs"], "—");
    assert_eq!(snap["items"], Value::Array(Vec::new()));
}

#[test]
fn unwritable_output_is_fatal() {
    let tmp = tempdir().expect("tempdir");
    let receipts = tmp.path().join("receipts");
    write_mixed_receipts(&receipts);
    let blocker = tmp.path().join("blocker");
    fs::write(&blocker, "file, not dir").expect("write blocker");

    wakama_cmd(tmp.path())
        .arg("build")
        .arg(&receipts)
        .arg(blocker.join("now.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: failed to write snapshot"));
}

#[test]
fn failed_build_keeps_previous_snapshot() {
    let tmp = tempdir().expect("tempdir");
    let out = tmp.path().join("now.json");
    fs::write(&out, "previous").expect("write previous");
    fs::create_dir_all(tmp.path().join("receipts")).expect("mkdir");

    wakama_cmd(tmp.path())
        .args(["build", "receipts"])
        .arg(out.join("nested.json"))
        .assert()
        .failure();

    assert_eq!(fs::read_to_string(&out).expect("read"), "previous");
}

#[test]
fn defaults_come_from_config_file() {
    let tmp = tempdir().expect("tempdir");
    write_mixed_receipts(&tmp.path().join("inbox"));
    let config = tmp.path().join("wakama.toml");
    fs::write(
        &config,
        "[paths]\nreceipts_dir = \"inbox\"\nsnapshot_path = \"site/now.json\"\n",
    )
    .expect("write config");

    wakama_cmd(tmp.path())
        .env("WAKAMA_CONFIG_PATH", &config)
        .arg("build")
        .assert()
        .success();

    let snap = read_json(&tmp.path().join("site/now.json"));
    assert_eq!(snap["totals"]["files"], 3);
}

#[test]
fn env_overrides_config_file() {
    let tmp = tempdir().expect("tempdir");
    write_mixed_receipts(&tmp.path().join("env-receipts"));
    let config = tmp.path().join("wakama.toml");
    fs::write(&config, "[paths]\nreceipts_dir = \"inbox\"\n").expect("write config");

    wakama_cmd(tmp.path())
        .env("WAKAMA_CONFIG_PATH", &config)
        .env("WAKAMA_RECEIPTS_DIR", "env-receipts")
        .env("WAKAMA_SNAPSHOT_PATH", "env-now.json")
        .arg("build")
        .assert()
        .success();

    let snap = read_json(&tmp.path().join("env-now.json"));
    assert_eq!(snap["totals"]["files"], 3);
}

#[test]
fn skipped_receipts_are_warned_only_on_request() {
    let tmp = tempdir().expect("tempdir");
    write_mixed_receipts(&tmp.path().join("receipts"));

    wakama_cmd(tmp.path())
        .args(["build", "receipts", "now.json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("WAKAMA_WARN").not());

    wakama_cmd(tmp.path())
        .env("WAKAMA_WARN_SKIPPED", "true")
        .args(["build", "receipts", "now.json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("code=W_RECEIPT_SKIPPED"))
        .stderr(predicate::str::contains("reason=invalid_json"))
        .stderr(predicate::str::contains("reason=missing_cid"));
}

#[test]
fn json_flag_prints_report() {
    let tmp = tempdir().expect("tempdir");
    write_mixed_receipts(&tmp.path().join("receipts"));

    let assert = wakama_cmd(tmp.path())
        .args(["--json", "build", "receipts", "now.json"])
        .assert()
        .success();
    let report: Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("report json");
    assert_eq!(report["command"], "build");
    assert_eq!(report["ok"], true);
}

#[test]
fn export_resolves_relative_output_against_cwd() {
    let tmp = tempdir().expect("tempdir");
    write_mixed_receipts(&tmp.path().join("receipts"));

    let expected = tmp.path().join("exports/now.json");
    wakama_cmd(tmp.path())
        .args(["export", "exports/now.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote snapshot:"))
        .stdout(predicate::str::contains("exports/now.json"));

    assert_eq!(read_json(&expected)["totals"]["files"], 3);
}

#[test]
fn export_requires_output_argument() {
    let tmp = tempdir().expect("tempdir");
    wakama_cmd(tmp.path()).arg("export").assert().failure();
}
