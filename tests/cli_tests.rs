//! CLI 端到端测试：跑真实二进制，校验 stdout 契约

use std::io::Write;
use std::process::{Command, Stdio};

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_abap-scan"))
}

const UNITS_JSON: &str = r#"[
  {
    "pgm_name": "ZORDERS",
    "inc_name": "ZORDERS_F01",
    "type": "PROG",
    "name": "GET_ORDERS",
    "code": "SELECT a b FROM zfoo INTO TABLE lt_foo."
  },
  {
    "pgm_name": "ZORDERS",
    "inc_name": "ZORDERS_F02",
    "type": "PROG",
    "code": "SELECT a b FROM zfoo INTO TABLE lt_foo ORDER BY a."
  }
]"#;

#[test]
fn test_assess_via_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let units_path = dir.path().join("units.json");
    std::fs::write(&units_path, UNITS_JSON).expect("write units json");

    let output = bin()
        .args(["assess", "--file"])
        .arg(&units_path)
        .output()
        .expect("run abap-scan assess");
    assert!(output.status.success(), "assess should exit 0: {output:?}");

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(value.as_array().map(|a| a.len()), Some(2));

    // 第一单元违规，第二单元干净；单元字段原样透传
    assert_eq!(value[0]["pgm_name"], "ZORDERS");
    assert_eq!(value[0]["type"], "PROG");
    assert_eq!(value[0]["name"], "GET_ORDERS");
    let selects = value[0]["selects"].as_array().expect("selects array");
    assert_eq!(selects.len(), 1);
    assert_eq!(selects[0]["target_type"], "SQL_SELECT");
    assert_eq!(selects[0]["target_name"], "NO_FOR_ALL_ENTRIES");
    assert_eq!(selects[0]["table"], "lt_foo");
    assert_eq!(selects[0]["start_char_in_unit"], 0);
    assert_eq!(selects[0]["used_fields"][0], "A");

    assert_eq!(value[1]["selects"].as_array().map(|a| a.len()), Some(0));
}

#[test]
fn test_assess_via_stdin() {
    let mut child = bin()
        .arg("assess")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn abap-scan assess");
    child
        .stdin
        .as_mut()
        .expect("stdin handle")
        .write_all(UNITS_JSON.as_bytes())
        .expect("write units to stdin");

    let output = child.wait_with_output().expect("wait for abap-scan");
    assert!(output.status.success(), "assess should exit 0: {output:?}");

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(value[0]["selects"].as_array().map(|a| a.len()), Some(1));
}

#[test]
fn test_analyze_fixture_json() {
    let output = bin()
        .args(["analyze", "--file", "fixtures/orders_report.abap", "--json"])
        .output()
        .expect("run abap-scan analyze");
    assert!(output.status.success(), "analyze should exit 0: {output:?}");

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    let findings = value["findings"].as_array().expect("findings array");
    // 缺 ORDER BY 的普通 SELECT + SELECT *；FOR ALL ENTRIES 有 SORT，SINGLE 豁免
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0]["target_name"], "NO_FOR_ALL_ENTRIES");
    assert_eq!(findings[1]["used_fields"][0], "*");
}

#[test]
fn test_scan_fixture_dir_json() {
    let output = bin()
        .args(["scan", "--path", "fixtures", "--json"])
        .output()
        .expect("run abap-scan scan");
    assert!(output.status.success(), "scan should exit 0: {output:?}");

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(value["files"], 1);
    assert_eq!(value["findings"], 2);
}

#[test]
fn test_status_json() {
    let output = bin()
        .args(["status", "--json"])
        .output()
        .expect("run abap-scan status");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(value["ok"], true);
    assert_eq!(value["rule"], "ORDER_BY_SORT_RULE");
}
