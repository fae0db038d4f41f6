use std::fs;
use std::path::Path;

use assert_cmd::Command;
use chrono::{SecondsFormat, Utc};
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::tempdir;

fn molt(state_dir: &Path, base_url: &str) -> Command {
    let mut cmd = Command::cargo_bin("molt").unwrap();
    cmd.env_clear()
        .env("MOLT_STATE_DIR", state_dir)
        .env("MOLT_API_BASE_URL", base_url)
        .env("MOLT_API_KEY", "test-consumer-key")
        .env("MOLT_API_SECRET", "test-consumer-secret")
        .env("MOLT_ACCESS_TOKEN", "test-access-token")
        .env("MOLT_ACCESS_TOKEN_SECRET", "test-access-secret")
        .env("MOLT_USER_ID", "42");
    cmd
}

fn seed_queue(state_dir: &Path, ids: &[&str]) {
    let json = serde_json::to_string(&ids).unwrap();
    fs::write(state_dir.join("pending.json"), json).unwrap();
}

fn read_queue(state_dir: &Path) -> Vec<String> {
    let raw = fs::read_to_string(state_dir.join("pending.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("molt").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("molt").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_invalid_mode_fails_fast() {
    let dir = tempdir().unwrap();
    molt(dir.path(), "http://127.0.0.1:1")
        .args(["run", "--mode", "destroy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_invalid_mode_env_fails_fast() {
    let dir = tempdir().unwrap();
    molt(dir.path(), "http://127.0.0.1:1")
        .env("MOLT_MODE", "destroy")
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_status_on_fresh_state() {
    let dir = tempdir().unwrap();
    let output = molt(dir.path(), "http://127.0.0.1:1")
        .args(["--robot", "--quiet", "status"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["queued"], json!(0));
    assert_eq!(report["last_run"], Value::Null);
}

#[test]
fn test_retrieve_pages_until_exhausted() {
    let dir = tempdir().unwrap();
    let server = MockServer::start();

    let first_page = server.mock(|when, then| {
        when.method(GET)
            .path("/2/users/42/tweets")
            .query_param("max_results", "100")
            .query_param_missing("pagination_token");
        then.status(200).json_body(json!({
            "data": [{"id": "101"}, {"id": "102"}, {"id": "103"}],
            "meta": {"result_count": 3, "next_token": "page2"}
        }));
    });
    let second_page = server.mock(|when, then| {
        when.method(GET)
            .path("/2/users/42/tweets")
            .query_param("pagination_token", "page2");
        then.status(200).json_body(json!({
            "data": [{"id": "104"}, {"id": "105"}],
            "meta": {"result_count": 2}
        }));
    });

    molt(dir.path(), &server.base_url())
        .arg("retrieve")
        .assert()
        .success();

    first_page.assert_hits(1);
    second_page.assert_hits(1);
    assert_eq!(read_queue(dir.path()), ["101", "102", "103", "104", "105"]);
    assert!(dir.path().join("last_run").exists());
}

#[test]
fn test_retrieve_twice_adds_no_duplicates() {
    let dir = tempdir().unwrap();
    let server = MockServer::start();

    let page = server.mock(|when, then| {
        when.method(GET).path("/2/users/42/tweets");
        then.status(200).json_body(json!({
            "data": [{"id": "201"}, {"id": "202"}],
            "meta": {"result_count": 2}
        }));
    });

    molt(dir.path(), &server.base_url())
        .arg("retrieve")
        .assert()
        .success();
    molt(dir.path(), &server.base_url())
        .arg("retrieve")
        .assert()
        .success();

    page.assert_hits(2);
    assert_eq!(read_queue(dir.path()), ["201", "202"]);
}

#[test]
fn test_delete_drains_a_short_queue() {
    let dir = tempdir().unwrap();
    let server = MockServer::start();
    seed_queue(dir.path(), &["1", "2", "3", "4", "5"]);

    let deletes = server.mock(|when, then| {
        when.method(DELETE).path_includes("/2/tweets/");
        then.status(200).json_body(json!({"data": {"deleted": true}}));
    });

    let output = molt(dir.path(), &server.base_url())
        .args(["--robot", "--quiet", "delete"])
        .output()
        .unwrap();
    assert!(output.status.success());

    deletes.assert_hits(5);
    assert_eq!(read_queue(dir.path()), Vec::<String>::new());
    assert!(dir.path().join("last_run").exists());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["deleted"], json!(5));
    assert_eq!(report["remaining"], json!(0));
}

#[test]
fn test_delete_stops_at_the_daily_budget() {
    let dir = tempdir().unwrap();
    let server = MockServer::start();
    let ids: Vec<String> = (1..=20).map(|n| n.to_string()).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    seed_queue(dir.path(), &id_refs);

    let deletes = server.mock(|when, then| {
        when.method(DELETE).path_includes("/2/tweets/");
        then.status(200).json_body(json!({"data": {"deleted": true}}));
    });

    molt(dir.path(), &server.base_url())
        .arg("delete")
        .assert()
        .success();

    deletes.assert_hits(17);
    assert_eq!(read_queue(dir.path()), ["18", "19", "20"]);
}

#[test]
fn test_delete_with_empty_queue_calls_nothing() {
    let dir = tempdir().unwrap();
    let server = MockServer::start();

    let deletes = server.mock(|when, then| {
        when.method(DELETE).path_includes("/2/tweets/");
        then.status(200).json_body(json!({"data": {"deleted": true}}));
    });

    molt(dir.path(), &server.base_url())
        .arg("delete")
        .assert()
        .success();

    deletes.assert_hits(0);
    assert!(!dir.path().join("last_run").exists());
}

#[test]
fn test_rate_limited_delete_preserves_the_queue() {
    let dir = tempdir().unwrap();
    let server = MockServer::start();
    seed_queue(dir.path(), &["31", "32", "33"]);

    let limited = server.mock(|when, then| {
        when.method(DELETE).path("/2/tweets/31");
        then.status(429)
            .json_body(json!({"title": "Too Many Requests", "detail": "Too Many Requests"}));
    });
    let rest = server.mock(|when, then| {
        when.method(DELETE).path("/2/tweets/32");
        then.status(200).json_body(json!({"data": {"deleted": true}}));
    });

    molt(dir.path(), &server.base_url())
        .arg("delete")
        .assert()
        .failure()
        .stderr(predicate::str::contains("rate limited"));

    limited.assert_hits(1);
    rest.assert_hits(0);
    assert_eq!(read_queue(dir.path()), ["31", "32", "33"]);
}

#[test]
fn test_usage_cap_exits_with_code_2() {
    let dir = tempdir().unwrap();
    let server = MockServer::start();
    seed_queue(dir.path(), &["41"]);

    server.mock(|when, then| {
        when.method(DELETE).path("/2/tweets/41");
        then.status(429).json_body(
            json!({"title": "UsageCapExceeded", "detail": "Usage cap exceeded: Monthly product cap"}),
        );
    });

    molt(dir.path(), &server.base_url())
        .arg("delete")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("monthly usage cap"));

    assert_eq!(read_queue(dir.path()), ["41"]);
}

#[test]
fn test_same_day_marker_exits_with_code_3() {
    let dir = tempdir().unwrap();
    let server = MockServer::start();
    seed_queue(dir.path(), &["51"]);
    let today = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    fs::write(dir.path().join("last_run"), today).unwrap();

    let deletes = server.mock(|when, then| {
        when.method(DELETE).path_includes("/2/tweets/");
        then.status(200).json_body(json!({"data": {"deleted": true}}));
    });

    molt(dir.path(), &server.base_url())
        .arg("delete")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("daily delete budget"));

    deletes.assert_hits(0);
    assert_eq!(read_queue(dir.path()), ["51"]);
}

#[test]
fn test_dry_run_delete_touches_nothing() {
    let dir = tempdir().unwrap();
    let server = MockServer::start();
    seed_queue(dir.path(), &["61", "62"]);

    let deletes = server.mock(|when, then| {
        when.method(DELETE).path_includes("/2/tweets/");
        then.status(200).json_body(json!({"data": {"deleted": true}}));
    });

    molt(dir.path(), &server.base_url())
        .args(["--dry-run", "delete"])
        .assert()
        .success();

    deletes.assert_hits(0);
    assert_eq!(read_queue(dir.path()), ["61", "62"]);
    assert!(!dir.path().join("last_run").exists());
}

#[test]
fn test_dry_run_retrieve_persists_nothing() {
    let dir = tempdir().unwrap();
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/2/users/42/tweets");
        then.status(200).json_body(json!({
            "data": [{"id": "71"}],
            "meta": {"result_count": 1}
        }));
    });

    molt(dir.path(), &server.base_url())
        .args(["--dry-run", "retrieve"])
        .assert()
        .success();

    assert!(!dir.path().join("pending.json").exists());
    assert!(!dir.path().join("last_run").exists());
}

#[test]
fn test_auth_failure_surfaces_from_retrieval() {
    let dir = tempdir().unwrap();
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/2/users/42/tweets");
        then.status(401)
            .json_body(json!({"title": "Unauthorized", "detail": "Unauthorized"}));
    });

    molt(dir.path(), &server.base_url())
        .arg("retrieve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("authentication rejected"));
}

#[test]
fn test_auto_bootstraps_then_init_is_once_only() {
    let dir = tempdir().unwrap();
    let server = MockServer::start();

    let me = server.mock(|when, then| {
        when.method(GET).path("/2/users/me");
        then.status(200)
            .json_body(json!({"data": {"id": "42", "username": "shedder"}}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/2/users/42/tweets");
        then.status(200).json_body(json!({
            "data": [{"id": "81"}, {"id": "82"}],
            "meta": {"result_count": 2}
        }));
    });

    // Fresh state dir: auto picks the bootstrap.
    molt(dir.path(), &server.base_url())
        .arg("run")
        .assert()
        .success();
    me.assert_hits(1);
    assert_eq!(read_queue(dir.path()), ["81", "82"]);
    assert!(dir.path().join("last_run").exists());

    // A marker is now on record, so init without --force is a no-op.
    molt(dir.path(), &server.base_url())
        .arg("init")
        .assert()
        .success();
    me.assert_hits(1);
}

#[test]
fn test_delete_drops_permanently_failed_ids() {
    let dir = tempdir().unwrap();
    let server = MockServer::start();
    seed_queue(dir.path(), &["91", "92"]);

    let gone = server.mock(|when, then| {
        when.method(DELETE).path("/2/tweets/91");
        then.status(404)
            .json_body(json!({"title": "Not Found", "detail": "Post not found"}));
    });
    let ok = server.mock(|when, then| {
        when.method(DELETE).path("/2/tweets/92");
        then.status(200).json_body(json!({"data": {"deleted": true}}));
    });

    let output = molt(dir.path(), &server.base_url())
        .args(["--robot", "--quiet", "delete"])
        .output()
        .unwrap();
    assert!(output.status.success());

    gone.assert_hits(1);
    ok.assert_hits(1);
    assert_eq!(read_queue(dir.path()), Vec::<String>::new());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["deleted"], json!(1));
    assert_eq!(report["failed"], json!(1));
}
