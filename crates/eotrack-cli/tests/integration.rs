#![allow(deprecated)]
use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn eotrack(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("eotrack").unwrap();
    cmd.current_dir(dir.path())
        .env("EOTRACK_ROOT", dir.path())
        .env_remove("CL_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn data_path(dir: &TempDir) -> PathBuf {
    dir.path().join("src/data.json")
}

fn write_data(dir: &TempDir, json: &str) {
    let path = data_path(dir);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, json).unwrap();
}

fn read_data(dir: &TempDir) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(data_path(dir)).unwrap()).unwrap()
}

fn point_at(dir: &TempDir, server: &mockito::Server) {
    let yaml = format!(
        "registry:\n  base_url: {url}\ncourt_listener:\n  base_url: {url}\n",
        url = server.url()
    );
    std::fs::write(dir.path().join("eotrack.yaml"), yaml).unwrap();
}

const CHALLENGED: &str = r#"[
  {
    "id": "14148",
    "title": "Initial Rescissions Of Harmful Executive Orders And Actions",
    "date": "2025-01-28",
    "url": "https://www.federalregister.gov/d/2025-01901",
    "status": "blocked",
    "challenges": [
      {
        "title": "Doe v. Trump",
        "url": "https://www.courtlistener.com/docket/111/doe-v-trump/",
        "docketId": "111"
      },
      {
        "title": "Roe v. Trump",
        "url": "https://www.courtlistener.com/docket/222/roe-v-trump/",
        "docketId": "222"
      }
    ]
  },
  {
    "id": "9999",
    "title": "Retained Proclamation",
    "date": "2025-01-10",
    "url": "https://www.federalregister.gov/d/2025-00001",
    "status": "enacted",
    "challenges": []
  }
]
"#;

// ---------------------------------------------------------------------------
// eotrack sync
// ---------------------------------------------------------------------------

#[test]
fn sync_merges_and_preserves_curated_fields() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    point_at(&dir, &server);
    write_data(&dir, CHALLENGED);

    let registry = server
        .mock("GET", "/documents.json")
        .match_query(Matcher::UrlEncoded("conditions[type][]".into(), "PRESDOCU".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"count": 2, "results": [
                {"presidential_document_number": "14151", "title": "Ending Radical And Wasteful Government DEI Programs", "publication_date": "2025-01-29", "html_url": "https://www.federalregister.gov/d/2025-01953"},
                {"presidential_document_number": "14148", "title": "Initial Rescissions Of Harmful Executive Orders", "publication_date": "2025-01-28", "html_url": "https://www.federalregister.gov/d/2025-01901"}
            ]}"#,
        )
        .create();

    eotrack(&dir)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 new, 1 retained"))
        .stdout(predicate::str::contains("+ 14151"));
    registry.assert();

    let data = read_data(&dir);
    let ids: Vec<&str> = data
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["14151", "14148", "9999"]);

    assert_eq!(data[0]["status"], "enacted");
    assert_eq!(data[0]["challenges"], serde_json::json!([]));
    assert_eq!(data[1]["title"], "Initial Rescissions Of Harmful Executive Orders");
    assert_eq!(data[1]["status"], "blocked");
    assert_eq!(data[1]["challenges"][1]["docketId"], "222");
}

#[test]
fn sync_registry_failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    point_at(&dir, &server);
    write_data(&dir, CHALLENGED);

    server
        .mock("GET", "/documents.json")
        .match_query(Matcher::Any)
        .with_status(500)
        .create();

    eotrack(&dir)
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP 500"));
    assert_eq!(std::fs::read_to_string(data_path(&dir)).unwrap(), CHALLENGED);
}

#[test]
fn sync_json_reports_counts() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    point_at(&dir, &server);

    server
        .mock("GET", "/documents.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"results": [{"presidential_document_number": "14151", "title": "T", "publication_date": "2025-01-29", "html_url": "u"}]}"#,
        )
        .create();

    let output = eotrack(&dir).args(["sync", "--json"]).output().unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["fetched"], 1);
    assert_eq!(report["added"], serde_json::json!(["14151"]));
    assert_eq!(report["total"], 1);
    assert_eq!(report["written"], true);
    assert!(data_path(&dir).exists());
}

// ---------------------------------------------------------------------------
// eotrack refresh
// ---------------------------------------------------------------------------

#[test]
fn refresh_without_api_key_fails_before_network() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    point_at(&dir, &server);
    write_data(&dir, CHALLENGED);

    let untouched = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create();

    eotrack(&dir)
        .arg("refresh")
        .assert()
        .failure()
        .stderr(predicate::str::contains("CL_API_KEY"));
    untouched.assert();
    assert_eq!(std::fs::read_to_string(data_path(&dir)).unwrap(), CHALLENGED);
}

#[test]
fn refresh_isolates_failed_lookups() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    point_at(&dir, &server);
    write_data(&dir, CHALLENGED);

    server
        .mock("GET", "/dockets/111/")
        .with_status(500)
        .create();
    server
        .mock("GET", "/dockets/222/")
        .match_header("authorization", "Token test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 222, "date_last_filing": "2025-02-14"}"#)
        .create();

    eotrack(&dir)
        .arg("refresh")
        .env("CL_API_KEY", "test-key")
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 2 dockets, updated 1"));

    let data = read_data(&dir);
    let challenges = &data[0]["challenges"];
    assert!(challenges[0].get("lastUpdated").is_none());
    assert_eq!(challenges[1]["lastUpdated"], "2025-02-14T00:00:00Z");
}

#[test]
fn refresh_single_docket() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    point_at(&dir, &server);
    write_data(&dir, CHALLENGED);

    let other = server.mock("GET", "/dockets/111/").expect(0).create();
    server
        .mock("GET", "/dockets/222/")
        .with_status(200)
        .with_body(r#"{"date_last_filing": "2025-03-01"}"#)
        .create();

    eotrack(&dir)
        .args(["refresh", "222"])
        .env("CL_API_KEY", "test-key")
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 1 dockets, updated 1"));
    other.assert();

    let data = read_data(&dir);
    assert!(data[0]["challenges"][0].get("lastUpdated").is_none());
    assert_eq!(data[0]["challenges"][1]["lastUpdated"], "2025-03-01T00:00:00Z");
}

#[test]
fn refresh_touches_only_the_refreshed_field() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    point_at(&dir, &server);
    let stored = r#"[
  {
    "challenges": [
      {
        "url": "https://www.courtlistener.com/docket/111/doe-v-trump/",
        "docketId": 111,
        "title": "Doe v. Trump",
        "lastUpdated": null
      }
    ],
    "id": 14148,
    "date": "2025-01-28",
    "title": "Initial Rescissions Of Harmful Executive Orders And Actions",
    "url": "https://www.federalregister.gov/d/2025-01901"
  },
  {
    "url": "https://www.federalregister.gov/d/2025-00001",
    "id": "9999",
    "title": "Retained Proclamation",
    "date": "2025-01-10"
  }
]
"#;
    write_data(&dir, stored);
    server
        .mock("GET", "/dockets/111/")
        .with_status(200)
        .with_body(r#"{"date_last_filing": "2025-03-01"}"#)
        .create();

    eotrack(&dir)
        .args(["refresh", "111"])
        .env("CL_API_KEY", "test-key")
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 1 dockets, updated 1"));

    let expected = stored.replace(
        "\"lastUpdated\": null",
        "\"lastUpdated\": \"2025-03-01T00:00:00Z\"",
    );
    assert_eq!(std::fs::read_to_string(data_path(&dir)).unwrap(), expected);
}

#[test]
fn refresh_unknown_docket_is_not_found() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    point_at(&dir, &server);
    write_data(&dir, CHALLENGED);

    let untouched = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create();

    eotrack(&dir)
        .args(["refresh", "999"])
        .env("CL_API_KEY", "test-key")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no challenge with docket id 999"));
    untouched.assert();
    assert_eq!(std::fs::read_to_string(data_path(&dir)).unwrap(), CHALLENGED);
}

#[test]
fn refresh_matched_but_failed_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    point_at(&dir, &server);
    write_data(&dir, CHALLENGED);

    server
        .mock("GET", "/dockets/111/")
        .with_status(404)
        .create();

    eotrack(&dir)
        .args(["refresh", "111"])
        .env("CL_API_KEY", "test-key")
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 1 dockets, updated 0"))
        .stdout(predicate::str::contains("No updates were needed."));
    assert_eq!(std::fs::read_to_string(data_path(&dir)).unwrap(), CHALLENGED);
}

#[test]
fn refresh_missing_dataset_fails() {
    let dir = TempDir::new().unwrap();
    eotrack(&dir)
        .arg("refresh")
        .env("CL_API_KEY", "test-key")
        .assert()
        .failure()
        .stderr(predicate::str::contains("dataset not found"));
}

// ---------------------------------------------------------------------------
// eotrack backfill
// ---------------------------------------------------------------------------

const UNNUMBERED: &str = "[\r\n  {\r\n    \"id\": \"14151\",\r\n    \"title\": \"T\",\r\n    \"date\": \"2025-01-29\",\r\n    \"url\": \"u\",\r\n    \"status\": \"enacted\",\r\n    \"challenges\": [\r\n      {\r\n        \"title\": \"NADOHE v. Trump\",\r\n        \"url\": \"https://www.courtlistener.com/docket/123456/nadohe-v-trump/\"\r\n      },\r\n      {\r\n        \"title\": \"Press release\",\r\n        \"url\": \"https://example.com/news/1/\"\r\n      }\r\n    ]\r\n  }\r\n]\r\n";

#[test]
fn backfill_derives_docket_ids_and_keeps_crlf() {
    let dir = TempDir::new().unwrap();
    write_data(&dir, UNNUMBERED);

    eotrack(&dir)
        .arg("backfill")
        .assert()
        .success()
        .stdout(predicate::str::contains("Set docket ids on 1 challenges"));

    let raw = std::fs::read_to_string(data_path(&dir)).unwrap();
    assert!(raw.ends_with("]\r\n"));
    assert!(!raw.replace("\r\n", "").contains('\n'));

    let data = read_data(&dir);
    assert_eq!(data[0]["challenges"][0]["docketId"], "123456");
    assert!(data[0]["challenges"][1].get("docketId").is_none());
}

#[test]
fn backfill_second_run_leaves_bytes_alone() {
    let dir = TempDir::new().unwrap();
    write_data(&dir, UNNUMBERED);

    eotrack(&dir).arg("backfill").assert().success();
    let after_first = std::fs::read(data_path(&dir)).unwrap();

    eotrack(&dir)
        .arg("backfill")
        .assert()
        .success()
        .stdout(predicate::str::contains("All docket ids up to date."));
    assert_eq!(std::fs::read(data_path(&dir)).unwrap(), after_first);
}

// ---------------------------------------------------------------------------
// eotrack list / config
// ---------------------------------------------------------------------------

#[test]
fn list_shows_actions() {
    let dir = TempDir::new().unwrap();
    write_data(&dir, CHALLENGED);

    eotrack(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("14148"))
        .stdout(predicate::str::contains("blocked"))
        .stdout(predicate::str::contains("2 actions, 1 with legal challenges"));

    let output = eotrack(&dir).args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());
    let actions: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(actions.as_array().unwrap().len(), 2);
}

#[test]
fn config_validate_reports_errors() {
    let dir = TempDir::new().unwrap();
    eotrack(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));

    std::fs::write(
        dir.path().join("eotrack.yaml"),
        "registry:\n  per_page: 0\n  published_since: soon\n",
    )
    .unwrap();
    eotrack(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] registry.per_page"));
}

#[test]
fn config_show_uses_custom_data_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("eotrack.yaml"), "data_file: public/orders.json\n").unwrap();
    eotrack(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("public/orders.json"))
        .stdout(predicate::str::contains("donald-trump"));
}
