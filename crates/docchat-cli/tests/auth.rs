//! Integration tests for `docchat login`, `logout` and `whoami`.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test(flavor = "multi_thread")]
async fn test_login_stores_user_and_logout_clears_it() {
    let dir = tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({"email": "ada@example.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "user_id": 7,
            "email": "ada@example.com"
        })))
        .mount(&server)
        .await;

    cargo_bin_cmd!("docchat")
        .env("DOCCHAT_HOME", dir.path())
        .args(["--server", &server.uri()])
        .args(["login", "--email", "ada@example.com", "--password", "pw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as ada@example.com"));

    let stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("user.json")).unwrap()).unwrap();
    assert_eq!(stored["user_id"], 7);
    assert_eq!(stored["email"], "ada@example.com");

    cargo_bin_cmd!("docchat")
        .env("DOCCHAT_HOME", dir.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("ada@example.com (user 7)"));

    cargo_bin_cmd!("docchat")
        .env("DOCCHAT_HOME", dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));

    assert!(!dir.path().join("user.json").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_rejected_by_server() {
    let dir = tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "error": "Invalid email or password"
        })))
        .mount(&server)
        .await;

    cargo_bin_cmd!("docchat")
        .env("DOCCHAT_HOME", dir.path())
        .env("DOCCHAT_SERVER_URL", server.uri())
        .args(["login", "--email", "ada@example.com", "--password", "bad"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid email or password"));

    assert!(!dir.path().join("user.json").exists());
}

#[test]
fn test_chat_requires_login() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("docchat")
        .env("DOCCHAT_HOME", dir.path())
        .arg("chat")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_whoami_without_login() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("docchat")
        .env("DOCCHAT_HOME", dir.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}
