use predicates::prelude::*;
use serde::Deserialize;
use serial_test::serial;
use test_support::{cmd_bin, with_env, StubResponse, StubServer};

const ENV_VARS: [&str; 12] = [
  "GITHUB_TOKEN",
  "GITHUB_API_URL",
  "PROVISIONING_API_KEY",
  "EMAIL_API_KEY",
  "GITHUB_API_BASE",
  "PROVISIONING_URL",
  "EMAIL_API_URL",
  "KEY_NAME",
  "KEY_LABEL",
  "KEY_LIMIT",
  "EMAIL_FROM",
  "HTTP_TIMEOUT_SECS",
];

const ISSUED_KEY: &str = "sk-or-v1-issued";

#[derive(Debug, Deserialize)]
struct Summary {
  status: String,
  pr_number: u64,
  repo: String,
  email: Option<String>,
  email_sent: Option<bool>,
  comment_url: Option<String>,
}

fn pr_payload(body: &str) -> String {
  serde_json::json!({
    "number": 12,
    "body": body,
    "base": { "repo": { "full_name": "block/goose" } }
  })
  .to_string()
}

fn marked_body() -> String {
  // alice@example.com
  "## New recipe\n\n<!--EMAIL:YWxpY2VAZXhhbXBsZS5jb20=-->\n".to_string()
}

/// `send-key` pointed at `server` for every backend; inherited config is cleared.
fn send_key(server: &StubServer) -> assert_cmd::Command {
  let mut cmd = cmd_bin("repo-chores");
  for var in ENV_VARS {
    cmd.env_remove(var);
  }
  cmd.env("RUST_LOG", "info");
  cmd.arg("send-key").args([
    "--github-token",
    "gh-token",
    "--pr-url",
    &server.url("/repos/block/goose/pulls/12"),
    "--provisioning-api-key",
    "prov-key",
    "--email-api-key",
    "sg-key",
    "--github-api-base",
    &server.base_url(),
    "--provisioning-url",
    &server.url("/api/v1/keys/"),
    "--email-api-url",
    &server.url("/v3/mail/send"),
    "--http-timeout-secs",
    "10",
  ]);
  cmd
}

fn summary(stdout: &[u8]) -> Summary {
  serde_json::from_slice(stdout).unwrap()
}

#[test]
fn pr_without_marker_is_a_successful_no_op() {
  let server = StubServer::start(vec![StubResponse::json(200, &pr_payload("Adds a recipe."))]);

  let out = send_key(&server).output().unwrap();
  let requests = server.finish();

  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  let s = summary(&out.stdout);
  assert_eq!(s.status, "no_marker");
  assert_eq!(s.pr_number, 12);
  assert_eq!(s.repo, "block/goose");
  assert_eq!(requests.len(), 1, "only the PR fetch may happen");
}

#[test]
fn issues_key_emails_and_comments() {
  let server = StubServer::start(vec![
    StubResponse::json(200, &pr_payload(&marked_body())),
    StubResponse::json(201, &format!(r#"{{"key":"{}","data":{{"name":"Goose Contributor"}}}}"#, ISSUED_KEY)),
    StubResponse::text(202, ""),
    StubResponse::json(201, r#"{"html_url":"https://github.com/block/goose/pull/12#issuecomment-1"}"#),
  ]);

  let out = send_key(&server).output().unwrap();
  let requests = server.finish();

  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  let stdout = String::from_utf8_lossy(&out.stdout);
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(!stdout.contains(ISSUED_KEY), "issued key leaked to stdout");
  assert!(!stderr.contains(ISSUED_KEY), "issued key leaked to logs");

  let s = summary(&out.stdout);
  assert_eq!(s.status, "issued");
  assert_eq!(s.email.as_deref(), Some("alice@example.com"));
  assert_eq!(s.email_sent, Some(true));
  assert_eq!(
    s.comment_url.as_deref(),
    Some("https://github.com/block/goose/pull/12#issuecomment-1")
  );

  assert_eq!(requests.len(), 4);

  assert_eq!(requests[0].method, "GET");
  assert_eq!(requests[0].path, "/repos/block/goose/pulls/12");
  assert_eq!(requests[0].header("authorization"), Some("Bearer gh-token"));

  assert_eq!(requests[1].method, "POST");
  assert_eq!(requests[1].path, "/api/v1/keys/");
  assert_eq!(requests[1].header("authorization"), Some("Bearer prov-key"));
  let key_req = requests[1].json();
  assert_eq!(key_req["name"], "Goose Contributor");
  assert_eq!(key_req["label"], "goose-cookbook");
  assert_eq!(key_req["limit"], 10.0);

  assert_eq!(requests[2].path, "/v3/mail/send");
  assert_eq!(requests[2].header("authorization"), Some("Bearer sg-key"));
  let mail = requests[2].json();
  assert_eq!(mail["personalizations"][0]["to"][0]["email"], "alice@example.com");
  assert_eq!(mail["from"]["email"], "onboarding@goosecredits.xyz");
  assert!(mail["content"][0]["value"].as_str().unwrap().contains(ISSUED_KEY));

  assert_eq!(requests[3].method, "POST");
  assert_eq!(requests[3].path, "/repos/block/goose/issues/12/comments");
  let comment = requests[3].json();
  let text = comment["body"].as_str().unwrap();
  assert!(text.contains("$10"));
  assert!(text.contains("`alice@example.com`"));
  assert!(!text.contains(ISSUED_KEY));
}

#[test]
fn email_failure_still_comments() {
  let server = StubServer::start(vec![
    StubResponse::json(200, &pr_payload(&marked_body())),
    StubResponse::json(200, &format!(r#"{{"key":"{}"}}"#, ISSUED_KEY)),
    StubResponse::json(401, r#"{"errors":[{"message":"bad key"}]}"#),
    StubResponse::json(201, "{}"),
  ]);

  let out = send_key(&server).output().unwrap();
  let requests = server.finish();

  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  let s = summary(&out.stdout);
  assert_eq!(s.status, "issued");
  assert_eq!(s.email_sent, Some(false));
  assert_eq!(s.comment_url, None);
  assert_eq!(requests.len(), 4);
  assert_eq!(requests[3].path, "/repos/block/goose/issues/12/comments");
}

#[test]
fn provisioning_failure_aborts_before_email() {
  let server = StubServer::start(vec![
    StubResponse::json(200, &pr_payload(&marked_body())),
    StubResponse::json(402, r#"{"error":"insufficient credits"}"#),
  ]);

  let out = send_key(&server).output().unwrap();
  let requests = server.finish();

  assert!(!out.status.success());
  assert!(String::from_utf8_lossy(&out.stderr).contains("provisioning API key"));
  assert_eq!(requests.len(), 2);
}

#[test]
fn pr_fetch_failure_is_fatal() {
  let server = StubServer::start(vec![StubResponse::json(404, r#"{"message":"Not Found"}"#)]);

  send_key(&server)
    .assert()
    .failure()
    .stderr(predicate::str::contains("fetching pull request"));

  assert_eq!(server.finish().len(), 1);
}

#[test]
fn invalid_marker_is_fatal() {
  let server = StubServer::start(vec![StubResponse::json(200, &pr_payload("<!--EMAIL:YWJjZA=-->"))]);

  send_key(&server)
    .assert()
    .failure()
    .stderr(predicate::str::contains("not valid base64"));

  assert_eq!(server.finish().len(), 1);
}

#[test]
fn missing_credentials_fail_before_any_request() {
  let server = StubServer::start(vec![]);

  let mut cmd = cmd_bin("repo-chores");
  for var in ENV_VARS {
    cmd.env_remove(var);
  }
  cmd
    .args(["send-key", "--pr-url", &server.url("/repos/block/goose/pulls/12")])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--github-token"));

  assert!(server.finish().is_empty());
}

#[test]
#[serial]
fn configuration_from_environment() {
  let server = StubServer::start(vec![
    StubResponse::json(200, &pr_payload(&marked_body())),
    StubResponse::json(200, &format!(r#"{{"key":"{}"}}"#, ISSUED_KEY)),
    StubResponse::text(202, ""),
    StubResponse::json(201, "{}"),
  ]);

  let pr_url = server.url("/repos/block/goose/pulls/12");
  let base = server.base_url();
  let keys = server.url("/api/v1/keys/");
  let mail = server.url("/v3/mail/send");
  let _env = with_env(&[
    ("GITHUB_TOKEN", "env-gh"),
    ("GITHUB_API_URL", pr_url.as_str()),
    ("PROVISIONING_API_KEY", "env-prov"),
    ("EMAIL_API_KEY", "env-sg"),
    ("GITHUB_API_BASE", base.as_str()),
    ("PROVISIONING_URL", keys.as_str()),
    ("EMAIL_API_URL", mail.as_str()),
    ("KEY_LIMIT", "7.5"),
    ("EMAIL_FROM", "cookbook@example.org"),
  ]);

  let out = cmd_bin("repo-chores").arg("send-key").output().unwrap();
  let requests = server.finish();

  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  assert_eq!(requests.len(), 4);
  assert_eq!(requests[0].header("authorization"), Some("Bearer env-gh"));
  assert_eq!(requests[1].json()["limit"], 7.5);
  assert_eq!(requests[2].json()["from"]["email"], "cookbook@example.org");
  assert!(requests[3].json()["body"].as_str().unwrap().contains("$7.50"));
}
