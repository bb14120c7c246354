// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: GitHub REST calls used by key issuance (fetch PR, comment on PR)
// role: services/github-api
// inputs: PR resource URL; bearer token; API base for comment URLs
// outputs: Typed PullRequest; posted comment URL when GitHub returns one
// side_effects: Network calls to the GitHub API
// invariants:
// - Comment URL is <api base>/repos/<full_name>/issues/<number>/comments
// - HTTP failures propagate (no retries, no swallowing)
// errors: Propagated with URL context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use ureq::Agent;

use crate::ext::serde_json::JsonFetch;
use crate::http;
use crate::model::{PullRequest, Secret};

pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

// --- Trait seam for GitHub API ---
pub trait GithubApi {
  fn get_pull_request(&self, pr_url: &str) -> Result<PullRequest>;

  /// Post an issue comment; returns the comment's `html_url` when present.
  fn post_issue_comment(&self, repo_full_name: &str, number: u64, body: &str) -> Result<Option<String>>;
}

pub struct GithubHttpApi {
  agent: Agent,
  token: Secret,
  api_base: String,
}

impl GithubHttpApi {
  pub fn new(agent: Agent, token: Secret, api_base: &str) -> Self {
    Self {
      agent,
      token,
      api_base: api_base.trim_end_matches('/').to_string(),
    }
  }

  pub fn comment_url(&self, repo_full_name: &str, number: u64) -> String {
    issue_comments_url(&self.api_base, repo_full_name, number)
  }
}

pub fn issue_comments_url(api_base: &str, repo_full_name: &str, number: u64) -> String {
  format!(
    "{}/repos/{}/issues/{}/comments",
    api_base.trim_end_matches('/'),
    repo_full_name,
    number
  )
}

impl GithubApi for GithubHttpApi {
  fn get_pull_request(&self, pr_url: &str) -> Result<PullRequest> {
    let v = http::get_json(&self.agent, pr_url, self.token.expose(), GITHUB_ACCEPT)?;
    PullRequest::from_json(&v).with_context(|| format!("reading pull request from {}", pr_url))
  }

  fn post_issue_comment(&self, repo_full_name: &str, number: u64, body: &str) -> Result<Option<String>> {
    let url = self.comment_url(repo_full_name, number);
    let payload = serde_json::json!({ "body": body });

    let mut resp = http::post_json(
      &self.agent,
      &url,
      self.token.expose(),
      &[("Accept", GITHUB_ACCEPT)],
      &payload,
    )?;

    // The comment exists once GitHub accepted it; its URL is informational.
    let html_url = http::read_json(&mut resp, &url)
      .ok()
      .and_then(|v| v.fetch("html_url").to::<String>());

    Ok(html_url)
  }
}
