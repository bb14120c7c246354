// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate contributor key issuance: PR body -> email marker -> key -> email -> PR comment
// role: processing/orchestrator
// inputs: SendKeyConfig; GithubApi, KeyProvisioner, Mailer backends
// outputs: SendKeyOutcome (no_marker | issued)
// side_effects: Creates a key upstream, sends an email, posts a PR comment
// invariants:
// - No marker => no provisioning, email, or comment call
// - Email delivery failure is logged and recorded; the comment is still posted
// - PR fetch, provisioning, and comment failures abort with the error
// errors: Propagated to main except email delivery
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::SendKeyConfig;
use crate::http;
use crate::marker;
use crate::model::{KeyRequest, SendKeyOutcome};
use crate::services::github_api::{GithubApi, GithubHttpApi};
use crate::services::mailer::{EmailMessage, Mailer, SendGridMailer};
use crate::services::provisioning::{KeyProvisioner, OpenRouterProvisioner};
use crate::util::format_dollars;

/// Backends for one run; borrowed so tests can inject fakes.
pub struct Services<'a> {
  pub github: &'a dyn GithubApi,
  pub provisioner: &'a dyn KeyProvisioner,
  pub mailer: &'a dyn Mailer,
}

/// What the flow needs beyond the backends.
pub struct IssueParams<'a> {
  pub pr_url: &'a str,
  pub key_request: &'a KeyRequest,
  pub email_from: &'a str,
}

pub fn confirmation_comment(email: &str, limit: f64) -> String {
  format!(
    "✅ {} OpenRouter API key sent to `{}`. Thanks for your contribution to the Goose Cookbook!",
    format_dollars(limit),
    email
  )
}

pub fn issue_key(params: &IssueParams<'_>, services: &Services<'_>) -> Result<SendKeyOutcome> {
  // Phase 1: PR body
  info!(url = %params.pr_url, "fetching pull request");
  let pr = services
    .github
    .get_pull_request(params.pr_url)
    .context("fetching pull request")?;

  // Phase 2: email marker; absence is a benign no-op
  let Some(email) = marker::extract_email(&pr.body)? else {
    info!(pr = pr.number, repo = %pr.repo_full_name, "no encoded email in PR body; skipping key issuance");
    return Ok(SendKeyOutcome::NoMarker {
      pr_number: pr.number,
      repo: pr.repo_full_name,
    });
  };
  info!(%email, "decoded contributor email");

  // Phase 3: key
  info!(label = %params.key_request.label, limit = params.key_request.limit, "creating API key");
  let key = services
    .provisioner
    .create_key(params.key_request)
    .context("provisioning API key")?;
  info!("API key generated");

  // Phase 4: email (best-effort)
  let message = EmailMessage::contributor_key(params.email_from, &email, &key, params.key_request.limit);
  let email_sent = match services.mailer.send(&message) {
    Ok(status) => {
      info!(status, "email sent");
      true
    }
    Err(e) => {
      warn!(error = %format!("{:#}", e), "failed to send email; continuing to comment");
      false
    }
  };

  // Phase 5: acknowledgment
  info!(pr = pr.number, repo = %pr.repo_full_name, "commenting on pull request");
  let comment = confirmation_comment(&email, params.key_request.limit);
  let comment_url = services
    .github
    .post_issue_comment(&pr.repo_full_name, pr.number, &comment)
    .context("posting confirmation comment")?;
  info!("confirmation comment added");

  Ok(SendKeyOutcome::Issued {
    pr_number: pr.number,
    repo: pr.repo_full_name,
    email,
    email_sent,
    comment_url,
  })
}

/// Wire the HTTP backends from configuration and run the flow.
pub fn execute(cfg: &SendKeyConfig) -> Result<SendKeyOutcome> {
  let agent = http::build_agent(cfg.http_timeout);

  let github = GithubHttpApi::new(agent.clone(), cfg.github_token.clone(), &cfg.github_api_base);
  let provisioner = OpenRouterProvisioner::new(agent.clone(), cfg.provisioning_api_key.clone(), &cfg.provisioning_url);
  let mailer = SendGridMailer::new(agent, cfg.email_api_key.clone(), &cfg.email_api_url);

  let services = Services {
    github: &github,
    provisioner: &provisioner,
    mailer: &mailer,
  };
  let params = IssueParams {
    pr_url: &cfg.pr_url,
    key_request: &cfg.key_request,
    email_from: &cfg.email_from,
  };

  issue_key(&params, &services)
}
