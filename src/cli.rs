use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};

use crate::model::{KeyRequest, Secret};
use crate::services::github_api::DEFAULT_API_BASE;
use crate::services::mailer::{DEFAULT_EMAIL_API_URL, DEFAULT_FROM};
use crate::services::provisioning::DEFAULT_PROVISIONING_URL;

#[derive(Parser, Debug)]
#[command(
    name = "repo-chores",
    version,
    about = "Repository automation: contributor key issuance and the ToolError migration",
    long_about = None
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Option<Commands>,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Issue a spend-limited API key to the email encoded in a PR body, then comment on the PR
  SendKey(SendKeyArgs),
  /// Rewrite ToolError call sites to ErrorData/ErrorCode and run the formatter
  ConvertToolErrors(ConvertArgs),
}

#[derive(Args, Debug)]
pub struct SendKeyArgs {
  /// Bearer token for the GitHub API
  #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
  pub github_token: String,

  /// API URL of the pull request resource
  #[arg(long, env = "GITHUB_API_URL")]
  pub pr_url: String,

  /// Bearer token for the key provisioning service
  #[arg(long, env = "PROVISIONING_API_KEY", hide_env_values = true)]
  pub provisioning_api_key: String,

  /// Bearer token for the email service
  #[arg(long, env = "EMAIL_API_KEY", hide_env_values = true)]
  pub email_api_key: String,

  /// GitHub API base used to build the comment URL
  #[arg(long, env = "GITHUB_API_BASE", default_value = DEFAULT_API_BASE)]
  pub github_api_base: String,

  /// Key creation endpoint
  #[arg(long, env = "PROVISIONING_URL", default_value = DEFAULT_PROVISIONING_URL)]
  pub provisioning_url: String,

  /// Mail send endpoint
  #[arg(long, env = "EMAIL_API_URL", default_value = DEFAULT_EMAIL_API_URL)]
  pub email_api_url: String,

  /// Name recorded on the issued key
  #[arg(long, env = "KEY_NAME", default_value = "Goose Contributor")]
  pub key_name: String,

  /// Label recorded on the issued key
  #[arg(long, env = "KEY_LABEL", default_value = "goose-cookbook")]
  pub key_label: String,

  /// Spend limit of the issued key, in US dollars
  #[arg(long, env = "KEY_LIMIT", default_value_t = 10.0)]
  pub key_limit: f64,

  /// Sender, as `Name <address>` or a bare address
  #[arg(long, env = "EMAIL_FROM", default_value = DEFAULT_FROM)]
  pub email_from: String,

  /// Global timeout per HTTP call (unset = no timeout)
  #[arg(long, env = "HTTP_TIMEOUT_SECS")]
  pub http_timeout_secs: Option<u64>,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
  /// Directory scanned for .rs files
  #[arg(long, default_value = "crates")]
  pub root: PathBuf,

  /// Report what would change; write nothing and skip the formatter
  #[arg(long)]
  pub dry_run: bool,

  /// Do not run the formatter after rewriting
  #[arg(long)]
  pub skip_format: bool,

  /// Formatter command line, split on whitespace
  #[arg(long, default_value = "cargo fmt")]
  pub formatter: String,
}

pub struct SendKeyConfig {
  pub github_token: Secret,
  pub pr_url: String,
  pub github_api_base: String,
  pub provisioning_api_key: Secret,
  pub provisioning_url: String,
  pub email_api_key: Secret,
  pub email_api_url: String,
  pub key_request: KeyRequest,
  pub email_from: String,
  pub http_timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
  pub root: PathBuf,
  pub dry_run: bool,
  /// `None` when formatting is skipped.
  pub formatter: Option<Vec<String>>,
}

fn require_secret(value: String, name: &str) -> Result<Secret> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    bail!("{} is empty", name);
  }
  Ok(Secret::new(trimmed))
}

pub fn normalize_send_key(args: SendKeyArgs) -> Result<SendKeyConfig> {
  if !args.key_limit.is_finite() || args.key_limit <= 0.0 {
    bail!("--key-limit must be a positive amount, got {}", args.key_limit);
  }

  let pr_url = args.pr_url.trim().to_string();
  if pr_url.is_empty() {
    bail!("GITHUB_API_URL (pull request URL) is empty");
  }

  Ok(SendKeyConfig {
    github_token: require_secret(args.github_token, "GITHUB_TOKEN")?,
    pr_url,
    github_api_base: args.github_api_base.trim_end_matches('/').to_string(),
    provisioning_api_key: require_secret(args.provisioning_api_key, "PROVISIONING_API_KEY")?,
    provisioning_url: args.provisioning_url,
    email_api_key: require_secret(args.email_api_key, "EMAIL_API_KEY")?,
    email_api_url: args.email_api_url,
    key_request: KeyRequest {
      name: args.key_name,
      label: args.key_label,
      limit: args.key_limit,
    },
    email_from: args.email_from,
    http_timeout: args.http_timeout_secs.map(Duration::from_secs),
  })
}

pub fn normalize_convert(args: ConvertArgs) -> Result<ConvertConfig> {
  let formatter = if args.dry_run || args.skip_format {
    None
  } else {
    let parts: Vec<String> = args.formatter.split_whitespace().map(str::to_string).collect();
    if parts.is_empty() {
      bail!("--formatter is empty; use --skip-format to disable formatting");
    }
    Some(parts)
  };

  Ok(ConvertConfig {
    root: args.root,
    dry_run: args.dry_run,
    formatter,
  })
}
