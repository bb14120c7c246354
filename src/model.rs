// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Transient records shared by both commands and the JSON summaries printed on stdout
// role: model/types
// outputs: PullRequest, KeyRequest, Secret, SendKeyOutcome, ConversionReport and friends
// invariants: Secrets never appear in Debug or serialized output; summary field names are stable
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::ext::serde_json::JsonFetch;

/// A credential or issued key. Redacted in `Debug`, never serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
  pub fn new(value: impl Into<String>) -> Self {
    Self(value.into())
  }

  pub fn expose(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for Secret {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Secret(***)")
  }
}

/// The slice of a pull request the key issuance flow reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
  pub number: u64,
  /// Description text; a null or absent body is empty.
  pub body: String,
  /// `owner/name` of the base repository.
  pub repo_full_name: String,
}

impl PullRequest {
  pub fn from_json(v: &serde_json::Value) -> Result<Self> {
    Ok(Self {
      number: v.fetch("number").require::<u64>()?,
      body: v.fetch("body").to_or_default::<String>(),
      repo_full_name: v.fetch("base.repo.full_name").require::<String>()?,
    })
  }
}

/// Body of the key-creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyRequest {
  pub name: String,
  pub label: String,
  /// Spend limit in US dollars.
  pub limit: f64,
}

impl Default for KeyRequest {
  fn default() -> Self {
    Self {
      name: "Goose Contributor".into(),
      label: "goose-cookbook".into(),
      limit: 10.0,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SendKeyOutcome {
  /// The PR body carried no email marker; nothing was provisioned.
  NoMarker { pr_number: u64, repo: String },
  Issued {
    pr_number: u64,
    repo: String,
    email: String,
    email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment_url: Option<String>,
  },
}

/// One line that still mentions the legacy error type after rewriting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegacySite {
  pub file: String,
  /// 1-based.
  pub line: usize,
  pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
  pub file: String,
  pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FormatterStatus {
  Skipped,
  Succeeded { command: String },
  Failed { command: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
  pub root: String,
  pub dry_run: bool,
  pub files_scanned: usize,
  pub updated: Vec<String>,
  pub failures: Vec<FileFailure>,
  pub unconverted: Vec<LegacySite>,
  pub formatter: FormatterStatus,
}
