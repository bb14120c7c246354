// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Find the `<!--EMAIL:<base64>-->` marker in free-form PR text and decode its payload
// role: parsing/marker
// inputs: PR body text
// outputs: Option<String> email (None when no marker is present)
// invariants: First marker wins; payload alphabet is [A-Za-z0-9+/=]; no marker is not an error
// errors: Invalid base64 or non-UTF-8 payloads are errors
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_EMAIL_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"<!--EMAIL:([A-Za-z0-9+/=]+)-->").unwrap());

/// The raw base64 payload of the first email marker, if any.
pub fn find_email_payload(body: &str) -> Option<&str> {
  RE_EMAIL_MARKER
    .captures(body)
    .and_then(|c| c.get(1))
    .map(|m| m.as_str())
}

pub fn decode_email(payload: &str) -> Result<String> {
  let bytes = STANDARD
    .decode(payload)
    .with_context(|| format!("email marker payload `{}` is not valid base64", payload))?;

  String::from_utf8(bytes).context("email marker payload is not UTF-8")
}

/// Extract and decode the email address embedded in `body`.
pub fn extract_email(body: &str) -> Result<Option<String>> {
  match find_email_payload(body) {
    Some(payload) => decode_email(payload).map(Some),
    None => Ok(None),
  }
}

/// Render the marker for `email`; the inverse of `extract_email`.
#[cfg(test)]
pub fn encode_marker(email: &str) -> String {
  format!("<!--EMAIL:{}-->", STANDARD.encode(email.as_bytes()))
}
