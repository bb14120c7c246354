// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Blocking JSON-over-HTTP helpers shared by the GitHub, provisioning, and email backends
// role: transport/http
// inputs: ureq Agent, URL, bearer token, extra headers, JSON body
// outputs: Parsed JSON values or raw responses
// side_effects: Network calls
// invariants:
// - Transport errors and HTTP status >= 400 are errors (no retries)
// - Every request carries a User-Agent and a bearer Authorization header
// errors: Propagated with method + URL context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use anyhow::{Context, Result};
use ureq::http::Response;
use ureq::{Agent, Body};

pub const USER_AGENT: &str = concat!("repo-chores/", env!("CARGO_PKG_VERSION"));

/// Build the agent all backends share. `None` keeps ureq's default of no global timeout.
pub fn build_agent(timeout: Option<Duration>) -> Agent {
  Agent::config_builder().timeout_global(timeout).build().into()
}

pub fn get_json(agent: &Agent, url: &str, token: &str, accept: &str) -> Result<serde_json::Value> {
  let mut resp = agent
    .get(url)
    .header("Accept", accept)
    .header("User-Agent", USER_AGENT)
    .header("Authorization", &format!("Bearer {}", token))
    .call()
    .with_context(|| format!("GET {}", url))?;

  resp
    .body_mut()
    .read_json::<serde_json::Value>()
    .with_context(|| format!("decoding JSON from GET {}", url))
}

/// POST a JSON body; the response is returned unread so callers pick how to consume it.
pub fn post_json(
  agent: &Agent,
  url: &str,
  token: &str,
  headers: &[(&str, &str)],
  body: &serde_json::Value,
) -> Result<Response<Body>> {
  let mut req = agent
    .post(url)
    .header("User-Agent", USER_AGENT)
    .header("Authorization", &format!("Bearer {}", token));

  for (name, value) in headers {
    req = req.header(*name, *value);
  }

  req.send_json(body).with_context(|| format!("POST {}", url))
}

/// Read a response body as JSON.
pub fn read_json(resp: &mut Response<Body>, url: &str) -> Result<serde_json::Value> {
  resp
    .body_mut()
    .read_json::<serde_json::Value>()
    .with_context(|| format!("decoding JSON from POST {}", url))
}
