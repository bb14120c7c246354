// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Request a spend-limited API key from the provisioning service (OpenRouter keys API)
// role: services/provisioning
// inputs: KeyRequest (name/label/limit); provisioning API key; endpoint URL
// outputs: The issued key as a Secret
// side_effects: Network call; creates a billable key upstream
// invariants: The issued key is never logged; a response without `key` is an error
// errors: Propagated with URL context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::Result;
use ureq::Agent;

use crate::ext::serde_json::JsonFetch;
use crate::http;
use crate::model::{KeyRequest, Secret};

pub const DEFAULT_PROVISIONING_URL: &str = "https://openrouter.ai/api/v1/keys/";

pub trait KeyProvisioner {
  fn create_key(&self, request: &KeyRequest) -> Result<Secret>;
}

pub struct OpenRouterProvisioner {
  agent: Agent,
  api_key: Secret,
  url: String,
}

impl OpenRouterProvisioner {
  pub fn new(agent: Agent, api_key: Secret, url: &str) -> Self {
    Self {
      agent,
      api_key,
      url: url.to_string(),
    }
  }
}

impl KeyProvisioner for OpenRouterProvisioner {
  fn create_key(&self, request: &KeyRequest) -> Result<Secret> {
    let payload = serde_json::to_value(request)?;

    let mut resp = http::post_json(
      &self.agent,
      &self.url,
      self.api_key.expose(),
      &[("Content-Type", "application/json")],
      &payload,
    )?;
    let v = http::read_json(&mut resp, &self.url)?;

    let key = v.fetch("key").require::<String>()?;
    tracing::debug!(name = %request.name, label = %request.label, "provisioned key");

    Ok(Secret::new(key))
  }
}
