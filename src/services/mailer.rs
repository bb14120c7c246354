// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Compose the contributor key email and deliver it through the SendGrid v3 mail API
// role: services/mailer
// inputs: EmailMessage (from/to/subject/html); email API key; endpoint URL
// outputs: HTTP status code of the accepted send
// side_effects: Network call; sends an email
// invariants: `Name <addr>` senders are split into SendGrid's {name, email} form
// errors: Propagated; the caller decides whether delivery failure is fatal
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use ureq::Agent;

use crate::http;
use crate::model::Secret;
use crate::util::format_dollars;

pub const DEFAULT_EMAIL_API_URL: &str = "https://api.sendgrid.com/v3/mail/send";
pub const DEFAULT_FROM: &str = "Goose Team <onboarding@goosecredits.xyz>";
pub const SUBJECT: &str = "🎉 Your Goose Contributor API Key";

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
  pub from: String,
  pub to: String,
  pub subject: String,
  pub html: String,
}

impl EmailMessage {
  /// The key delivery email sent to a contributor.
  pub fn contributor_key(from: &str, to: &str, key: &Secret, limit: f64) -> Self {
    let html = format!(
      "<p>Thanks for contributing to the Goose Recipe Cookbook!</p>\n\
       <p>Here’s your <strong>{} OpenRouter API key</strong>:</p>\n\
       <p><code>{}</code></p>\n\
       <p>Happy vibe-coding!<br>– The Goose Team 🪿</p>\n",
      format_dollars(limit),
      key.expose()
    );

    Self {
      from: from.to_string(),
      to: to.to_string(),
      subject: SUBJECT.to_string(),
      html,
    }
  }
}

/// Split `Name <addr>` into its parts; a bare address has no name.
pub fn parse_address(raw: &str) -> (Option<String>, String) {
  static RE_NAMED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(.*?)\s*<([^<>]+)>\s*$").unwrap());

  match RE_NAMED.captures(raw) {
    Some(c) => {
      let name = c[1].trim().trim_matches('"').to_string();
      let email = c[2].trim().to_string();
      ((!name.is_empty()).then_some(name), email)
    }
    None => (None, raw.trim().to_string()),
  }
}

pub trait Mailer {
  /// Deliver `message`; returns the provider's HTTP status.
  fn send(&self, message: &EmailMessage) -> Result<u16>;
}

pub struct SendGridMailer {
  agent: Agent,
  api_key: Secret,
  url: String,
}

impl SendGridMailer {
  pub fn new(agent: Agent, api_key: Secret, url: &str) -> Self {
    Self {
      agent,
      api_key,
      url: url.to_string(),
    }
  }

  pub fn payload(message: &EmailMessage) -> serde_json::Value {
    let (from_name, from_email) = parse_address(&message.from);
    let (to_name, to_email) = parse_address(&message.to);

    let mut from = serde_json::json!({ "email": from_email });
    if let Some(name) = from_name {
      from["name"] = serde_json::Value::String(name);
    }

    let mut to = serde_json::json!({ "email": to_email });
    if let Some(name) = to_name {
      to["name"] = serde_json::Value::String(name);
    }

    serde_json::json!({
      "personalizations": [{ "to": [to] }],
      "from": from,
      "subject": message.subject,
      "content": [{ "type": "text/html", "value": message.html }]
    })
  }
}

impl Mailer for SendGridMailer {
  fn send(&self, message: &EmailMessage) -> Result<u16> {
    let resp = http::post_json(&self.agent, &self.url, self.api_key.expose(), &[], &Self::payload(message))?;
    Ok(resp.status().as_u16())
  }
}
