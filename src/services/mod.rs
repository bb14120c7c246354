// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Namespace for the third-party services key issuance talks to
// role: services/namespace
// outputs: One trait seam plus HTTP implementation per service
// invariants: Each service isolates its wire format; orchestration lives in send_key
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod github_api;
pub mod mailer;
pub mod provisioning;
