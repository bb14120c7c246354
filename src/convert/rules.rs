// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Ordered regex rules rewriting ToolError signatures and constructors to ErrorData
// role: convert/rules
// inputs: Rust source text
// outputs: Rewritten text plus whether any rule matched; surviving legacy sites
// invariants:
// - Order is signatures -> simple constructors -> format! constructors -> imports
// - Text without the legacy identifier is returned unchanged
// - Converting already-converted text is a no-op
// limitations: Regex heuristics only; nested or multi-line constructor arguments are left for a human
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use once_cell::sync::Lazy;
use regex::Regex;

use crate::convert::imports;

pub const LEGACY_IDENT: &str = "ToolError";

/// Legacy variant -> `ErrorCode` constant.
pub const VARIANT_CODES: [(&str, &str); 4] = [
  ("ExecutionError", "INTERNAL_ERROR"),
  ("InvalidParameters", "INVALID_PARAMS"),
  ("NotFound", "INVALID_REQUEST"),
  ("SchemaError", "INVALID_PARAMS"),
];

pub struct Rule {
  pattern: Regex,
  replacement: String,
}

impl Rule {
  fn new(pattern: &str, replacement: impl Into<String>) -> Self {
    Self {
      pattern: Regex::new(pattern).unwrap(),
      replacement: replacement.into(),
    }
  }

  /// Apply to `content`; `None` when nothing changed.
  pub fn apply(&self, content: &str) -> Option<String> {
    let replaced = self.pattern.replace_all(content, self.replacement.as_str());
    (replaced != content).then(|| replaced.into_owned())
  }
}

static SIGNATURE_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
  vec![
    Rule::new(r"Result<([^,<>]+(?:<[^<>]*>)?[^,<>]*),\s*ToolError>", "Result<${1}, ErrorData>"),
    Rule::new(r"-> Result<Vec<Content>, ToolError>", "-> Result<Vec<Content>, ErrorData>"),
    Rule::new(r"-> Result<([^,<>]+(?:<[^<>]*>)?[^,<>]*), ToolError>", "-> Result<${1}, ErrorData>"),
  ]
});

static CONSTRUCTOR_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
  VARIANT_CODES
    .iter()
    .map(|(variant, code)| {
      Rule::new(
        &format!(r"ToolError::{}\(([^()]+)\)", variant),
        format!("ErrorData::new(ErrorCode::{}, ${{1}}, None)", code),
      )
    })
    .collect()
});

static FORMAT_CONSTRUCTOR_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
  VARIANT_CODES
    .iter()
    .map(|(variant, code)| {
      Rule::new(
        &format!(r"ToolError::{}\(format!\(([^)]+)\)\)", variant),
        format!("ErrorData::new(ErrorCode::{}, format!(${{1}}), None)", code),
      )
    })
    .collect()
});

static RE_LEGACY_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bToolError\b").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
  pub content: String,
  pub changed: bool,
}

fn apply_group(content: &mut String, rules: &[Rule]) -> bool {
  let mut changed = false;

  for rule in rules {
    if let Some(next) = rule.apply(content.as_str()) {
      *content = next;
      changed = true;
    }
  }

  changed
}

/// Run every rule group in order; imports are added only when something matched.
pub fn convert_tool_errors(source: &str) -> Rewrite {
  let mut content = source.to_string();
  let mut changed = false;

  changed |= apply_group(&mut content, &SIGNATURE_RULES);
  changed |= apply_group(&mut content, &CONSTRUCTOR_RULES);
  changed |= apply_group(&mut content, &FORMAT_CONSTRUCTOR_RULES);
  changed |= imports::strip_legacy_imports(&mut content);

  if changed {
    content = imports::add_imports_if_needed(content);
  }

  Rewrite { content, changed }
}

/// 1-based line numbers and trimmed text of every remaining `ToolError` mention.
pub fn legacy_sites(content: &str) -> Vec<(usize, String)> {
  content
    .lines()
    .enumerate()
    .filter(|(_, line)| RE_LEGACY_WORD.is_match(line))
    .map(|(i, line)| (i + 1, line.trim().to_string()))
    .collect()
}
