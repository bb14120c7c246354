// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: One-off migration of ToolError call sites to rmcp ErrorData/ErrorCode
// role: convert/namespace
// outputs: rules (text rewrites), imports (use statement cleanup), runner (tree walk + formatter)
// invariants: Text substitution only; no grammar model of the target source
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod imports;
pub mod rules;
pub mod runner;

pub use runner::run;
