// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for paths, subprocesses, logging setup, JSON output, and man page rendering
// role: utilities/helpers
// inputs: Paths; program + args; clap CommandFactory; serializable summaries
// outputs: Canonicalized paths, subprocess stdout, stdout JSON, man page text
// side_effects: run_tool spawns subprocesses; init_logging installs the global subscriber
// invariants:
// - run_tool fails on spawn errors and non-zero exits, naming the command and its stderr
// - logs go to stderr so stdout stays machine-readable
// errors: Surfaced with command/path context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use clap::CommandFactory;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

pub fn canonicalize_lossy<P: AsRef<Path>>(p: P) -> String {
  let p = p.as_ref();
  let pb: PathBuf = match std::fs::canonicalize(p) {
    Ok(x) => x,
    Err(_) => match std::env::current_dir() {
      Ok(cwd) => cwd.join(p),
      Err(_) => PathBuf::from(p),
    },
  };
  pb.to_string_lossy().to_string()
}

/// Run `program args...` in the current directory and return its stdout.
pub fn run_tool(program: &str, args: &[String]) -> Result<String> {
  let out = Command::new(program)
    .args(args)
    .output()
    .with_context(|| format!("spawning {} {:?}", program, args))?;

  if out.status.success() {
    Ok(String::from_utf8_lossy(&out.stdout).to_string())
  } else {
    let stderr = String::from_utf8_lossy(&out.stderr);
    anyhow::bail!("{} {:?} failed ({}): {}", program, args, out.status, stderr.trim())
  }
}

/// Install the stderr fmt subscriber, honoring `RUST_LOG` (default `info`).
pub fn init_logging() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

/// Pretty-print a summary to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
  let s = serde_json::to_string_pretty(value).context("serializing summary")?;
  println!("{}", s);
  Ok(())
}

/// `10.0` -> `$10`, `7.5` -> `$7.50`.
pub fn format_dollars(amount: f64) -> String {
  if amount.fract() == 0.0 {
    format!("${}", amount as i64)
  } else {
    format!("${:.2}", amount)
  }
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
