// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Walk the source tree, rewrite files that mention ToolError, then run the formatter once
// role: convert/orchestrator
// inputs: ConvertConfig (root, dry_run, formatter)
// outputs: ConversionReport; rewritten files on disk
// side_effects: Reads and writes .rs files; spawns the formatter
// invariants:
// - Paths with a `target` component below the root are never read or written
// - A file is written only when a rule matched (never in dry-run)
// - The formatter runs at most once, after every file was processed
// errors: Discovery failure is fatal; per-file and formatter failures are logged and recorded
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

use crate::cli::ConvertConfig;
use crate::convert::rules::{self, LEGACY_IDENT};
use crate::model::{ConversionReport, FileFailure, FormatterStatus, LegacySite};
use crate::util;

pub const BUILD_OUTPUT_DIR: &str = "target";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
  BuildOutput,
  NoLegacyIdent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
  Skipped(SkipReason),
  /// Mentions the legacy identifier but no rule matched.
  Unchanged { unconverted: Vec<LegacySite> },
  Updated { unconverted: Vec<LegacySite> },
}

/// Whether `path` sits in a build output directory below `root`; components above `root` are ignored.
pub fn is_build_output(root: &Path, path: &Path) -> bool {
  let below_root = path.strip_prefix(root).unwrap_or(path);
  below_root.components().any(|c| c.as_os_str() == BUILD_OUTPUT_DIR)
}

/// All `*.rs` files under `root`, sorted, excluding build output directories.
pub fn discover_rust_files(root: &Path) -> Result<Vec<PathBuf>> {
  if !root.is_dir() {
    bail!("source root {} is not a directory", root.display());
  }

  let mut files = Vec::new();
  let mut pending = vec![root.to_path_buf()];

  while let Some(dir) = pending.pop() {
    let entries = std::fs::read_dir(&dir).with_context(|| format!("listing {}", dir.display()))?;

    for entry in entries {
      let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
      let path = entry.path();
      let file_type = entry
        .file_type()
        .with_context(|| format!("inspecting {}", path.display()))?;

      if file_type.is_dir() {
        if entry.file_name() != BUILD_OUTPUT_DIR {
          pending.push(path);
        }
      } else if file_type.is_file() && path.extension().is_some_and(|ext| ext == "rs") {
        files.push(path);
      }
    }
  }

  files.sort();
  Ok(files)
}

fn sites_for(path: &Path, content: &str) -> Vec<LegacySite> {
  rules::legacy_sites(content)
    .into_iter()
    .map(|(line, text)| LegacySite {
      file: path.display().to_string(),
      line,
      text,
    })
    .collect()
}

pub fn process_file(root: &Path, path: &Path, dry_run: bool) -> Result<FileOutcome> {
  if is_build_output(root, path) {
    return Ok(FileOutcome::Skipped(SkipReason::BuildOutput));
  }

  let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

  if !content.contains(LEGACY_IDENT) {
    return Ok(FileOutcome::Skipped(SkipReason::NoLegacyIdent));
  }

  let rewrite = rules::convert_tool_errors(&content);
  let unconverted = sites_for(path, &rewrite.content);

  if !rewrite.changed {
    return Ok(FileOutcome::Unchanged { unconverted });
  }

  if !dry_run {
    std::fs::write(path, &rewrite.content).with_context(|| format!("writing {}", path.display()))?;
  }

  Ok(FileOutcome::Updated { unconverted })
}

fn run_formatter(command: &[String]) -> FormatterStatus {
  let shown = command.join(" ");
  let Some((program, args)) = command.split_first() else {
    return FormatterStatus::Skipped;
  };

  info!(command = %shown, "running formatter");
  match util::run_tool(program, args) {
    Ok(_) => {
      info!("formatter completed successfully");
      FormatterStatus::Succeeded { command: shown }
    }
    Err(e) => {
      let error = format!("{:#}", e);
      warn!(command = %shown, %error, "formatter failed");
      FormatterStatus::Failed { command: shown, error }
    }
  }
}

pub fn run(cfg: &ConvertConfig) -> Result<ConversionReport> {
  info!(root = %cfg.root.display(), dry_run = cfg.dry_run, "converting ToolError usages to ErrorData");

  // Phase 1: discovery (fatal)
  let files = discover_rust_files(&cfg.root)?;
  info!(count = files.len(), "found Rust files");

  let mut report = ConversionReport {
    root: util::canonicalize_lossy(&cfg.root),
    dry_run: cfg.dry_run,
    files_scanned: files.len(),
    updated: Vec::new(),
    failures: Vec::new(),
    unconverted: Vec::new(),
    formatter: FormatterStatus::Skipped,
  };

  // Phase 2: per-file rewrite (failures recorded, loop continues)
  for path in &files {
    match process_file(&cfg.root, path, cfg.dry_run) {
      Ok(FileOutcome::Skipped(reason)) => {
        debug!(file = %path.display(), ?reason, "skipped");
      }
      Ok(FileOutcome::Unchanged { unconverted }) => {
        report.unconverted.extend(unconverted);
      }
      Ok(FileOutcome::Updated { unconverted }) => {
        info!(file = %path.display(), "updated");
        report.updated.push(path.display().to_string());
        report.unconverted.extend(unconverted);
      }
      Err(e) => {
        let error = format!("{:#}", e);
        warn!(file = %path.display(), %error, "error processing file");
        report.failures.push(FileFailure {
          file: path.display().to_string(),
          error,
        });
      }
    }
  }

  for site in &report.unconverted {
    warn!(file = %site.file, line = site.line, text = %site.text, "ToolError left for manual conversion");
  }
  info!(count = report.updated.len(), "updated files");

  // Phase 3: formatter, once
  if let Some(command) = &cfg.formatter {
    report.formatter = run_formatter(command);
  }

  Ok(report)
}
