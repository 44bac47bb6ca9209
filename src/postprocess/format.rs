//! Formatting pass
//!
//! Reformats every generated source file with a fixed style configuration
//! and reports how many files changed.

use crate::error::Result;
use std::path::Path;
use tracing::info;

/// Fixed style configuration applied to generated sources
#[derive(Debug, Clone)]
pub struct StyleConfig {
    /// Spaces per tab when expanding
    pub indent_width: usize,
    /// Strip trailing whitespace
    pub trim_trailing: bool,
    /// Collapse runs of blank lines down to one
    pub collapse_blank_lines: bool,
    /// Ensure exactly one final newline
    pub final_newline: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            trim_trailing: true,
            collapse_blank_lines: true,
            final_newline: true,
        }
    }
}

/// Report of a formatting run
#[derive(Debug, Clone, Default)]
pub struct FormatReport {
    pub files_seen: usize,
    pub files_changed: usize,
}

/// Formatting pass over a generated tree
pub struct FormatPass {
    style: StyleConfig,
}

impl FormatPass {
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    /// Reformat every `.rs` file under `dir`
    pub fn run(&self, dir: &Path) -> Result<FormatReport> {
        let mut report = FormatReport::default();
        for path in super::rust_files(dir)? {
            report.files_seen += 1;
            let original = std::fs::read_to_string(&path)?;
            let formatted = self.format(&original);
            if formatted != original {
                std::fs::write(&path, formatted)?;
                report.files_changed += 1;
            }
        }
        info!(
            files_seen = report.files_seen,
            files_changed = report.files_changed,
            "Formatting pass complete"
        );
        Ok(report)
    }

    /// Apply the style configuration to one source text
    pub fn format(&self, source: &str) -> String {
        let mut out = String::with_capacity(source.len());
        let mut previous_blank = false;

        for line in source.replace("\r\n", "\n").split('\n') {
            let mut line = line.replace('\t', &" ".repeat(self.style.indent_width));
            if self.style.trim_trailing {
                line.truncate(line.trim_end().len());
            }

            let blank = line.is_empty();
            if blank && previous_blank && self.style.collapse_blank_lines {
                continue;
            }
            previous_blank = blank;
            out.push_str(&line);
            out.push('\n');
        }

        if self.style.final_newline {
            while out.ends_with("\n\n") {
                out.pop();
            }
            if !out.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }
}

impl Default for FormatPass {
    fn default() -> Self {
        Self::new(StyleConfig::default())
    }
}
