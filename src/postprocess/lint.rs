//! Lint pass with auto-fix
//!
//! Runs a small fixed rule set over generated sources. Fixable findings are
//! corrected in place (duplicate import lines, CRLF endings, whitespace-only
//! lines); anything left unbalanced after fixing is fatal.

use crate::error::{KubegenError, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Report of a lint run
#[derive(Debug, Clone, Default)]
pub struct LintReport {
    pub files_seen: usize,
    pub fixes_applied: usize,
}

/// Lint pass over a generated tree
#[derive(Default)]
pub struct LintPass;

impl LintPass {
    pub fn new() -> Self {
        Self
    }

    /// Lint and auto-fix every `.rs` file under `dir`. Returns an error when
    /// a file still has unbalanced delimiters after fixing.
    pub fn run(&self, dir: &Path) -> Result<LintReport> {
        let mut report = LintReport::default();
        for path in super::rust_files(dir)? {
            report.files_seen += 1;
            let original = std::fs::read_to_string(&path)?;
            let (fixed, fixes) = self.fix(&original);
            report.fixes_applied += fixes;
            if fixed != original {
                std::fs::write(&path, &fixed)?;
            }

            if let Some(finding) = unbalanced_delimiters(&fixed) {
                return Err(KubegenError::post_process(format!(
                    "Unfixable lint error in '{}': {}",
                    path.display(),
                    finding
                )));
            }
        }
        info!(
            files_seen = report.files_seen,
            fixes_applied = report.fixes_applied,
            "Lint pass complete"
        );
        Ok(report)
    }

    /// Apply the fixable rules to one source text
    pub fn fix(&self, source: &str) -> (String, usize) {
        let mut fixes = 0;
        let mut seen_imports: HashSet<String> = HashSet::new();
        let mut out = Vec::new();

        for line in source.replace("\r\n", "\n").split('\n') {
            // Rule: whitespace-only lines become blank
            let line = if !line.is_empty() && line.trim().is_empty() {
                fixes += 1;
                ""
            } else {
                line
            };

            // Rule: duplicate `use` lines are dropped
            if line.trim_start().starts_with("use ") && line.trim_end().ends_with(';') {
                if !seen_imports.insert(line.trim().to_string()) {
                    fixes += 1;
                    continue;
                }
            }

            out.push(line.to_string());
        }

        if source.contains("\r\n") {
            fixes += 1;
        }
        (out.join("\n"), fixes)
    }
}

/// Check for unbalanced braces, brackets and parentheses outside strings
fn unbalanced_delimiters(source: &str) -> Option<String> {
    let mut braces: i64 = 0;
    let mut brackets: i64 = 0;
    let mut parens: i64 = 0;
    let mut in_string = false;
    let mut previous = '\0';

    for c in source.chars() {
        if in_string {
            if c == '"' && previous != '\\' {
                in_string = false;
            }
            previous = c;
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => braces += 1,
            '}' => braces -= 1,
            '[' => brackets += 1,
            ']' => brackets -= 1,
            '(' => parens += 1,
            ')' => parens -= 1,
            _ => {}
        }
        previous = c;
    }

    if braces != 0 {
        Some(format!("unbalanced braces (delta {})", braces))
    } else if brackets != 0 {
        Some(format!("unbalanced brackets (delta {})", brackets))
    } else if parens != 0 {
        Some(format!("unbalanced parentheses (delta {})", parens))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_removes_duplicate_imports() {
        let pass = LintPass::new();
        let source = "use serde_json::Value;\nuse serde_json::Value;\nfn a() {}\n";
        let (fixed, fixes) = pass.fix(source);
        assert_eq!(fixed.matches("use serde_json::Value;").count(), 1);
        assert_eq!(fixes, 1);
    }

    #[test]
    fn test_fix_blanks_whitespace_only_lines() {
        let pass = LintPass::new();
        let (fixed, fixes) = pass.fix("fn a() {}\n   \nfn b() {}\n");
        assert!(fixed.contains("\n\n"));
        assert_eq!(fixes, 1);
    }

    #[test]
    fn test_unbalanced_braces_detected() {
        assert!(unbalanced_delimiters("fn a() {").is_some());
        assert!(unbalanced_delimiters("fn a() {}").is_none());
        // Braces inside string literals do not count
        assert!(unbalanced_delimiters("let s = \"{\";").is_none());
    }

    #[test]
    fn test_run_fails_on_unbalanced_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.rs"), "fn a() {\n").unwrap();
        let err = LintPass::new().run(dir.path()).unwrap_err();
        assert_eq!(err.category(), "post_process");
    }
}
