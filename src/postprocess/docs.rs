//! Documentation injection pass
//!
//! The generator emits doc comments from operation records directly; this
//! pass is the best-effort safety net for declarations that ended up without
//! one. It searches generated text for recognizable declaration shapes (an
//! async function, a plain function, or a query-options getter named after
//! an operation) and prepends a synthesized doc block unless a doc comment
//! already precedes the match. Text matching only - it does not parse the
//! source - so unusual declaration shapes can be missed.

use crate::error::Result;
use crate::spec::operations::OperationRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Matches `pub [async] fn <name>(`, covering operations and their
/// query-options getters
static DECL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^pub (?:async )?fn ([a-z0-9_]+)\(").expect("Invalid regex pattern"));

/// Report of a doc-injection run
#[derive(Debug, Clone, Default)]
pub struct DocReport {
    pub files_seen: usize,
    pub blocks_injected: usize,
    pub already_documented: usize,
}

/// Injects synthesized doc blocks in front of undocumented declarations
pub struct DocInjector {
    by_fn_name: HashMap<String, OperationRecord>,
}

impl DocInjector {
    pub fn new(records: &[OperationRecord]) -> Self {
        let by_fn_name = records
            .iter()
            .map(|r| (r.fn_name.clone(), r.clone()))
            .collect();
        Self { by_fn_name }
    }

    /// Process every `.rs` file under `dir`
    pub fn run(&self, dir: &Path) -> Result<DocReport> {
        let mut report = DocReport::default();
        for path in super::rust_files(dir)? {
            report.files_seen += 1;
            let original = std::fs::read_to_string(&path)?;
            let updated = self.inject(&original, &mut report);
            if updated != original {
                std::fs::write(&path, updated)?;
            }
        }
        info!(
            files_seen = report.files_seen,
            blocks_injected = report.blocks_injected,
            already_documented = report.already_documented,
            "Doc injection pass complete"
        );
        Ok(report)
    }

    /// Inject doc blocks into one source text
    pub fn inject(&self, source: &str, report: &mut DocReport) -> String {
        let lines: Vec<&str> = source.lines().collect();
        let mut out = Vec::with_capacity(lines.len());

        for (index, line) in lines.iter().enumerate() {
            if let Some(captures) = DECL_REGEX.captures(line) {
                let name = &captures[1];
                let record = self
                    .by_fn_name
                    .get(name)
                    .or_else(|| self.by_fn_name.get(name.trim_end_matches("_options")));
                if let Some(record) = record {
                    if preceded_by_doc(&lines, index) {
                        report.already_documented += 1;
                    } else {
                        for doc_line in synthesize_doc(record) {
                            out.push(doc_line);
                        }
                        report.blocks_injected += 1;
                    }
                }
            }
            out.push((*line).to_string());
        }

        let mut result = out.join("\n");
        if source.ends_with('\n') {
            result.push('\n');
        }
        result
    }
}

fn preceded_by_doc(lines: &[&str], index: usize) -> bool {
    let mut cursor = index;
    while cursor > 0 {
        cursor -= 1;
        let prev = lines[cursor].trim();
        if prev.starts_with("///") {
            return true;
        }
        // Attributes sit between docs and the declaration
        if prev.starts_with("#[") {
            continue;
        }
        return false;
    }
    false
}

fn synthesize_doc(record: &OperationRecord) -> Vec<String> {
    let mut doc = Vec::new();
    match (&record.summary, &record.description) {
        (Some(summary), _) => {
            for line in summary.lines() {
                doc.push(format!("/// {}", line.trim()));
            }
        }
        (None, Some(description)) => {
            for line in description.lines() {
                doc.push(format!("/// {}", line.trim()));
            }
        }
        (None, None) => {
            doc.push(format!("/// `{} {}`", record.method, record.path));
        }
    }
    doc
}
