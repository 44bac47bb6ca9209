//! Post-processing passes over generated output
//!
//! Three independent passes run after generation: reformatting with a fixed
//! style configuration, best-effort documentation injection for declarations
//! the generator missed, and a lint pass with deterministic auto-fixes.
//! The barrel writer produces the generated crate's `lib.rs`.

pub mod barrel;
pub mod docs;
pub mod format;
pub mod lint;

pub use barrel::write_barrel;
pub use docs::{DocInjector, DocReport};
pub use format::{FormatPass, FormatReport, StyleConfig};
pub use lint::{LintPass, LintReport};

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Collect every `.rs` file under a directory, sorted for determinism
pub(crate) fn rust_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect(&path, files)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
            files.push(path);
        }
    }
    Ok(())
}
