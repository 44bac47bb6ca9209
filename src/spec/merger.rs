//! Spec Merger
//!
//! Combines N per-group OpenAPI documents into a single document. `paths` and
//! every `components.*` sub-map are the key-wise union; on key collision the
//! later document (in sorted input order) silently wins. The merge reports
//! collisions so operators can detect unintended overwrites, but never
//! changes the resolution policy.

use crate::error::{KubegenError, Result};
use serde_json::{json, Map, Value};
use std::path::Path;
use tracing::{info, warn};

/// What kind of key collided during the merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollisionKind {
    /// A route template under `paths`
    Path,
    /// A key under one of the `components.*` sub-maps
    Component(String),
}

/// One last-write-wins overwrite observed during the merge
#[derive(Debug, Clone)]
pub struct Collision {
    pub kind: CollisionKind,
    /// The colliding key
    pub key: String,
    /// Ident of the document whose definition won
    pub winner: String,
}

/// Summary of a merge run
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    /// Number of input documents
    pub input_count: usize,
    /// Number of path keys in the merged document
    pub path_count: usize,
    /// Observed overwrites
    pub collisions: Vec<Collision>,
}

/// Load all `*.json` documents from a spec directory in sorted filename
/// order. A missing directory or an empty spec set is fatal.
pub fn load_spec_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<(String, Value)>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(KubegenError::merge(format!(
            "Spec directory '{}' does not exist; run a fetch first",
            dir.display()
        )));
    }

    let mut files: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    files.sort();

    let mut docs = Vec::with_capacity(files.len());
    for path in files {
        let ident = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("spec")
            .to_string();
        let content = std::fs::read_to_string(&path)?;
        let value: Value = serde_json::from_str(&content).map_err(|e| {
            KubegenError::merge(format!("Spec file '{}' is not valid JSON: {}", path.display(), e))
        })?;
        docs.push((ident, value));
    }

    if docs.is_empty() {
        return Err(KubegenError::merge(format!(
            "Spec directory '{}' contains no JSON documents",
            dir.display()
        )));
    }

    Ok(docs)
}

/// Merge an ordered set of OpenAPI documents into one.
///
/// The first document contributes `openapi`, `info` and (when present) the
/// `servers` block. `paths` and each `components.*` sub-map are unioned with
/// last-write-wins on collision.
pub fn merge_specs(docs: &[(String, Value)]) -> Result<(Value, MergeReport)> {
    let first = docs
        .first()
        .map(|(_, doc)| doc)
        .ok_or_else(|| KubegenError::merge("Cannot merge an empty spec set"))?;

    let mut merged = Map::new();
    merged.insert(
        "openapi".to_string(),
        first
            .get("openapi")
            .cloned()
            .unwrap_or_else(|| json!("3.0.0")),
    );
    merged.insert(
        "info".to_string(),
        first.get("info").cloned().unwrap_or_else(|| {
            json!({"title": "Kubernetes", "version": "unversioned"})
        }),
    );
    if let Some(servers) = first.get("servers") {
        merged.insert("servers".to_string(), servers.clone());
    }

    let mut paths = Map::new();
    let mut components: Map<String, Value> = Map::new();
    let mut report = MergeReport {
        input_count: docs.len(),
        ..Default::default()
    };

    for (ident, doc) in docs {
        if let Some(Value::Object(doc_paths)) = doc.get("paths") {
            for (key, value) in doc_paths {
                if paths.insert(key.clone(), value.clone()).is_some() {
                    warn!(path = %key, winner = %ident, "Path collision, later document wins");
                    report.collisions.push(Collision {
                        kind: CollisionKind::Path,
                        key: key.clone(),
                        winner: ident.clone(),
                    });
                }
            }
        }

        if let Some(Value::Object(doc_components)) = doc.get("components") {
            for (section, section_value) in doc_components {
                let Value::Object(section_map) = section_value else {
                    continue;
                };
                let target = components
                    .entry(section.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                let Value::Object(target_map) = target else {
                    continue;
                };
                for (key, value) in section_map {
                    if target_map.insert(key.clone(), value.clone()).is_some() {
                        warn!(
                            section = %section,
                            key = %key,
                            winner = %ident,
                            "Component collision, later document wins"
                        );
                        report.collisions.push(Collision {
                            kind: CollisionKind::Component(section.clone()),
                            key: key.clone(),
                            winner: ident.clone(),
                        });
                    }
                }
            }
        }
    }

    report.path_count = paths.len();
    merged.insert("paths".to_string(), Value::Object(paths));
    if !components.is_empty() {
        merged.insert("components".to_string(), Value::Object(components));
    }

    info!(
        inputs = report.input_count,
        paths = report.path_count,
        collisions = report.collisions.len(),
        "Merged OpenAPI documents"
    );

    Ok((Value::Object(merged), report))
}
