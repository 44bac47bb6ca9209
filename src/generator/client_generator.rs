//! Client crate generator
//!
//! Turns the merged OpenAPI document plus extracted operation records into a
//! client crate for one target profile: per-tag modules, shared model types,
//! and a crate manifest. Operation documentation is first-class input - doc
//! comments are emitted from the records at generation time.

use crate::error::{KubegenError, Result};
use crate::generator::profile::TargetProfile;
use crate::spec::operations::OperationRecord;
use crate::utils::snake_case;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Matches `{param}` placeholders in a route template
static PATH_PARAM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^}]+)\}").expect("Invalid regex pattern"));

/// Result of one generator run
#[derive(Debug, Clone)]
pub struct GeneratedTree {
    /// Root of the generated crate
    pub root: PathBuf,
    /// The crate's `src` directory
    pub src_dir: PathBuf,
    /// Generated crate name
    pub crate_name: String,
    /// Module names, one per API tag, sorted
    pub modules: Vec<String>,
    /// Every file written
    pub files: Vec<PathBuf>,
}

/// Configuration-driven client generator
pub struct ClientGenerator {
    profile: TargetProfile,
    include_deprecated: bool,
    generate_models: bool,
}

impl ClientGenerator {
    /// Create a generator for the given profile
    pub fn new(profile: TargetProfile) -> Self {
        Self {
            profile,
            include_deprecated: false,
            generate_models: true,
        }
    }

    /// Include deprecated operations
    pub fn include_deprecated(mut self) -> Self {
        self.include_deprecated = true;
        self
    }

    /// Skip model generation
    pub fn without_models(mut self) -> Self {
        self.generate_models = false;
        self
    }

    /// Generate the client crate for this profile.
    ///
    /// Writes one module per tag plus `models.rs` and the crate manifest
    /// under `<output_dir>/<profile>/`. Any failure is fatal to the caller.
    pub fn generate(
        &self,
        merged: &Value,
        records: &[OperationRecord],
        output_dir: &Path,
        package_base: &str,
    ) -> Result<GeneratedTree> {
        let crate_name = self.profile.crate_name(package_base);
        let root = output_dir.join(&self.profile.name);
        let src_dir = root.join("src");
        std::fs::create_dir_all(&src_dir)?;

        let mut by_tag: BTreeMap<String, Vec<&OperationRecord>> = BTreeMap::new();
        for record in records {
            if record.deprecated && !self.include_deprecated {
                continue;
            }
            by_tag.entry(record.tag.clone()).or_default().push(record);
        }
        if by_tag.is_empty() {
            return Err(KubegenError::generate(
                "No operations to generate; the merged document has no usable paths",
            ));
        }

        let mut files = Vec::new();
        let mut modules = Vec::new();
        for (tag, tag_records) in &by_tag {
            let path = src_dir.join(format!("{}.rs", tag));
            std::fs::write(&path, self.render_module(tag, tag_records))?;
            debug!(module = %tag, operations = tag_records.len(), "Generated API module");
            files.push(path);
            modules.push(tag.clone());
        }

        if self.generate_models {
            let models_path = src_dir.join("models.rs");
            std::fs::write(&models_path, render_models(merged)?)?;
            files.push(models_path);
        }

        let manifest_path = root.join("Cargo.toml");
        std::fs::write(&manifest_path, self.render_manifest(&crate_name))?;
        files.push(manifest_path);

        info!(
            profile = %self.profile.name,
            crate_name = %crate_name,
            modules = modules.len(),
            files = files.len(),
            "Generated client crate"
        );

        Ok(GeneratedTree {
            root,
            src_dir,
            crate_name,
            modules,
            files,
        })
    }

    fn render_module(&self, tag: &str, records: &[&OperationRecord]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "//! Generated API module for `{}`", tag);
        out.push_str("// Generated by kubegen. Do not edit by hand.\n\n");
        let _ = writeln!(out, "use {};", self.profile.client_import);
        out.push_str("use kubegen::error::Result;\n");
        out.push_str("use reqwest::Method;\n");
        out.push_str("use serde_json::Value;\n");

        for record in records {
            out.push('\n');
            out.push_str(&self.render_operation(record));
        }
        out
    }

    fn render_operation(&self, record: &OperationRecord) -> String {
        let mut out = String::new();
        render_doc_block(&mut out, record);

        let path_params: Vec<String> = PATH_PARAM_REGEX
            .captures_iter(&record.path)
            .map(|c| snake_case(&c[1]))
            .collect();

        let fn_kw = if self.profile.async_fns {
            "pub async fn"
        } else {
            "pub fn"
        };
        let _ = writeln!(out, "{} {}(", fn_kw, record.fn_name);
        let _ = writeln!(out, "    client: &{},", self.profile.client_type);
        for param in &path_params {
            let _ = writeln!(out, "    {}: &str,", param);
        }
        if record.has_body() {
            out.push_str("    body: &Value,\n");
        }
        out.push_str("    query: &[(String, String)],\n");
        out.push_str(") -> Result<Value> {\n");

        if path_params.is_empty() {
            let _ = writeln!(out, "    let path = \"{}\";", record.path);
        } else {
            let template = PATH_PARAM_REGEX.replace_all(&record.path, "{}");
            let _ = writeln!(
                out,
                "    let path = format!(\"{}\", {});",
                template,
                path_params.join(", ")
            );
        }

        let path_expr = if path_params.is_empty() { "path" } else { "&path" };
        let body_expr = if record.has_body() { "Some(body)" } else { "None" };
        let await_suffix = if self.profile.async_fns { ".await" } else { "" };
        let _ = writeln!(
            out,
            "    client.request(Method::{}, {}, query, {}){}",
            record.method, path_expr, body_expr, await_suffix
        );
        out.push_str("}\n");

        // Query-options getter listing the accepted parameter names
        let query_params: Vec<&str> = record
            .parameters
            .iter()
            .filter(|p| p.location == "query")
            .map(|p| p.name.as_str())
            .collect();
        if !query_params.is_empty() {
            out.push('\n');
            let _ = writeln!(
                out,
                "/// Query parameters accepted by `{}`",
                record.fn_name
            );
            let _ = writeln!(out, "pub fn {}_options() -> &'static [&'static str] {{", record.fn_name);
            let quoted: Vec<String> = query_params.iter().map(|p| format!("\"{}\"", p)).collect();
            let _ = writeln!(out, "    &[{}]", quoted.join(", "));
            out.push_str("}\n");
        }

        out
    }

    fn render_manifest(&self, crate_name: &str) -> String {
        format!(
            "[package]\n\
             name = \"{}\"\n\
             version = \"0.0.0\"\n\
             edition = \"2021\"\n\
             description = \"Generated Kubernetes client ({} profile)\"\n\
             license = \"MIT\"\n\
             \n\
             [dependencies]\n\
             kubegen = {{ version = \"{}\" }}\n\
             reqwest = {{ version = \"0.11\", default-features = false, features = [\"rustls-tls\"] }}\n\
             serde = {{ version = \"1.0\", features = [\"derive\"] }}\n\
             serde_json = \"1.0\"\n",
            crate_name,
            self.profile.name,
            crate::VERSION
        )
    }
}

fn render_doc_block(out: &mut String, record: &OperationRecord) {
    if let Some(ref summary) = record.summary {
        for line in summary.lines() {
            let _ = writeln!(out, "/// {}", line.trim());
        }
    }
    if let Some(ref description) = record.description {
        if record.summary.is_some() {
            out.push_str("///\n");
        }
        for line in description.lines() {
            let _ = writeln!(out, "/// {}", line.trim());
        }
    }
    let documented_params: Vec<_> = record
        .path_params()
        .filter(|p| p.description.is_some())
        .collect();
    if !documented_params.is_empty() {
        if record.summary.is_some() || record.description.is_some() {
            out.push_str("///\n");
        }
        for param in documented_params {
            let _ = writeln!(
                out,
                "/// * `{}` - {}",
                snake_case(&param.name),
                param.description.as_deref().unwrap_or_default().replace('\n', " ")
            );
        }
    }
}

/// Rust keywords that need escaping in generated field names
const KEYWORDS: &[&str] = &[
    "type", "ref", "continue", "enum", "static", "box", "move", "use", "mod", "fn", "impl",
    "struct", "trait", "async", "await", "loop", "match", "if", "else", "for", "while", "in",
    "let", "pub", "return", "where", "unsafe", "dyn", "const", "as", "break", "extern", "true",
    "false",
];

fn field_ident(name: &str) -> String {
    let ident = snake_case(name);
    if KEYWORDS.contains(&ident.as_str()) {
        format!("r#{}", ident)
    } else {
        ident
    }
}

/// Map a dotted schema name to a Rust type name: the last two segments,
/// capitalized (`io.k8s.api.core.v1.Pod` becomes `V1Pod`).
fn schema_type_name(full_name: &str, taken: &BTreeSet<String>) -> String {
    fn capitalize(s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }

    let segments: Vec<&str> = full_name.split('.').collect();
    let short: String = segments
        .iter()
        .rev()
        .take(2)
        .rev()
        .map(|s| capitalize(s))
        .collect();
    if !taken.contains(&short) {
        return short;
    }
    // Collision: fall back to the full camel-cased name
    segments.iter().map(|s| capitalize(s)).collect()
}

fn rust_type(prop: &Value, names: &BTreeMap<String, String>) -> String {
    if let Some(reference) = prop.get("$ref").and_then(Value::as_str) {
        let target = reference.trim_start_matches("#/components/schemas/");
        if let Some(name) = names.get(target) {
            // Boxed to keep recursive schema graphs finite-sized
            return format!("Box<{}>", name);
        }
        return "Value".to_string();
    }
    match prop.get("type").and_then(Value::as_str) {
        Some("string") => "String".to_string(),
        Some("integer") => "i64".to_string(),
        Some("number") => "f64".to_string(),
        Some("boolean") => "bool".to_string(),
        Some("array") => {
            let inner = prop
                .get("items")
                .map(|items| rust_type(items, names))
                .unwrap_or_else(|| "Value".to_string());
            format!("Vec<{}>", inner)
        }
        _ => "Value".to_string(),
    }
}

/// Render shared model types from `components.schemas`
fn render_models(merged: &Value) -> Result<String> {
    let mut out = String::new();
    out.push_str("//! Generated model types\n");
    out.push_str("// Generated by kubegen. Do not edit by hand.\n\n");
    out.push_str("use serde::{Deserialize, Serialize};\n");
    out.push_str("use serde_json::Value;\n");

    let Some(schemas) = merged
        .pointer("/components/schemas")
        .and_then(Value::as_object)
    else {
        return Ok(out);
    };

    // First pass: assign unique Rust names
    let mut taken = BTreeSet::new();
    let mut names: BTreeMap<String, String> = BTreeMap::new();
    for full_name in schemas.keys() {
        let name = schema_type_name(full_name, &taken);
        taken.insert(name.clone());
        names.insert(full_name.clone(), name);
    }

    for (full_name, schema) in schemas {
        let rust_name = &names[full_name];
        out.push('\n');
        if let Some(description) = schema.get("description").and_then(Value::as_str) {
            for line in description.lines() {
                let _ = writeln!(out, "/// {}", line.trim());
            }
        }

        let properties = schema.get("properties").and_then(Value::as_object);
        let Some(properties) = properties else {
            // Non-object schema (enums, int-or-string): keep it dynamic
            let _ = writeln!(out, "pub type {} = Value;", rust_name);
            continue;
        };

        let required: BTreeSet<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        out.push_str("#[derive(Debug, Clone, Serialize, Deserialize)]\n");
        let _ = writeln!(out, "pub struct {} {{", rust_name);
        for (prop_name, prop) in properties {
            let ident = field_ident(prop_name);
            let base_type = rust_type(prop, &names);
            if required.contains(prop_name.as_str()) {
                let _ = writeln!(out, "    #[serde(rename = \"{}\")]", prop_name);
                let _ = writeln!(out, "    pub {}: {},", ident, base_type);
            } else {
                let _ = writeln!(
                    out,
                    "    #[serde(rename = \"{}\", skip_serializing_if = \"Option::is_none\", default)]",
                    prop_name
                );
                let _ = writeln!(out, "    pub {}: Option<{}>,", ident, base_type);
            }
        }
        out.push_str("}\n");
    }

    Ok(out)
}
