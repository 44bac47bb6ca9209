//! Operation record extraction
//!
//! Walks the merged OpenAPI document and extracts one record per operation.
//! Records are derived, not authoritative: they drive generated signatures
//! and documentation only.

use crate::error::{KubegenError, Result};
use crate::utils::{module_ident, snake_case};
use openapiv3::{OpenAPI, Operation, Parameter, ReferenceOr};
use serde_json::Value;

/// One parameter of an operation
#[derive(Debug, Clone)]
pub struct ParameterRecord {
    pub name: String,
    /// Parameter location: path, query, header or cookie
    pub location: String,
    pub description: Option<String>,
    pub required: bool,
}

/// One operation extracted from the merged document
#[derive(Debug, Clone)]
pub struct OperationRecord {
    /// Generated function name (snake_case of the operation id)
    pub fn_name: String,
    /// Original operation id, when present
    pub operation_id: Option<String>,
    /// HTTP method, uppercase
    pub method: String,
    /// Route template, e.g. `/api/v1/namespaces/{namespace}/pods`
    pub path: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub parameters: Vec<ParameterRecord>,
    /// Owning tag/group, e.g. `core_v1`
    pub tag: String,
    pub deprecated: bool,
}

impl OperationRecord {
    /// Path parameters in declaration order
    pub fn path_params(&self) -> impl Iterator<Item = &ParameterRecord> {
        self.parameters.iter().filter(|p| p.location == "path")
    }

    /// Whether the operation carries a request body by convention
    pub fn has_body(&self) -> bool {
        matches!(self.method.as_str(), "POST" | "PUT" | "PATCH")
    }
}

/// Parse the merged document and extract operation records for every path
/// and method. `$ref` parameters are resolved through
/// `components.parameters`; unresolvable references are skipped.
pub fn extract_operations(merged: &Value) -> Result<Vec<OperationRecord>> {
    let spec: OpenAPI = serde_json::from_value(merged.clone()).map_err(|e| {
        KubegenError::generate(format!("Merged document is not valid OpenAPI 3: {}", e))
    })?;

    let mut records = Vec::new();
    for (path, path_item) in &spec.paths.paths {
        let Some(item) = path_item.as_item() else {
            continue;
        };
        extract_if_present(&spec, &mut records, path, "GET", &item.get);
        extract_if_present(&spec, &mut records, path, "POST", &item.post);
        extract_if_present(&spec, &mut records, path, "PUT", &item.put);
        extract_if_present(&spec, &mut records, path, "PATCH", &item.patch);
        extract_if_present(&spec, &mut records, path, "DELETE", &item.delete);
        extract_if_present(&spec, &mut records, path, "HEAD", &item.head);
        extract_if_present(&spec, &mut records, path, "OPTIONS", &item.options);
    }

    Ok(records)
}

fn extract_if_present(
    spec: &OpenAPI,
    records: &mut Vec<OperationRecord>,
    path: &str,
    method: &str,
    operation: &Option<Operation>,
) {
    if let Some(op) = operation {
        records.push(convert_operation(spec, path, method, op));
    }
}

fn convert_operation(spec: &OpenAPI, path: &str, method: &str, op: &Operation) -> OperationRecord {
    let mut parameters = Vec::new();
    for param_ref in &op.parameters {
        if let Some(param) = resolve_parameter(spec, param_ref) {
            parameters.push(convert_parameter(param));
        }
    }

    let fn_name = match &op.operation_id {
        Some(id) => snake_case(id),
        None => snake_case(&format!("{} {}", method, path)),
    };
    // Tags become module names, so they must be valid Rust identifiers
    let tag = op
        .tags
        .first()
        .map(|t| module_ident(&snake_case(t)))
        .unwrap_or_else(|| "default".to_string());

    OperationRecord {
        fn_name,
        operation_id: op.operation_id.clone(),
        method: method.to_uppercase(),
        path: path.to_string(),
        summary: op.summary.clone(),
        description: op.description.clone(),
        parameters,
        tag,
        deprecated: op.deprecated,
    }
}

fn resolve_parameter<'a>(
    spec: &'a OpenAPI,
    param_ref: &'a ReferenceOr<Parameter>,
) -> Option<&'a Parameter> {
    match param_ref {
        ReferenceOr::Item(param) => Some(param),
        ReferenceOr::Reference { reference } => {
            let name = reference.strip_prefix("#/components/parameters/")?;
            spec.components
                .as_ref()?
                .parameters
                .get(name)
                .and_then(|p| p.as_item())
        }
    }
}

fn convert_parameter(param: &Parameter) -> ParameterRecord {
    let location = match param {
        Parameter::Query { .. } => "query",
        Parameter::Header { .. } => "header",
        Parameter::Path { .. } => "path",
        Parameter::Cookie { .. } => "cookie",
    };
    let data = param.parameter_data_ref();

    ParameterRecord {
        name: data.name.clone(),
        location: location.to_string(),
        description: data.description.clone(),
        // Path parameters are always required
        required: data.required || matches!(param, Parameter::Path { .. }),
    }
}
