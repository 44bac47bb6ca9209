use once_cell::sync::Lazy;
use regex::Regex;

/// Regex for sanitizing group identifiers - removes invalid characters
static IDENT_SANITIZER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-zA-Z0-9\-_]").expect("Invalid regex pattern")
});

/// Sanitizes a discovered API group path into a file identifier:
/// - Strips a leading `api/` or `apis/` segment
/// - Converts to lowercase
/// - Replaces `/` and `.` with dashes
/// - Drops other special characters and collapses separator runs
///
/// `apis/core/v1` becomes `core-v1`, `apis/apps/v1` becomes `apps-v1`.
pub fn sanitize_group_ident(group_path: &str) -> String {
    let trimmed = group_path.trim_matches('/').to_lowercase();
    let without_prefix = trimmed
        .strip_prefix("apis/")
        .or_else(|| trimmed.strip_prefix("api/"))
        .unwrap_or(&trimmed);

    let name = without_prefix.replace(['/', '.', ' '], "-");

    let sanitized = IDENT_SANITIZER_REGEX.replace_all(&name, "");
    let collapsed = collapse_separators(&sanitized);
    let trimmed = collapsed.trim_matches(&['-', '_'][..]);

    if trimmed.is_empty() {
        "unnamed-group".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Converts a sanitized group identifier into a Rust module identifier
/// (`core-v1` becomes `core_v1`). Identifiers starting with a digit get an
/// underscore prefix.
pub fn module_ident(group_ident: &str) -> String {
    let ident = group_ident.replace('-', "_");
    if ident.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(true) {
        format!("_{}", ident)
    } else {
        ident
    }
}

/// Converts a camelCase operation id into a snake_case function name
/// (`listCoreV1NamespacedPod` becomes `list_core_v1_namespaced_pod`).
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 8);
    let mut prev_lower_or_digit = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower_or_digit {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower_or_digit = false;
        } else if c.is_ascii_alphanumeric() {
            out.push(c);
            prev_lower_or_digit = true;
        } else {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            prev_lower_or_digit = false;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "unnamed_operation".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Collapses multiple consecutive dashes or underscores into single ones
fn collapse_separators(input: &str) -> String {
    static DASH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("Invalid regex pattern"));
    static UNDERSCORE_REGEX: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"_+").expect("Invalid regex pattern"));

    let collapsed_dashes = DASH_REGEX.replace_all(input, "-");
    UNDERSCORE_REGEX.replace_all(&collapsed_dashes, "_").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_group_ident_strips_apis_prefix() {
        assert_eq!(sanitize_group_ident("apis/core/v1"), "core-v1");
        assert_eq!(sanitize_group_ident("apis/apps/v1"), "apps-v1");
        assert_eq!(sanitize_group_ident("api/v1"), "v1");
    }

    #[test]
    fn test_sanitize_group_ident_dotted_groups() {
        assert_eq!(
            sanitize_group_ident("apis/networking.k8s.io/v1"),
            "networking-k8s-io-v1"
        );
        assert_eq!(
            sanitize_group_ident("apis/rbac.authorization.k8s.io/v1"),
            "rbac-authorization-k8s-io-v1"
        );
    }

    #[test]
    fn test_sanitize_group_ident_edge_cases() {
        assert_eq!(sanitize_group_ident(""), "unnamed-group");
        assert_eq!(sanitize_group_ident("///"), "unnamed-group");
        assert_eq!(sanitize_group_ident("Apis/Apps/V1"), "apps-v1");
        assert_eq!(sanitize_group_ident("apis//batch//v1"), "batch-v1");
    }

    #[test]
    fn test_module_ident() {
        assert_eq!(module_ident("core-v1"), "core_v1");
        assert_eq!(module_ident("networking-k8s-io-v1"), "networking_k8s_io_v1");
        assert_eq!(module_ident("1beta"), "_1beta");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(
            snake_case("listCoreV1NamespacedPod"),
            "list_core_v1_namespaced_pod"
        );
        assert_eq!(snake_case("readAppsV1Deployment"), "read_apps_v1_deployment");
        assert_eq!(snake_case("already_snake"), "already_snake");
        assert_eq!(snake_case(""), "unnamed_operation");
    }
}
