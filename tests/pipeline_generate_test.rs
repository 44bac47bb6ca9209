//! End-to-end generation pipeline test
//!
//! Runs the full offline pipeline over a small pre-fetched spec set and
//! checks the shape of both generated client crates: module layout, barrel
//! re-exports, injected documentation and the stamped manifest.

use kubegen::config::PipelineConfig;
use kubegen::pipeline::Pipeline;
use serde_json::json;
use tempfile::TempDir;

fn core_spec() -> serde_json::Value {
    json!({
        "openapi": "3.0.0",
        "info": {"title": "Kubernetes", "version": "v1.30.0"},
        "paths": {
            "/api/v1/namespaces/{namespace}/pods": {
                "get": {
                    "operationId": "listCoreV1NamespacedPod",
                    "summary": "list or watch objects of kind Pod",
                    "tags": ["core_v1"],
                    "parameters": [
                        {
                            "name": "namespace",
                            "in": "path",
                            "required": true,
                            "description": "object name and auth scope",
                            "schema": {"type": "string"}
                        },
                        {
                            "name": "labelSelector",
                            "in": "query",
                            "description": "selector to restrict the list",
                            "schema": {"type": "string"}
                        }
                    ],
                    "responses": {"200": {"description": "OK"}}
                }
            }
        },
        "components": {
            "schemas": {
                "io.k8s.api.core.v1.Pod": {
                    "type": "object",
                    "description": "Pod is a collection of containers",
                    "properties": {
                        "apiVersion": {"type": "string"},
                        "kind": {"type": "string"}
                    }
                }
            }
        }
    })
}

fn apps_spec() -> serde_json::Value {
    json!({
        "openapi": "3.0.0",
        "info": {"title": "Kubernetes", "version": "v1.30.0"},
        "paths": {
            "/apis/apps/v1/namespaces/{namespace}/deployments": {
                "get": {
                    "operationId": "listAppsV1NamespacedDeployment",
                    "summary": "list or watch objects of kind Deployment",
                    "tags": ["apps_v1"],
                    "parameters": [
                        {
                            "name": "namespace",
                            "in": "path",
                            "required": true,
                            "schema": {"type": "string"}
                        }
                    ],
                    "responses": {"200": {"description": "OK"}}
                },
                "post": {
                    "operationId": "createAppsV1NamespacedDeployment",
                    "summary": "create a Deployment",
                    "tags": ["apps_v1"],
                    "parameters": [
                        {
                            "name": "namespace",
                            "in": "path",
                            "required": true,
                            "schema": {"type": "string"}
                        }
                    ],
                    "responses": {"201": {"description": "Created"}}
                }
            }
        }
    })
}

fn offline_config(workspace: &TempDir) -> PipelineConfig {
    let specs_dir = workspace.path().join("specs");
    std::fs::create_dir_all(&specs_dir).unwrap();
    std::fs::write(
        specs_dir.join("core-v1.json"),
        serde_json::to_vec_pretty(&core_spec()).unwrap(),
    )
    .unwrap();
    std::fs::write(
        specs_dir.join("apps-v1.json"),
        serde_json::to_vec_pretty(&apps_spec()).unwrap(),
    )
    .unwrap();

    let mut config = PipelineConfig::default();
    config.specs_dir = specs_dir;
    config.output_dir = workspace.path().join("generated");
    config
}

#[tokio::test]
async fn test_offline_run_generates_both_profiles() {
    let workspace = TempDir::new().unwrap();
    let config = offline_config(&workspace);
    let output_dir = config.output_dir.clone();

    let summary = Pipeline::new(config).run("1.30", true).await.unwrap();

    assert_eq!(summary.groups, 2);
    assert_eq!(summary.merged_paths, 2);
    assert_eq!(summary.operations, 3);
    assert_eq!(summary.profiles.len(), 2);

    for profile in ["tokio", "blocking"] {
        let root = output_dir.join(profile);
        assert!(root.join("Cargo.toml").exists());
        assert!(root.join("src/lib.rs").exists());
        assert!(root.join("src/models.rs").exists());
        assert!(root.join("src/core_v1.rs").exists());
        assert!(root.join("src/apps_v1.rs").exists());
    }
}

#[tokio::test]
async fn test_generated_modules_carry_operations_and_docs() {
    let workspace = TempDir::new().unwrap();
    let config = offline_config(&workspace);
    let output_dir = config.output_dir.clone();

    Pipeline::new(config).run("1.30", true).await.unwrap();

    let core = std::fs::read_to_string(output_dir.join("tokio/src/core_v1.rs")).unwrap();
    assert!(core.contains("pub async fn list_core_v1_namespaced_pod"));
    assert!(core.contains("list or watch objects of kind Pod"));

    let apps = std::fs::read_to_string(output_dir.join("tokio/src/apps_v1.rs")).unwrap();
    assert!(apps.contains("pub async fn list_apps_v1_namespaced_deployment"));
    assert!(apps.contains("pub async fn create_apps_v1_namespaced_deployment"));

    // The blocking profile renders the same operations without async
    let blocking = std::fs::read_to_string(output_dir.join("blocking/src/apps_v1.rs")).unwrap();
    assert!(blocking.contains("pub fn list_apps_v1_namespaced_deployment"));
    assert!(!blocking.contains("async fn"));
}

#[tokio::test]
async fn test_barrel_reexports_runtime_surface() {
    let workspace = TempDir::new().unwrap();
    let config = offline_config(&workspace);
    let output_dir = config.output_dir.clone();

    Pipeline::new(config).run("1.30", true).await.unwrap();

    let tokio_barrel = std::fs::read_to_string(output_dir.join("tokio/src/lib.rs")).unwrap();
    assert!(tokio_barrel.contains("pub mod apps_v1;"));
    assert!(tokio_barrel.contains("pub mod core_v1;"));
    assert!(tokio_barrel.contains("pub mod models;"));
    assert!(tokio_barrel.contains("RetryPolicy"));
    assert!(tokio_barrel.contains("ListOptions"));

    let blocking_barrel =
        std::fs::read_to_string(output_dir.join("blocking/src/lib.rs")).unwrap();
    assert!(blocking_barrel.contains("BlockingClient"));
    assert!(!blocking_barrel.contains("RetryPolicy"));
}

#[tokio::test]
async fn test_generated_models_and_manifest() {
    let workspace = TempDir::new().unwrap();
    let config = offline_config(&workspace);
    let output_dir = config.output_dir.clone();

    Pipeline::new(config).run("1.30", true).await.unwrap();

    let models = std::fs::read_to_string(output_dir.join("tokio/src/models.rs")).unwrap();
    assert!(models.contains("pub struct V1Pod"));
    assert!(models.contains("Pod is a collection of containers"));

    let manifest = std::fs::read_to_string(output_dir.join("tokio/Cargo.toml")).unwrap();
    let doc: toml::Value = toml::from_str(&manifest).unwrap();
    assert_eq!(doc["package"]["name"].as_str(), Some("kube-client-tokio"));
    assert_eq!(doc["package"]["version"].as_str(), Some("0.0.0"));
}

#[tokio::test]
async fn test_invalid_kube_version_aborts_before_work() {
    let workspace = TempDir::new().unwrap();
    let config = offline_config(&workspace);
    let output_dir = config.output_dir.clone();

    let err = Pipeline::new(config).run("v1.30", true).await.unwrap_err();
    assert_eq!(err.category(), "release");
    assert!(!output_dir.exists());
}

#[tokio::test]
async fn test_missing_specs_dir_is_fatal_offline() {
    let workspace = TempDir::new().unwrap();
    let mut config = PipelineConfig::default();
    config.specs_dir = workspace.path().join("never-fetched");
    config.output_dir = workspace.path().join("generated");

    let err = Pipeline::new(config).run("1.30", true).await.unwrap_err();
    assert_eq!(err.category(), "merge");
}
