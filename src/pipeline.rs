//! Generation pipeline driver
//!
//! Sequential batch execution: fetch group specs, merge, generate once per
//! enabled profile, then post-process each generated tree. A failure at any
//! step aborts the run; nothing recovers automatically.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::generator::{ClientGenerator, TargetProfile};
use crate::postprocess::{write_barrel, DocInjector, FormatPass, LintPass};
use crate::release::validate_version;
use crate::spec::{extract_operations, load_spec_dir, merge_specs, SpecFetcher};
use tracing::info;

/// Per-profile result counts
#[derive(Debug, Clone)]
pub struct ProfileSummary {
    pub profile: String,
    pub crate_name: String,
    pub modules: usize,
    pub files_formatted: usize,
    pub docs_injected: usize,
    pub lint_fixes: usize,
}

/// Result counts for a full pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineSummary {
    pub groups: usize,
    pub merged_paths: usize,
    pub collisions: usize,
    pub operations: usize,
    pub profiles: Vec<ProfileSummary>,
}

/// The fetch-merge-generate-postprocess pipeline
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Profiles enabled by the configuration
    pub fn enabled_profiles(&self) -> Vec<TargetProfile> {
        let mut profiles = Vec::new();
        if self.config.profiles.tokio {
            profiles.push(TargetProfile::tokio());
        }
        if self.config.profiles.blocking {
            profiles.push(TargetProfile::blocking());
        }
        profiles
    }

    /// Run the full pipeline for the given Kubernetes version.
    ///
    /// With `offline` set, previously fetched specs are reused instead of
    /// hitting the cluster.
    pub async fn run(&self, kube_version: &str, offline: bool) -> Result<PipelineSummary> {
        validate_version(kube_version)?;
        info!(version = %kube_version, offline, "Starting generation pipeline");

        if !offline {
            let fetcher = SpecFetcher::new(&self.config.cluster)?;
            fetcher.fetch_all(&self.config.specs_dir).await?;
        }

        let docs = load_spec_dir(&self.config.specs_dir)?;
        let (merged, merge_report) = merge_specs(&docs)?;
        let records = extract_operations(&merged)?;

        let mut summary = PipelineSummary {
            groups: docs.len(),
            merged_paths: merge_report.path_count,
            collisions: merge_report.collisions.len(),
            operations: records.len(),
            ..Default::default()
        };

        for profile in self.enabled_profiles() {
            let tree = ClientGenerator::new(profile.clone()).generate(
                &merged,
                &records,
                &self.config.output_dir,
                &self.config.release.package_name,
            )?;
            write_barrel(&profile, &tree)?;

            let format_report = FormatPass::default().run(&tree.src_dir)?;
            let doc_report = DocInjector::new(&records).run(&tree.src_dir)?;
            let lint_report = LintPass::new().run(&tree.src_dir)?;

            summary.profiles.push(ProfileSummary {
                profile: profile.name.clone(),
                crate_name: tree.crate_name.clone(),
                modules: tree.modules.len(),
                files_formatted: format_report.files_changed,
                docs_injected: doc_report.blocks_injected,
                lint_fixes: lint_report.fixes_applied,
            });
        }

        info!(
            groups = summary.groups,
            paths = summary.merged_paths,
            operations = summary.operations,
            profiles = summary.profiles.len(),
            "Pipeline complete"
        );
        Ok(summary)
    }

    /// Integration smoke run: fetch and merge against the configured cluster
    /// into a temporary directory without touching the workspace.
    pub async fn smoke_test(&self) -> Result<PipelineSummary> {
        let temp = tempfile::tempdir()?;
        let fetcher = SpecFetcher::new(&self.config.cluster)?;
        fetcher.fetch_all(temp.path()).await?;

        let docs = load_spec_dir(temp.path())?;
        let (merged, merge_report) = merge_specs(&docs)?;
        let records = extract_operations(&merged)?;

        Ok(PipelineSummary {
            groups: docs.len(),
            merged_paths: merge_report.path_count,
            collisions: merge_report.collisions.len(),
            operations: records.len(),
            profiles: Vec::new(),
        })
    }
}
