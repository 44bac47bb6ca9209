use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use kubegen::config::PipelineConfig;
use kubegen::pipeline::Pipeline;
use kubegen::release::{
    artifact_version, build_timestamp, bump_version, clean_all, clean_generated, git_revision,
    Publisher,
};
use kubegen::{DEFAULT_CONFIG_FILE, SUPPORT_CONTAINER};

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, merge and generate client crates for every enabled profile
    Generate {
        /// Kubernetes version to generate against (MAJOR.MINOR)
        #[arg(long)]
        kube_version: Option<String>,

        /// Reuse previously fetched specs instead of hitting the cluster
        #[arg(long)]
        offline: bool,
    },

    /// Remove generated output
    Clean,

    /// Remove generated output, fetched specs, and the support container
    CleanAll,

    /// Fetch and merge against the configured cluster without generating
    Test,

    /// Publish generated crates under the shared public name
    Publish {
        /// Run `cargo publish --dry-run` instead of a real publish
        #[arg(long)]
        dry_run: bool,
    },

    /// Set the release version in the configuration file (MAJOR.MINOR)
    Bump { version: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    let config = PipelineConfig::load(&cli.config).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    match cli.command {
        Commands::Generate {
            kube_version,
            offline,
        } => {
            let version = kube_version.unwrap_or_else(|| config.release.version.clone());
            let pipeline = Pipeline::new(config);
            let summary = pipeline.run(&version, offline).await.map_err(|e| {
                error!("Generation failed: {}", e);
                e
            })?;

            if summary.collisions > 0 {
                info!(
                    collisions = summary.collisions,
                    "Merge resolved colliding definitions (last group wins)"
                );
            }
            for profile in &summary.profiles {
                info!(
                    profile = %profile.profile,
                    crate_name = %profile.crate_name,
                    modules = profile.modules,
                    docs_injected = profile.docs_injected,
                    "Client crate ready"
                );
            }
        }

        Commands::Clean => {
            clean_generated(&config.output_dir)?;
        }

        Commands::CleanAll => {
            clean_all(&config.output_dir, &config.specs_dir, SUPPORT_CONTAINER)?;
        }

        Commands::Test => {
            let pipeline = Pipeline::new(config);
            let summary = pipeline.smoke_test().await.map_err(|e| {
                error!("Smoke run failed: {}", e);
                e
            })?;
            info!(
                groups = summary.groups,
                paths = summary.merged_paths,
                operations = summary.operations,
                "Smoke run succeeded"
            );
        }

        Commands::Publish { dry_run } => {
            let timestamp = build_timestamp();
            let revision = git_revision();
            let pipeline = Pipeline::new(config.clone());

            for profile in pipeline.enabled_profiles() {
                let version = artifact_version(
                    &config.release.version,
                    &profile.name,
                    &timestamp,
                    &revision,
                )?;
                let manifest = config
                    .output_dir
                    .join(&profile.name)
                    .join("Cargo.toml");
                Publisher::new(&manifest, config.release.shared_name.clone())
                    .dry_run(dry_run)
                    .publish(&version)
                    .map_err(|e| {
                        error!(profile = %profile.name, "Publish failed: {}", e);
                        e
                    })?;
                info!(profile = %profile.name, version = %version, "Published");
            }
        }

        Commands::Bump { version } => {
            bump_version(&cli.config, &version)?;
        }
    }

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .init();

    Ok(())
}
