use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::action::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::config::{load_artifacts_config_with_env, EnvironmentProvider};
use crate::github::ArtifactsClient;
use crate::output::GithubOutput;
use crate::summary::summarize_artifacts;
use crate::types::{ArtifactLookup, ArtifactsConfig, Operation};

/// Run the artifacts reader against `env` and return the process exit code.
pub async fn run_with_env<E: EnvironmentProvider>(env: &E) -> i32 {
    match execute(env).await {
        Ok(()) => {
            info!("🎉 GitHub Artifacts Reader action completed successfully!");
            EXIT_SUCCESS
        }
        Err(e) => {
            error!("❌ {:#}", e);
            EXIT_FAILURE
        }
    }
}

pub async fn execute<E: EnvironmentProvider>(env: &E) -> Result<()> {
    let cfg = load_artifacts_config_with_env(env)?;

    info!("Repository: {}", cfg.repository);
    info!("Operation: {}", cfg.operation);
    if let Some(run_id) = &cfg.run_id {
        info!("Run ID: {}", run_id);
    }
    if let Some(name) = &cfg.artifact_name {
        info!("Artifact name: {}", name);
    }

    info!("Initializing GitHub client...");
    let client = ArtifactsClient::new(&cfg.api_url, cfg.token.as_deref())?;
    let output = GithubOutput::from_env(env);

    match cfg.operation {
        Operation::Check => run_check(&client, &cfg, &output).await,
        Operation::List => run_list(&client, &cfg, &output).await,
    }
}

async fn run_check(
    client: &ArtifactsClient,
    cfg: &ArtifactsConfig,
    output: &GithubOutput,
) -> Result<()> {
    let name = cfg.artifact_name.as_deref().unwrap_or_default();
    info!("Checking if artifact '{}' exists...", name);

    let lookup = client
        .lookup_artifact(&cfg.repository, name, cfg.run_id.as_deref())
        .await;
    if let ArtifactLookup::Failed(e) = &lookup {
        // the action has always answered "false" here rather than failing the step
        warn!("Error checking artifact existence, reporting it as missing: {}", e);
    }

    let exists = lookup.exists();
    info!(
        "✅ Artifact existence check completed, artifacts exists={}",
        exists
    );

    output.set("artifact-exists", &exists.to_string())?;
    output.set("total-count", &lookup.total_count().to_string())?;
    Ok(())
}

async fn run_list(
    client: &ArtifactsClient,
    cfg: &ArtifactsConfig,
    output: &GithubOutput,
) -> Result<()> {
    info!(
        "Listing artifacts (page {}, per_page {})...",
        cfg.page, cfg.per_page
    );
    let name = cfg.artifact_name.as_deref();

    let list = match cfg.run_id.as_deref() {
        Some(run_id) => {
            client
                .list_workflow_run_artifacts(&cfg.repository, run_id, name, cfg.per_page, cfg.page)
                .await?
        }
        None => {
            client
                .list_repository_artifacts(&cfg.repository, name, cfg.per_page, cfg.page)
                .await?
        }
    };

    let summary = summarize_artifacts(&list);
    info!(
        "✅ Found {} artifacts on this page (total: {})",
        summary.artifacts.len(),
        summary.total_count
    );

    let artifacts_json =
        serde_json::to_string(&summary.artifacts).context("Failed to serialize artifacts")?;
    output.set("artifacts", &artifacts_json)?;
    output.set("total-count", &summary.total_count.to_string())?;
    Ok(())
}
