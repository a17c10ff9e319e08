use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use crate::types::{
    ArtifactsConfig, Operation, SlackConfig, DEFAULT_GITHUB_API_URL, DEFAULT_REACTION_EMOJI,
    DEFAULT_SLACK_BASE_URL,
};

/// Trait for abstracting environment variable access
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;

    /// Like `get_var`, but a blank value counts as unset.
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get_var(key).filter(|v| !v.trim().is_empty())
    }
}

/// Production implementation using std::env
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mock implementation for testing
#[derive(Debug, Default, Clone)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn set_var<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_var(key, value);
        self
    }

    pub fn without_var(mut self, key: &str) -> Self {
        self.vars.remove(key);
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn load_artifacts_config() -> Result<ArtifactsConfig> {
    load_artifacts_config_with_env(&SystemEnvironment)
}

/// Read the artifacts reader inputs. Validation happens here, in the same
/// order the action reports problems: repository, operation, artifact name,
/// then paging.
pub fn load_artifacts_config_with_env<E: EnvironmentProvider>(env: &E) -> Result<ArtifactsConfig> {
    let repository = env
        .get_non_empty("REPOSITORY")
        .or_else(|| env.get_non_empty("GITHUB_REPOSITORY"))
        .map(|r| r.trim().to_string())
        .ok_or_else(|| {
            anyhow!(
                "Repository is required but not provided. REPOSITORY env: '{}', GITHUB_REPOSITORY env: '{}'",
                env.get_var("REPOSITORY").unwrap_or_else(|| "NOT_SET".to_string()),
                env.get_var("GITHUB_REPOSITORY").unwrap_or_else(|| "NOT_SET".to_string()),
            )
        })?;

    let operation: Operation = env
        .get_non_empty("OPERATION")
        .unwrap_or_else(|| "list".to_string())
        .parse()?;

    let artifact_name = env.get_non_empty("ARTIFACT_NAME");
    if operation == Operation::Check && artifact_name.is_none() {
        return Err(anyhow!("Artifact name is required when operation is 'check'"));
    }

    let run_id = env
        .get_non_empty("RUN_ID")
        .or_else(|| env.get_non_empty("GITHUB_RUN_ID"))
        .map(|r| r.trim().to_string());

    let per_page: u32 = env
        .get_non_empty("PER_PAGE")
        .unwrap_or_else(|| "30".to_string())
        .trim()
        .parse()
        .context("Invalid PER_PAGE")?;

    let page: u32 = env
        .get_non_empty("PAGE")
        .unwrap_or_else(|| "1".to_string())
        .trim()
        .parse()
        .context("Invalid PAGE")?;

    let api_url = env
        .get_non_empty("GITHUB_API_URL")
        .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string());

    Ok(ArtifactsConfig {
        token: env.get_non_empty("GITHUB_TOKEN"),
        api_url: api_url.trim_end_matches('/').to_string(),
        repository,
        run_id,
        operation,
        artifact_name,
        per_page,
        page,
    })
}

pub fn load_slack_config() -> SlackConfig {
    load_slack_config_with_env(&SystemEnvironment)
}

pub fn load_slack_config_with_env<E: EnvironmentProvider>(env: &E) -> SlackConfig {
    let add_reaction = env
        .get_var("ADD_REACTION")
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let base_url = env
        .get_non_empty("SLACK_BASE_URL")
        .unwrap_or_else(|| DEFAULT_SLACK_BASE_URL.to_string());

    SlackConfig {
        token: env.get_non_empty("SLACK_BOT_TOKEN"),
        base_url: base_url.trim_end_matches('/').to_string(),
        // free text: only an empty string means no message
        message: env.get_var("SLACK_MESSAGE").filter(|m| !m.is_empty()),
        channel_name: env.get_non_empty("SLACK_CHANNEL_NAME"),
        thread_ts: env.get_non_empty("PARENT_SLACK_MESSAGE_TIMESTAMP"),
        add_reaction,
        reaction_emoji: env
            .get_non_empty("REACTION_EMOJI")
            .unwrap_or_else(|| DEFAULT_REACTION_EMOJI.to_string()),
    }
}
