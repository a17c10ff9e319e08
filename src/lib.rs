// Public modules
pub mod types;
pub mod error;
pub mod config;
pub mod github;
pub mod summary;
pub mod slack;
pub mod output;
pub mod action;

// Re-export commonly used items
pub use types::*;
pub use error::{GitHubError, SlackError};
pub use config::{
    load_artifacts_config, load_artifacts_config_with_env, load_slack_config,
    load_slack_config_with_env, EnvironmentProvider, MockEnvironment, SystemEnvironment,
};
pub use github::{clamp_per_page, parse_repository, ArtifactsClient};
pub use summary::{summarize_artifact, summarize_artifacts};
pub use slack::{SlackClient, MAX_CHANNEL_PAGES};
pub use output::{GithubOutput, OutputTarget};
