use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_SLACK_BASE_URL: &str = "https://slack.com/api";
pub const DEFAULT_REACTION_EMOJI: &str = "white_check_mark";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Check,
    List,
}

impl FromStr for Operation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "check" => Ok(Operation::Check),
            "list" => Ok(Operation::List),
            _ => Err(anyhow!("Operation must be either 'check' or 'list'")),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Check => f.write_str("check"),
            Operation::List => f.write_str("list"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactsConfig {
    pub token: Option<String>,
    pub api_url: String,
    pub repository: String,
    pub run_id: Option<String>,
    pub operation: Operation,
    pub artifact_name: Option<String>,
    pub per_page: u32,
    pub page: u32,
}

#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub token: Option<String>,
    pub base_url: String,
    pub message: Option<String>,
    pub channel_name: Option<String>,
    pub thread_ts: Option<String>,
    pub add_reaction: bool,
    pub reaction_emoji: String,
}

/// Raw page returned by the artifacts listing endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtifactList {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artifact {
    pub id: u64,
    pub node_id: Option<String>,
    pub name: String,
    pub size_in_bytes: u64,
    pub url: Option<String>,
    pub archive_download_url: Option<String>,
    #[serde(default)]
    pub expired: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub digest: Option<String>,
    pub workflow_run: Option<WorkflowRun>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRun {
    pub id: Option<u64>,
    pub repository_id: Option<u64>,
    pub head_repository_id: Option<u64>,
    pub head_branch: Option<String>,
    pub head_sha: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactSummary {
    pub id: u64,
    pub name: String,
    pub size_in_bytes: u64,
    pub expired: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub archive_download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_run: Option<WorkflowRunSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowRunSummary {
    pub id: Option<u64>,
    pub head_branch: Option<String>,
    pub head_sha: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactsSummary {
    pub total_count: u64,
    pub artifacts: Vec<ArtifactSummary>,
}

/// Outcome of a single filtered artifact lookup.
///
/// `Absent` means the API answered and nothing matched; `Failed` means we
/// never got an answer.
#[derive(Debug)]
pub enum ArtifactLookup {
    Present { total_count: u64 },
    Absent,
    Failed(crate::error::GitHubError),
}

impl ArtifactLookup {
    pub fn exists(&self) -> bool {
        matches!(self, ArtifactLookup::Present { .. })
    }

    pub fn total_count(&self) -> u64 {
        match self {
            ArtifactLookup::Present { total_count } => *total_count,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackChannel {
    pub id: String,
    pub name: String,
}

#[derive(Serialize)]
pub struct PostMessagePayload<'a> {
    pub channel: &'a str,
    pub text: &'a str,
    pub mrkdwn: bool,
    pub unfurl_links: bool,
    pub unfurl_media: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<&'a str>,
}

#[derive(Serialize)]
pub struct ReactionPayload<'a> {
    pub channel: &'a str,
    pub name: &'a str,
    pub timestamp: &'a str,
}

/// Raw Slack Web API response body
#[derive(Debug, Clone, PartialEq)]
pub struct SlackResponse(pub serde_json::Value);

impl SlackResponse {
    pub fn ok(&self) -> bool {
        self.0.get("ok").and_then(|v| v.as_bool()).unwrap_or(false)
    }

    pub fn error(&self) -> Option<&str> {
        self.str_field("error")
    }

    pub fn ts(&self) -> Option<&str> {
        self.str_field("ts")
    }

    pub fn channel(&self) -> Option<&str> {
        self.str_field("channel")
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}
