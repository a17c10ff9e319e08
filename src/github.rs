use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use tracing::{debug, error, info};

use crate::error::GitHubError;
use crate::types::{ArtifactList, ArtifactLookup};

pub const API_VERSION: &str = "2022-11-28";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_PER_PAGE: u32 = 100;

/// Client for the GitHub Actions Artifacts REST API
pub struct ArtifactsClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ArtifactsClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, GitHubError> {
        Self::with_timeout(base_url, token, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, GitHubError> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or(GitHubError::MissingToken)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        headers.insert(USER_AGENT, HeaderValue::from_static("GitHub-Artifacts-Reader-Action"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(GitHubError::from_reqwest)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// List artifacts produced by one workflow run.
    pub async fn list_workflow_run_artifacts(
        &self,
        repository: &str,
        run_id: &str,
        artifact_name: Option<&str>,
        per_page: u32,
        page: u32,
    ) -> Result<ArtifactList, GitHubError> {
        let (owner, repo) = parse_repository(repository)?;
        let url = format!(
            "{}/repos/{}/{}/actions/runs/{}/artifacts",
            self.base_url, owner, repo, run_id
        );
        self.get_artifacts(&url, artifact_name, per_page, page).await
    }

    /// List artifacts across every workflow run of a repository.
    pub async fn list_repository_artifacts(
        &self,
        repository: &str,
        artifact_name: Option<&str>,
        per_page: u32,
        page: u32,
    ) -> Result<ArtifactList, GitHubError> {
        let (owner, repo) = parse_repository(repository)?;
        let url = format!("{}/repos/{}/{}/actions/artifacts", self.base_url, owner, repo);
        self.get_artifacts(&url, artifact_name, per_page, page).await
    }

    /// Look for artifacts named `artifact_name`, scoped to a run when one is given.
    pub async fn lookup_artifact(
        &self,
        repository: &str,
        artifact_name: &str,
        run_id: Option<&str>,
    ) -> ArtifactLookup {
        let result = match run_id {
            Some(run_id) => {
                self.list_workflow_run_artifacts(repository, run_id, Some(artifact_name), 1, 1)
                    .await
            }
            None => {
                self.list_repository_artifacts(repository, Some(artifact_name), 1, 1)
                    .await
            }
        };

        match result {
            Ok(list) if list.total_count > 0 => ArtifactLookup::Present {
                total_count: list.total_count,
            },
            Ok(_) => ArtifactLookup::Absent,
            Err(e) => ArtifactLookup::Failed(e),
        }
    }

    /// Boolean existence check. A failed lookup is logged and reported as
    /// `false`; use [`ArtifactsClient::lookup_artifact`] to tell the two apart.
    pub async fn check_artifact_exists(
        &self,
        repository: &str,
        artifact_name: &str,
        run_id: Option<&str>,
    ) -> bool {
        match self.lookup_artifact(repository, artifact_name, run_id).await {
            ArtifactLookup::Failed(e) => {
                error!("Error checking artifact existence: {}", e);
                false
            }
            lookup => lookup.exists(),
        }
    }

    async fn get_artifacts(
        &self,
        url: &str,
        artifact_name: Option<&str>,
        per_page: u32,
        page: u32,
    ) -> Result<ArtifactList, GitHubError> {
        let query = build_query(artifact_name, per_page, page);
        info!("Making request to: {}", url);
        debug!("query: {:?}", query);

        let res = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(&query)
            .send()
            .await
            .map_err(GitHubError::from_reqwest)?;

        let status = res.status().as_u16();
        if status != 200 {
            let body = res.text().await.unwrap_or_default();
            error!("GitHub API returned {} for {}", status, url);
            return Err(GitHubError::from_status(status, body));
        }

        let body = res.text().await.map_err(GitHubError::from_reqwest)?;
        serde_json::from_str(&body).map_err(|e| GitHubError::MalformedResponse(e.to_string()))
    }
}

/// Split `owner/repo` into its two parts.
pub fn parse_repository(repository: &str) -> Result<(&str, &str), GitHubError> {
    if repository.is_empty() {
        return Err(GitHubError::Validation(
            "Repository must be specified in format 'owner/repo'".to_string(),
        ));
    }
    let mut parts = repository.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner, repo))
        }
        _ => Err(GitHubError::Validation(format!(
            "Repository must be in format 'owner/repo', got '{}'",
            repository
        ))),
    }
}

pub fn clamp_per_page(per_page: u32) -> u32 {
    per_page.clamp(1, MAX_PER_PAGE)
}

fn build_query(
    artifact_name: Option<&str>,
    per_page: u32,
    page: u32,
) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("per_page", clamp_per_page(per_page).to_string()),
        ("page", page.max(1).to_string()),
    ];
    if let Some(name) = artifact_name.filter(|n| !n.is_empty()) {
        query.push(("name", name.to_string()));
    }
    query
}
