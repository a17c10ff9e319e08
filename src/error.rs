use thiserror::Error;

/// Failures talking to the GitHub Actions Artifacts API
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("The GITHUB_TOKEN environment variable was not set. Cannot interact with GitHub API")]
    MissingToken,

    #[error("{0}")]
    Validation(String),

    #[error("Authentication failed. Please check your GitHub token.")]
    Authentication,

    #[error("Access denied. Please ensure your token has the required permissions.")]
    Authorization,

    #[error("Repository or run not found. Please check your repository and run ID.")]
    NotFound,

    #[error("GitHub API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("{0}")]
    Transport(String),

    #[error("Failed to decode GitHub API response: {0}")]
    MalformedResponse(String),
}

impl GitHubError {
    /// Map a non-200 status to its error kind.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 => GitHubError::Authentication,
            403 => GitHubError::Authorization,
            404 => GitHubError::NotFound,
            _ => GitHubError::Api { status, body },
        }
    }

    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GitHubError::Transport("Request to GitHub API timed out".to_string())
        } else {
            GitHubError::Transport(format!("Request to GitHub API failed: {}", err))
        }
    }
}

/// Failures talking to the Slack Web API
#[derive(Debug, Error)]
pub enum SlackError {
    #[error("The SLACK_BOT_TOKEN environment variable was not set. Cannot interact with Slack")]
    MissingToken,

    #[error("Please provide a slack channel name")]
    MissingChannelName,

    #[error("The channel {0} was not found in the conversation list. Cannot get it's ID")]
    ChannelNotFound(String),

    #[error("Gave up looking for channel {channel} after {pages} pages of conversations")]
    PaginationLimit { channel: String, pages: usize },

    #[error("Malformed response from Slack {method}: {reason}")]
    MalformedResponse { method: String, reason: String },

    #[error("Slack {method} returned error: {error}")]
    Api { method: String, error: String },

    #[error("Slack {method} failed with HTTP {status}: {body}")]
    Http { method: String, status: u16, body: String },

    #[error("Request to Slack {method} failed: {reason}")]
    Transport { method: String, reason: String },
}

impl SlackError {
    pub fn from_reqwest(method: &str, err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "timed out".to_string()
        } else {
            err.to_string()
        };
        SlackError::Transport {
            method: method.to_string(),
            reason,
        }
    }
}
