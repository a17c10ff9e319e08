use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::SlackError;
use crate::types::{PostMessagePayload, ReactionPayload, SlackChannel, SlackResponse};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const CHANNELS_PAGE_LIMIT: u32 = 100;
/// Upper bound on conversations.list calls for a single lookup, whatever the cursor says.
pub const MAX_CHANNEL_PAGES: usize = 50;

/// Client for the Slack Web API, authenticated with a bot token
pub struct SlackClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl SlackClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, SlackError> {
        Self::with_timeout(base_url, token, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, SlackError> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or(SlackError::MissingToken)?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SlackError::from_reqwest("client", e))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Resolve a channel name to its id by walking conversations.list.
    ///
    /// Stops at the first exact (case-sensitive) match. Every call starts
    /// again from the first page.
    pub async fn resolve_channel_id(&self, channel_name: &str) -> Result<String, SlackError> {
        if channel_name.is_empty() {
            error!("Please provide a slack channel name");
            return Err(SlackError::MissingChannelName);
        }
        info!("Getting channel id by it's name {}...", channel_name);

        let mut cursor: Option<String> = None;
        for _ in 0..MAX_CHANNEL_PAGES {
            let page = self.conversations_page(cursor.as_deref()).await?;

            let channels = page
                .get("channels")
                .and_then(Value::as_array)
                .ok_or_else(|| SlackError::MalformedResponse {
                    method: "conversations.list".to_string(),
                    reason: "missing channels list".to_string(),
                })?;

            if let Some(channel) = find_channel(channels, channel_name) {
                info!("Slack channel {} has ID {}", channel_name, channel.id);
                return Ok(channel.id);
            }

            match next_cursor(&page) {
                Some(next) => {
                    debug!(
                        "The Slack channel was not found on the fetched page; trying the next page using the cursor: {}",
                        next
                    );
                    cursor = Some(next);
                }
                None => {
                    warn!(
                        "The channel {} was not found in the conversation list. Cannot get it's ID",
                        channel_name
                    );
                    return Err(SlackError::ChannelNotFound(channel_name.to_string()));
                }
            }
        }

        error!(
            "Still no channel {} after {} pages of conversations, giving up",
            channel_name, MAX_CHANNEL_PAGES
        );
        Err(SlackError::PaginationLimit {
            channel: channel_name.to_string(),
            pages: MAX_CHANNEL_PAGES,
        })
    }

    /// Post `text` to a channel, as a thread reply when `thread_ts` is set.
    ///
    /// Returns `None` when Slack rejects the message or the request fails;
    /// the reason is logged.
    pub async fn send_message_in_thread_by_channel_id(
        &self,
        channel_id: &str,
        text: &str,
        thread_ts: Option<&str>,
    ) -> Option<SlackResponse> {
        info!(
            "Sending the message to thread {} on channel {}",
            thread_ts.unwrap_or("None"),
            channel_id
        );
        let payload = PostMessagePayload {
            channel: channel_id,
            text,
            mrkdwn: true,
            unfurl_links: false,
            unfurl_media: false,
            thread_ts,
        };
        match self.post("chat.postMessage", &payload).await {
            Ok(resp) => Some(resp),
            Err(e) => {
                error!("Failed to send the Slack message: {}", e);
                None
            }
        }
    }

    pub async fn add_reaction_to_thread_by_channel_id(
        &self,
        channel_id: &str,
        emoji_name: &str,
        thread_ts: &str,
    ) -> Option<SlackResponse> {
        info!(
            "Adding {} reaction to thread {}... on channel {}",
            emoji_name, thread_ts, channel_id
        );
        let payload = ReactionPayload {
            channel: channel_id,
            name: emoji_name,
            timestamp: thread_ts,
        };
        match self.post("reactions.add", &payload).await {
            Ok(resp) => Some(resp),
            Err(e) => {
                error!("Failed to add reaction to the Slack message: {}", e);
                None
            }
        }
    }

    /// Resolve `channel_name` and post the message there.
    pub async fn send_message(
        &self,
        channel_name: &str,
        text: &str,
        thread_ts: Option<&str>,
    ) -> Result<Option<SlackResponse>, SlackError> {
        let channel_id = self.resolve_channel_id(channel_name).await?;
        Ok(self
            .send_message_in_thread_by_channel_id(&channel_id, text, thread_ts)
            .await)
    }

    async fn conversations_page(&self, cursor: Option<&str>) -> Result<Value, SlackError> {
        let method = "conversations.list";
        let mut query = vec![("limit", CHANNELS_PAGE_LIMIT.to_string())];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }

        let res = self
            .http
            .get(self.method_url(method))
            .bearer_auth(&self.token)
            .query(&query)
            .send()
            .await
            .map_err(|e| SlackError::from_reqwest(method, e))?;

        let body = read_body(method, res).await?;
        if !body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
            let err = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error")
                .to_string();
            error!("Error fetching conversations: {}", err);
            return Err(SlackError::Api {
                method: method.to_string(),
                error: err,
            });
        }
        Ok(body)
    }

    async fn post<T: Serialize>(
        &self,
        method: &str,
        payload: &T,
    ) -> Result<SlackResponse, SlackError> {
        let res = self
            .http
            .post(self.method_url(method))
            .bearer_auth(&self.token)
            .json(payload)
            .send()
            .await
            .map_err(|e| SlackError::from_reqwest(method, e))?;

        let resp = SlackResponse(read_body(method, res).await?);
        if !resp.ok() {
            return Err(SlackError::Api {
                method: method.to_string(),
                error: resp.error().unwrap_or("unknown_error").to_string(),
            });
        }
        Ok(resp)
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }
}

async fn read_body(method: &str, res: reqwest::Response) -> Result<Value, SlackError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        error!("Slack {} failed: {} - {}", method, status, body);
        return Err(SlackError::Http {
            method: method.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    res.json::<Value>()
        .await
        .map_err(|e| SlackError::MalformedResponse {
            method: method.to_string(),
            reason: e.to_string(),
        })
}

fn find_channel(channels: &[Value], channel_name: &str) -> Option<SlackChannel> {
    channels
        .iter()
        .filter_map(|c| serde_json::from_value::<SlackChannel>(c.clone()).ok())
        .find(|c| c.name == channel_name)
}

fn next_cursor(page: &Value) -> Option<String> {
    page.get("response_metadata")
        .and_then(|m| m.get("next_cursor"))
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}
