use anyhow::{anyhow, Result};
use tracing::{error, info, warn};

use crate::action::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::config::{load_slack_config_with_env, EnvironmentProvider};
use crate::error::SlackError;
use crate::output::GithubOutput;
use crate::slack::SlackClient;

/// Run the Slack reporter against `env` and return the process exit code.
pub async fn run_with_env<E: EnvironmentProvider>(env: &E) -> i32 {
    match execute(env).await {
        Ok(()) => {
            info!("🎉 Slack Reporter action completed successfully!");
            EXIT_SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<SlackError>() {
                Some(SlackError::MissingToken) => {
                    error!("❌ SLACK_BOT_TOKEN environment variable is required")
                }
                _ => error!("❌ {:#}", e),
            }
            EXIT_FAILURE
        }
    }
}

pub async fn execute<E: EnvironmentProvider>(env: &E) -> Result<()> {
    let cfg = load_slack_config_with_env(env);

    let message = cfg
        .message
        .as_deref()
        .ok_or_else(|| anyhow!("Message is required but not provided"))?;

    info!("Initializing Slack client...");
    let client = SlackClient::new(&cfg.base_url, cfg.token.as_deref())?;

    let channel_name = cfg.channel_name.as_deref().unwrap_or_default();
    info!("Sending message to channel: {}", channel_name);
    let response = client
        .send_message(channel_name, message, cfg.thread_ts.as_deref())
        .await?
        .ok_or_else(|| anyhow!("Failed to send message: No response"))?;

    let message_ts = response.ts();
    let channel_id = response.channel();
    info!(
        "✅ Message sent successfully! Timestamp: {}",
        message_ts.unwrap_or("None")
    );

    if cfg.add_reaction {
        if let (Some(ts), Some(channel)) = (message_ts, channel_id) {
            info!("Adding reaction: {}", cfg.reaction_emoji);
            match client
                .add_reaction_to_thread_by_channel_id(channel, &cfg.reaction_emoji, ts)
                .await
            {
                Some(_) => info!("✅ Reaction added successfully!"),
                None => warn!("Failed to add reaction, see the error above"),
            }
        }
    }

    // outputs come as a pair or not at all
    if let (Some(ts), Some(channel)) = (message_ts, channel_id) {
        let output = GithubOutput::from_env(env);
        output.set("message-ts", ts)?;
        output.set("channel-id", channel)?;
    } else {
        warn!("Slack response is missing ts or channel, no outputs written");
    }
    Ok(())
}
