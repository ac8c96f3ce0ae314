//! Gateway event handler: text messages and image attachments.

use std::{
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use {
    serenity::{
        all::{Attachment, Context, EditMessage, EventHandler, GatewayIntents, Message, Ready},
        async_trait,
    },
    tracing::{error, info, warn},
};

use courier_chat::ChatRuntime;

use crate::error::{Error, Result};

/// Fixed reply when handling a message fails after the placeholder was
/// posted. The placeholder is edited to this text.
pub const PROCESSING_ERROR_REPLY: &str = "Error processing request.";

/// Handler for Discord gateway events.
pub struct DiscordHandler {
    pub runtime: ChatRuntime,
    pub data_dir: PathBuf,
}

impl DiscordHandler {
    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }

    async fn relay(&self, ctx: &Context, msg: &Message) -> Result<()> {
        let mut thinking = msg.channel_id.say(&ctx.http, "Thinking...").await?;

        let reply = match self.prepare_input(msg).await {
            Ok((text, image)) => self.runtime.run_llm(text, image).await,
            Err(e) => {
                error!(channel_id = %msg.channel_id, error = %e, "input handling failed");
                PROCESSING_ERROR_REPLY.to_string()
            }
        };

        thinking
            .edit(&ctx.http, EditMessage::new().content(reply))
            .await?;
        Ok(())
    }

    /// Resolve the message into runtime input: text as-is, otherwise the
    /// first image attachment downloaded into the data directory. The
    /// runtime supplies the default prompt for uncaptioned images.
    async fn prepare_input(&self, msg: &Message) -> Result<(Option<String>, Option<PathBuf>)> {
        if !msg.content.is_empty() {
            return Ok((Some(msg.content.clone()), None));
        }
        let attachment = first_image(&msg.attachments)
            .ok_or_else(|| Error::message("message has no text and no image attachment"))?;
        let path = self.download_attachment(attachment).await?;
        Ok((None, Some(path)))
    }

    async fn download_attachment(&self, attachment: &Attachment) -> Result<PathBuf> {
        let response = reqwest::get(&attachment.url).await?;
        if !response.status().is_success() {
            return Err(Error::message(format!(
                "attachment download failed: HTTP {}",
                response.status()
            )));
        }
        let bytes = response.bytes().await?;

        let path = attachment_path(&self.data_dir, unix_timestamp());
        tokio::fs::write(&path, &bytes).await?;
        info!(path = %path.display(), bytes = bytes.len(), "attachment saved");
        Ok(path)
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            "discord gateway connected"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        if msg.content.is_empty() && msg.attachments.is_empty() {
            return;
        }
        info!(
            channel_id = %msg.channel_id,
            chars = msg.content.len(),
            attachments = msg.attachments.len(),
            "message received"
        );

        if let Err(e) = self.relay(&ctx, &msg).await {
            error!(channel_id = %msg.channel_id, error = %e, "message handling failed");
            if let Err(send_err) = msg.channel_id.say(&ctx.http, PROCESSING_ERROR_REPLY).await {
                warn!(error = %send_err, "failed to deliver error reply");
            }
        }
    }
}

fn first_image(attachments: &[Attachment]) -> Option<&Attachment> {
    attachments
        .iter()
        .find(|a| is_image(a.content_type.as_deref()))
}

fn is_image(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.starts_with("image"))
}

fn attachment_path(data_dir: &Path, timestamp: u64) -> PathBuf {
    data_dir.join(format!("discord_image_{timestamp}.jpg"))
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn image_content_types_are_recognized() {
        assert!(is_image(Some("image/jpeg")));
        assert!(is_image(Some("image/png")));
        assert!(!is_image(Some("video/mp4")));
        assert!(!is_image(Some("application/pdf")));
        assert!(!is_image(None));
    }

    #[test]
    fn attachment_path_is_timestamp_keyed() {
        assert_eq!(
            attachment_path(Path::new("data"), 1_700_000_000),
            PathBuf::from("data/discord_image_1700000000.jpg")
        );
    }

    #[test]
    fn intents_include_message_content() {
        let intents = DiscordHandler::intents();
        assert!(intents.contains(GatewayIntents::MESSAGE_CONTENT));
        assert!(intents.contains(GatewayIntents::DIRECT_MESSAGES));
    }
}
