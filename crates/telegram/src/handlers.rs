//! Inbound message handlers: text and photo.

use std::{
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use {
    teloxide::{prelude::*, types::PhotoSize},
    tracing::{error, info, warn},
};

use crate::{
    error::{Error, Result},
    outbound::edit_with_fallback,
    state::AdapterContext,
};

/// Fixed reply when image retrieval or saving fails. The pipeline is not
/// invoked in that case.
pub const IMAGE_ERROR_REPLY: &str = "Image processing error.";

/// Handle a single inbound message (called from the polling loop).
///
/// Image failures are absorbed here and answered with the fixed reply so
/// they never terminate polling; only delivery errors propagate to the
/// loop's log.
pub async fn handle_message(msg: Message, bot: &Bot, ctx: &AdapterContext) -> Result<()> {
    if let Some(photos) = msg.photo().map(<[PhotoSize]>::to_vec) {
        if let Err(e) = handle_photo(bot, &msg, ctx, &photos).await {
            error!(chat_id = msg.chat.id.0, error = %e, "image handling failed");
            if let Err(send_err) = bot.send_message(msg.chat.id, IMAGE_ERROR_REPLY).await {
                warn!(error = %send_err, "failed to deliver image error reply");
            }
        }
    } else if let Some(text) = msg.text().map(str::to_string) {
        handle_text(bot, &msg, ctx, &text).await?;
    }
    Ok(())
}

async fn handle_text(bot: &Bot, msg: &Message, ctx: &AdapterContext, text: &str) -> Result<()> {
    info!(chat_id = msg.chat.id.0, chars = text.len(), "text received");

    let thinking = bot.send_message(msg.chat.id, "Thinking...").await?;
    let reply = ctx.runtime.run_llm(Some(text.to_string()), None).await;
    edit_with_fallback(bot, thinking.chat.id, thinking.id, &reply).await
}

async fn handle_photo(
    bot: &Bot,
    msg: &Message,
    ctx: &AdapterContext,
    photos: &[PhotoSize],
) -> Result<()> {
    // Sizes arrive smallest-first; take the best quality.
    let largest = photos
        .last()
        .ok_or_else(|| Error::message("photo message without sizes"))?;

    let path = download_photo(bot, &largest.file.id, &ctx.data_dir).await?;
    let caption = msg.caption().map(str::to_string);
    info!(
        chat_id = msg.chat.id.0,
        path = %path.display(),
        has_caption = caption.is_some(),
        "image received"
    );

    let thinking = bot.send_message(msg.chat.id, "Analyzing image...").await?;
    let reply = ctx.runtime.run_llm(caption, Some(path)).await;
    edit_with_fallback(bot, thinking.chat.id, thinking.id, &reply).await
}

/// Fetch a file from the Bot API and save it under the data directory.
async fn download_photo(bot: &Bot, file_id: &str, data_dir: &Path) -> Result<PathBuf> {
    let file = bot.get_file(file_id).await?;

    // Telegram file URL format: https://api.telegram.org/file/bot<token>/<file_path>
    let url = format!(
        "https://api.telegram.org/file/bot{}/{}",
        bot.token(),
        file.path
    );

    let response = reqwest::get(&url).await?;
    if !response.status().is_success() {
        return Err(Error::message(format!(
            "file download failed: HTTP {}",
            response.status()
        )));
    }
    let bytes = response.bytes().await?;

    let path = image_path(data_dir, unix_timestamp());
    tokio::fs::write(&path, &bytes).await?;
    Ok(path)
}

fn image_path(data_dir: &Path, timestamp: u64) -> PathBuf {
    data_dir.join(format!("image_{timestamp}.jpg"))
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
    fn image_path_is_timestamp_keyed() {
        assert_eq!(
            image_path(Path::new("data"), 1_700_000_000),
            PathBuf::from("data/image_1700000000.jpg")
        );
    }

    #[test]
    fn unix_timestamp_is_monotone_enough() {
        let a = unix_timestamp();
        let b = unix_timestamp();
        assert!(a > 1_600_000_000);
        assert!(b >= a);
    }
}
