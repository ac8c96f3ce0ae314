//! Outbound message delivery with formatted → plain-text fallback.

use {
    teloxide::{
        payloads::EditMessageTextSetters,
        prelude::*,
        types::{ChatId, MessageId, ParseMode},
    },
    tracing::{debug, warn},
};

use crate::{error::Result, markdown::escape_markdown};

/// Replace a placeholder message with the final reply.
///
/// Tries a MarkdownV2-escaped edit first; if Telegram rejects the markup
/// the same content is re-sent as plain text. The underlying text is never
/// lost — worst case the user sees it unformatted.
pub async fn edit_with_fallback(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    text: &str,
) -> Result<()> {
    let escaped = escape_markdown(text);
    match bot
        .edit_message_text(chat_id, message_id, escaped)
        .parse_mode(ParseMode::MarkdownV2)
        .await
    {
        Ok(_) => {
            debug!(chat_id = chat_id.0, "markdown message sent");
            Ok(())
        },
        Err(e) => {
            warn!(chat_id = chat_id.0, error = %e, "markdown edit rejected, retrying as plain text");
            bot.edit_message_text(chat_id, message_id, text).await?;
            debug!(chat_id = chat_id.0, "plain text message sent");
            Ok(())
        },
    }
}
