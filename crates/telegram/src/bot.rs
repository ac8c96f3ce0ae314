//! Bot construction and the long-polling loop.

use std::time::Duration;

use {
    secrecy::ExposeSecret,
    teloxide::{
        prelude::*,
        types::{AllowedUpdate, UpdateKind},
    },
    tracing::{debug, error, info, warn},
};

use {courier_chat::ChatRuntime, courier_config::CourierConfig};

use crate::{
    error::{Error, Result},
    handlers,
    state::AdapterContext,
};

/// Build a bot whose HTTP client outlives the long-polling timeout (30s),
/// so the client doesn't abort the request before Telegram responds.
///
/// teloxide bundles its own reqwest, so its builder error is not this
/// crate's `reqwest::Error`; map it through a message instead.
fn connect(token: &str) -> Result<Bot> {
    let client = teloxide::net::default_reqwest_settings()
        .timeout(Duration::from_secs(45))
        .build()
        .map_err(|e| Error::message(format!("telegram http client: {e}")))?;
    Ok(Bot::with_client(token, client))
}

/// Run the Telegram adapter. Polls until the process is terminated.
///
/// Each inbound message is handled in its own task, so replies may arrive
/// out of order when backend latency varies; the chat runtime bounds how
/// many backend calls are in flight.
pub async fn run(config: &CourierConfig, runtime: ChatRuntime) -> Result<()> {
    let bot = connect(config.telegram.token.expose_secret())?;

    // Verify credentials, and clear any webhook so long polling works.
    let me = bot.get_me().await?;
    bot.delete_webhook().send().await?;
    info!(username = ?me.username, "telegram bot connected (webhook cleared)");

    let ctx = AdapterContext {
        runtime,
        data_dir: config.data_dir.clone(),
    };

    let mut offset: i32 = 0;
    loop {
        let result = bot
            .get_updates()
            .offset(offset)
            .timeout(30)
            .allowed_updates(vec![AllowedUpdate::Message])
            .await;

        match result {
            Ok(updates) => {
                debug!(count = updates.len(), "got telegram updates");
                for update in updates {
                    offset = update.id.as_offset();
                    if let UpdateKind::Message(msg) = update.kind {
                        let bot = bot.clone();
                        let ctx = ctx.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handlers::handle_message(msg, &bot, &ctx).await {
                                error!(error = %e, "error handling telegram message");
                            }
                        });
                    }
                }
            },
            Err(e) => {
                warn!(error = %e, "telegram get_updates failed, backing off");
                tokio::time::sleep(Duration::from_secs(2)).await;
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn connect_builds_bot_with_polling_client() {
        let bot = connect("123456:fake_token_for_unit_tests");
        assert!(bot.is_ok());
    }
}
