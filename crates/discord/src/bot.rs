//! Gateway client construction and startup.

use {secrecy::ExposeSecret, serenity::Client, tracing::info};

use {courier_chat::ChatRuntime, courier_config::CourierConfig};

use crate::{error::Result, handler::DiscordHandler};

/// Run the Discord adapter. Stays connected to the gateway until the
/// process is terminated; serenity reconnects on transient drops.
pub async fn run(config: &CourierConfig, runtime: ChatRuntime) -> Result<()> {
    let handler = DiscordHandler {
        runtime,
        data_dir: config.data_dir.clone(),
    };

    let mut client = Client::builder(
        config.discord.token.expose_secret(),
        DiscordHandler::intents(),
    )
    .event_handler(handler)
    .await?;

    info!("discord client built, connecting to gateway");
    client.start().await?;
    Ok(())
}
