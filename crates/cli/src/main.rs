use std::path::PathBuf;

use {
    clap::Parser,
    secrecy::ExposeSecret,
    tracing::info,
    tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter},
};

use courier_chat::{ChatRuntime, Dispatcher};

#[derive(Parser)]
#[command(name = "courier", about = "courier — chat-to-LLM message-relay bridge")]
struct Cli {
    /// Config file path (default: ./courier.toml, then ~/.config/courier/).
    #[arg(long, env = "COURIER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.json_logs);

    let config = courier_config::discover_and_load(cli.config.as_deref())?;
    std::fs::create_dir_all(&config.data_dir)?;

    let backend = courier_providers::build_backend(&config)?;
    info!(
        backend = backend.name(),
        model = backend.model(),
        data_dir = %config.data_dir.display(),
        "courier starting"
    );

    let dispatcher = Dispatcher::new(backend, &config);
    let runtime = ChatRuntime::new(dispatcher, config.max_concurrent_requests);

    let telegram_enabled = !config.telegram.token.expose_secret().is_empty();
    let discord_enabled = !config.discord.token.expose_secret().is_empty();
    anyhow::ensure!(
        telegram_enabled || discord_enabled,
        "no chat platform configured: set telegram.token and/or discord.token"
    );

    info!(
        telegram = telegram_enabled,
        discord = discord_enabled,
        "starting platform adapters"
    );

    let mut adapters = tokio::task::JoinSet::new();
    if telegram_enabled {
        let config = config.clone();
        let runtime = runtime.clone();
        adapters.spawn(async move {
            courier_telegram::run(&config, runtime)
                .await
                .map_err(anyhow::Error::from)
        });
    }
    if discord_enabled {
        let config = config.clone();
        let runtime = runtime.clone();
        adapters.spawn(async move {
            courier_discord::run(&config, runtime)
                .await
                .map_err(anyhow::Error::from)
        });
    }

    // Adapters run until the process is terminated, so any return is a
    // failure worth surfacing.
    while let Some(joined) = adapters.join_next().await {
        joined??;
    }
    Ok(())
}
