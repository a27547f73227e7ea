use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use presence_gateway::application::{
    LoginRequest, LoginUseCase, PresenceBuilder, ResolveTokenUseCase, RichPresenceService,
};
use presence_gateway::domain::TokenStoragePort;
use presence_gateway::infrastructure::{
    AppConfig, CliArgs, Command, GatewayClient, KeyringTokenStorage, StorageManager,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

async fn login(storage: Arc<dyn TokenStoragePort>, token: Option<String>) -> Result<()> {
    let token = token.ok_or_else(|| eyre!("pass --token or set DISCORD_TOKEN"))?;
    let response = LoginUseCase::new(storage)
        .execute(LoginRequest::new(token))
        .await?;

    println!("Stored token {}", response.token);
    Ok(())
}

async fn hold_presence(
    config: &AppConfig,
    storage: Arc<dyn TokenStoragePort>,
    cli_token: Option<String>,
    command: &Command,
) -> Result<()> {
    let resolved = ResolveTokenUseCase::new(storage)
        .execute(cli_token)
        .await
        .wrap_err("no usable token, run `presence-gateway login --token <TOKEN>` first")?;
    info!(source = %resolved.source, "Token resolved");

    let client = Arc::new(GatewayClient::new(
        resolved.token,
        config.gateway.client_config(),
    ));
    let service = RichPresenceService::new(client, PresenceBuilder::new(config.presence.clone()));
    service.start();

    let publish = async {
        if let Command::Screen { screen } = command {
            service.set_screen(*screen).await
        } else {
            let player = command.player_data().unwrap_or_default();
            service.set_player(&player).await
        }
    };

    tokio::select! {
        presence = publish => {
            let activity = presence.activities.first();
            info!(
                details = ?activity.and_then(|a| a.details.as_deref()),
                state = ?activity.and_then(|a| a.state.as_deref()),
                "Presence published, press Ctrl-C to stop"
            );
            signal::ctrl_c().await?;
        }
        result = signal::ctrl_c() => {
            result?;
            warn!("Interrupted before the gateway session was ready");
        }
    }

    service.stop();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = presence_gateway::VERSION, "Starting presence-gateway");

    let storage: Arc<dyn TokenStoragePort> = Arc::new(KeyringTokenStorage::new());

    match &args.command {
        Command::Login => login(storage, args.token.clone()).await,
        Command::Logout => {
            LoginUseCase::new(storage).delete_token().await?;
            println!("Stored token deleted");
            Ok(())
        }
        command @ (Command::Screen { .. } | Command::Watch { .. }) => {
            hold_presence(&config, storage, args.token.clone(), command).await
        }
    }
}
