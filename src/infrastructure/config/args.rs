use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::app_config::LogLevel;
use crate::application::{DiscordScreen, PlayerData};

#[derive(Debug, Parser)]
#[command(
    name = "presence-gateway",
    version,
    about = "Publishes Discord rich presence over the gateway",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Discord token, used when none is stored in the keyring.
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate the `--token` value and store it in the system keyring.
    Login,

    /// Delete the stored token.
    Logout,

    /// Show an app screen until interrupted.
    Screen {
        #[arg(value_parser = parse_screen)]
        screen: DiscordScreen,
    },

    /// Show video playback until interrupted.
    Watch {
        #[arg(long)]
        title: String,

        #[arg(long)]
        episode: Option<String>,

        /// Large image URL.
        #[arg(long, value_name = "URL")]
        thumbnail: Option<String>,

        /// Hide the title and show the generic video screen.
        #[arg(long)]
        incognito: bool,
    },
}

impl Command {
    /// Player state described by a `watch` invocation.
    #[must_use]
    pub fn player_data(&self) -> Option<PlayerData> {
        match self {
            Self::Watch {
                title,
                episode,
                thumbnail,
                incognito,
            } => Some(PlayerData {
                incognito_mode: *incognito,
                anime_id: None,
                anime_title: Some(title.clone()),
                episode_number: episode.clone(),
                thumbnail_url: thumbnail.clone(),
            }),
            _ => None,
        }
    }
}

fn parse_screen(value: &str) -> Result<DiscordScreen, String> {
    DiscordScreen::parse(value).ok_or_else(|| {
        let known: Vec<String> = DiscordScreen::ALL
            .iter()
            .map(|s| format!("{s:?}").to_lowercase())
            .collect();
        format!("unknown screen '{value}', expected one of: {}", known.join(", "))
    })
}
