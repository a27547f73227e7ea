//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::args::CliArgs;
use crate::application::RichPresenceConfig;
use crate::infrastructure::discord::gateway::{
    GATEWAY_URL, GatewayClientConfig, IdentifyProperties,
};

pub(crate) const APP_NAME: &str = "presence-gateway";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, `config.toml` merged with CLI flags.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Gateway connection settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Rich presence content.
    #[serde(default)]
    pub presence: RichPresenceConfig,
}

/// Gateway connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Gateway URL for fresh sessions.
    pub url: String,

    /// Client properties sent with IDENTIFY.
    pub os: String,
    pub browser: String,
    pub device: String,

    /// Gateway intents bitfield.
    pub intents: u32,

    /// Delay before reconnecting after close code 4000.
    pub reconnect_delay_ms: u64,

    /// Delay before re-identifying after an invalid session.
    pub invalid_session_delay_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let client = GatewayClientConfig::default();
        Self {
            url: GATEWAY_URL.to_string(),
            os: client.properties.os,
            browser: client.properties.browser,
            device: client.properties.device,
            intents: client.intents,
            reconnect_delay_ms: duration_ms(client.reconnect_delay),
            invalid_session_delay_ms: duration_ms(client.invalid_session_delay),
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl GatewayConfig {
    /// Builds the gateway client settings.
    #[must_use]
    pub fn client_config(&self) -> GatewayClientConfig {
        GatewayClientConfig {
            gateway_url: self.url.clone(),
            properties: IdentifyProperties {
                os: self.os.clone(),
                browser: self.browser.clone(),
                device: self.device.clone(),
            },
            intents: self.intents,
            reconnect_delay: Duration::from_millis(self.reconnect_delay_ms),
            invalid_session_delay: Duration::from_millis(self.invalid_session_delay_ms),
        }
    }
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("presence-gateway.log"))
    }

    /// Returns effective config path.
    #[must_use]
    pub fn effective_config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Self::default_config_path)
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PresenceStatus;
    use clap::Parser;

    #[test]
    fn test_parse_config_sections() {
        let toml_content = r#"
            log_level = "debug"

            [gateway]
            url = "wss://gateway.example.org/?v=10&encoding=json"
            intents = 512
            reconnect_delay_ms = 500

            [presence]
            status = "dnd"
            show_thumbnails = false
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.gateway.intents, 512);
        assert_eq!(config.gateway.os, "Windows");
        assert_eq!(config.presence.status, PresenceStatus::DoNotDisturb);
        assert!(!config.presence.show_thumbnails);

        let client = config.gateway.client_config();
        assert_eq!(
            client.gateway_url,
            "wss://gateway.example.org/?v=10&encoding=json"
        );
        assert_eq!(client.reconnect_delay, Duration::from_millis(500));
        assert_eq!(client.invalid_session_delay, Duration::from_millis(150));
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.gateway.client_config().gateway_url, GATEWAY_URL);
        assert_eq!(config.gateway.reconnect_delay_ms, 200);
        assert_eq!(config.presence, RichPresenceConfig::default());
    }

    #[test]
    fn test_merge_with_args() {
        let args = CliArgs::parse_from([
            "presence-gateway",
            "--log-level",
            "trace",
            "--log-path",
            "/tmp/presence.log",
            "logout",
        ]);

        let mut config = AppConfig::default();
        config.merge_with_args(&args);

        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(
            config.effective_log_path(),
            Some(PathBuf::from("/tmp/presence.log"))
        );
        assert!(config.config.is_none());
    }
}
