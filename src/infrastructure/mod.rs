//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Discord gateway client.
pub mod discord;
/// Token storage adapters.
pub mod storage;

pub use config::{AppConfig, CliArgs, Command, ConfigError, LogLevel, StorageManager};
pub use discord::{GatewayClient, GatewayClientConfig};
pub use storage::KeyringTokenStorage;
