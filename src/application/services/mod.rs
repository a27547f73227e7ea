mod presence_builder;
mod rich_presence_service;

pub use presence_builder::{
    DEFAULT_APP_NAME, DEFAULT_APPLICATION_ID, DiscordScreen, PlayerData, PresenceBuilder,
    RichPresenceConfig,
};
pub use rich_presence_service::RichPresenceService;
