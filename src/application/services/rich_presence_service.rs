//! Publishes the current screen or playback state through a presence port.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::presence_builder::{DiscordScreen, PlayerData, PresenceBuilder};
use crate::domain::entities::Presence;
use crate::domain::ports::PresencePort;

pub struct RichPresenceService {
    port: Arc<dyn PresencePort>,
    builder: PresenceBuilder,
    started_at: i64,
}

impl RichPresenceService {
    #[must_use]
    pub fn new(port: Arc<dyn PresencePort>, builder: PresenceBuilder) -> Self {
        Self::with_start(port, builder, Utc::now().timestamp_millis())
    }

    /// Uses a fixed activity start time (unix ms).
    #[must_use]
    pub const fn with_start(
        port: Arc<dyn PresencePort>,
        builder: PresenceBuilder,
        started_at: i64,
    ) -> Self {
        Self {
            port,
            builder,
            started_at,
        }
    }

    pub fn start(&self) {
        info!("Starting rich presence");
        self.port.connect();
    }

    pub async fn set_screen(&self, screen: DiscordScreen) -> Presence {
        debug!(%screen, "Updating screen presence");
        let presence = self.builder.screen(screen, self.started_at);
        self.port.send_activity(&presence).await;
        presence
    }

    pub async fn set_player(&self, player: &PlayerData) -> Presence {
        debug!(
            incognito = player.incognito_mode,
            anime_id = ?player.anime_id,
            "Updating player presence"
        );
        let presence = self.builder.player(player, self.started_at);
        self.port.send_activity(&presence).await;
        presence
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.port.is_connected()
    }

    pub fn stop(&self) {
        info!("Stopping rich presence");
        self.port.close();
    }
}
