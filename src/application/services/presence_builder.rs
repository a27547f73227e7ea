//! Builds rich presence payloads for the app screens and the video player.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    Activity, ActivityKind, Assets, Metadata, Presence, PresenceStatus, Timestamps,
};

const MEDIA_PROXY_PREFIX: &str = "mp:";

pub const DEFAULT_APPLICATION_ID: &str = "952899285983326208";
pub const DEFAULT_APP_NAME: &str = "Animiru";

/// In-app screens that have a dedicated presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscordScreen {
    App,
    Library,
    Updates,
    History,
    Browse,
    More,
    WebView,
    Video,
}

impl DiscordScreen {
    pub const ALL: [Self; 8] = [
        Self::App,
        Self::Library,
        Self::Updates,
        Self::History,
        Self::Browse,
        Self::More,
        Self::WebView,
        Self::Video,
    ];

    /// Parses a screen name as accepted on the command line.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "app" => Some(Self::App),
            "library" => Some(Self::Library),
            "updates" => Some(Self::Updates),
            "history" => Some(Self::History),
            "browse" => Some(Self::Browse),
            "more" | "settings" => Some(Self::More),
            "webview" => Some(Self::WebView),
            "video" => Some(Self::Video),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::App => DEFAULT_APP_NAME,
            Self::Library => "Library",
            Self::Updates => "Recent updates",
            Self::History => "History",
            Self::Browse => "Sources",
            Self::More => "Settings",
            Self::WebView => "WebView",
            Self::Video => "Video",
        }
    }

    /// Verb shown as the activity details line.
    #[must_use]
    pub const fn details(self) -> &'static str {
        match self {
            Self::App | Self::Library | Self::Browse | Self::WebView => "Browsing",
            Self::Updates | Self::History => "Scrolling",
            Self::More => "Messing around",
            Self::Video => "Watching",
        }
    }

    /// Media proxy path of the screen artwork.
    #[must_use]
    pub fn image(self) -> String {
        let attachment = match self {
            Self::App => "951705840031780865/1005845418405535784/Animiru.png",
            Self::Library => "951705840031780865/1006843591777341520/library.png",
            Self::Updates => "951705840031780865/1006843592339365888/updates.png",
            Self::History => "951705840031780865/1006843591299178588/history.png",
            Self::Browse => "951705840031780865/1006843590980415518/browse.png",
            Self::More => "951705840031780865/1006843592045760533/more.png",
            Self::WebView => "951705840031780865/1006843593467629568/webview.png",
            Self::Video => "951705840031780865/1006843592637169714/video.png",
        };
        format!("{MEDIA_PROXY_PREFIX}attachments/{attachment}")
    }

    #[must_use]
    pub const fn activity_kind(self) -> ActivityKind {
        match self {
            Self::Video => ActivityKind::Watching,
            _ => ActivityKind::Playing,
        }
    }
}

impl std::fmt::Display for DiscordScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What the video player is currently showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerData {
    pub incognito_mode: bool,
    pub anime_id: Option<i64>,
    pub anime_title: Option<String>,
    pub episode_number: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// Static parts of every presence this application publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RichPresenceConfig {
    pub application_id: String,
    pub app_name: String,
    pub buttons: Vec<String>,
    pub button_urls: Vec<String>,
    pub status: PresenceStatus,
    pub afk: bool,
    pub show_thumbnails: bool,
}

impl Default for RichPresenceConfig {
    fn default() -> Self {
        Self {
            application_id: DEFAULT_APPLICATION_ID.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            buttons: vec!["Get the app!".to_string(), "Join the Discord!".to_string()],
            button_urls: vec![
                "https://github.com/Quickdesh/Animiru".to_string(),
                "https://discord.gg/yDuHDMwxhv".to_string(),
            ],
            status: PresenceStatus::Online,
            afk: false,
            show_thumbnails: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PresenceBuilder {
    config: RichPresenceConfig,
}

impl PresenceBuilder {
    #[must_use]
    pub const fn new(config: RichPresenceConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &RichPresenceConfig {
        &self.config
    }

    /// Presence for an app screen, timed from `since` (unix ms).
    #[must_use]
    pub fn screen(&self, screen: DiscordScreen, since: i64) -> Presence {
        let activity = Activity {
            details: Some(screen.details().to_string()),
            state: Some(screen.label().to_string()),
            kind: Some(screen.activity_kind()),
            assets: Some(Assets {
                large_image: Some(screen.image()),
                large_text: Some(screen.label().to_string()),
                small_image: Some(DiscordScreen::App.image()),
                small_text: Some(self.config.app_name.clone()),
            }),
            ..self.base_activity(since)
        };

        self.presence(activity)
    }

    /// Presence for the video player. Incognito playback or an unknown title
    /// is shown as the generic video screen.
    #[must_use]
    pub fn player(&self, player: &PlayerData, since: i64) -> Presence {
        let title = match player.anime_title.as_deref().map(str::trim) {
            Some(title) if !player.incognito_mode && !title.is_empty() => title,
            _ => return self.screen(DiscordScreen::Video, since),
        };

        let large_image = player
            .thumbnail_url
            .as_ref()
            .filter(|_| self.config.show_thumbnails)
            .cloned()
            .unwrap_or_else(|| DiscordScreen::Video.image());

        let activity = Activity {
            details: Some(title.to_string()),
            state: player
                .episode_number
                .as_deref()
                .map(|episode| format!("Episode {episode}")),
            kind: Some(ActivityKind::Watching),
            assets: Some(Assets {
                large_image: Some(large_image),
                large_text: Some(title.to_string()),
                small_image: Some(DiscordScreen::Video.image()),
                small_text: Some(DiscordScreen::Video.details().to_string()),
            }),
            ..self.base_activity(since)
        };

        self.presence(activity)
    }

    fn base_activity(&self, since: i64) -> Activity {
        let (buttons, metadata) = if self.config.buttons.is_empty() {
            (None, None)
        } else {
            let count = self.config.buttons.len().min(self.config.button_urls.len());
            (
                Some(self.config.buttons[..count].to_vec()),
                Some(Metadata {
                    button_urls: self.config.button_urls[..count].to_vec(),
                }),
            )
        };

        Activity {
            application_id: Some(self.config.application_id.clone()),
            name: Some(self.config.app_name.clone()),
            timestamps: Some(Timestamps {
                start: Some(since),
                stop: None,
            }),
            buttons,
            metadata,
            ..Activity::default()
        }
    }

    fn presence(&self, activity: Activity) -> Presence {
        Presence::with_activity(activity)
            .afk(self.config.afk)
            .status(self.config.status)
    }
}
