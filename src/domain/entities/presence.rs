//! Rich presence value objects sent with a presence update.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// User presence broadcast to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    /// Activities shown on the profile, most relevant first.
    #[serde(default)]
    pub activities: Vec<Activity>,
    /// Whether the client is away from keyboard.
    #[serde(default = "default_afk")]
    pub afk: bool,
    /// Unix time in milliseconds since the client went idle.
    #[serde(default)]
    pub since: Option<i64>,
    /// Online status.
    #[serde(default)]
    pub status: Option<PresenceStatus>,
}

const fn default_afk() -> bool {
    true
}

impl Default for Presence {
    fn default() -> Self {
        Self {
            activities: Vec::new(),
            afk: default_afk(),
            since: None,
            status: None,
        }
    }
}

impl Presence {
    /// Creates a presence showing a single activity.
    #[must_use]
    pub fn with_activity(activity: Activity) -> Self {
        Self {
            activities: vec![activity],
            ..Self::default()
        }
    }

    /// Sets the away flag.
    #[must_use]
    pub const fn afk(mut self, afk: bool) -> Self {
        self.afk = afk;
        self
    }

    /// Sets the idle-since timestamp.
    #[must_use]
    pub const fn since(mut self, since: Option<i64>) -> Self {
        self.since = since;
        self
    }

    /// Sets the online status.
    #[must_use]
    pub const fn status(mut self, status: PresenceStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// A single rich presence activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub application_id: Option<String>,
    pub name: Option<String>,
    pub details: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ActivityKind>,
    pub timestamps: Option<Timestamps>,
    pub assets: Option<Assets>,
    pub buttons: Option<Vec<String>>,
    pub metadata: Option<Metadata>,
}

/// Start and end of an activity, unix milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub start: Option<i64>,
    pub stop: Option<i64>,
}

/// Images and hover texts of an activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assets {
    pub large_image: Option<String>,
    pub large_text: Option<String>,
    pub small_image: Option<String>,
    pub small_text: Option<String>,
}

/// Button targets, index-aligned with [`Activity::buttons`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub button_urls: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum ActivityKind {
    #[default]
    Playing = 0,
    Streaming = 1,
    Listening = 2,
    Watching = 3,
    Custom = 4,
    Competing = 5,
}

impl ActivityKind {
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Playing => "Playing",
            Self::Streaming => "Streaming",
            Self::Listening => "Listening to",
            Self::Watching => "Watching",
            Self::Custom => "",
            Self::Competing => "Competing in",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    #[default]
    Online,
    Idle,
    #[serde(rename = "dnd")]
    DoNotDisturb,
    Invisible,
}

impl PresenceStatus {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "online" => Some(Self::Online),
            "idle" => Some(Self::Idle),
            "dnd" | "do_not_disturb" => Some(Self::DoNotDisturb),
            "invisible" => Some(Self::Invisible),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Idle => "idle",
            Self::DoNotDisturb => "dnd",
            Self::Invisible => "invisible",
        }
    }
}

impl std::fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
