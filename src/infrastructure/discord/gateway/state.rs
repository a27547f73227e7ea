use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    AwaitingHello,
    Identifying,
    Resuming,
    Ready,
    Reconnecting,
}

impl ConnectionState {
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Disconnected)
    }

    #[must_use]
    pub const fn is_handshaking(&self) -> bool {
        matches!(
            self,
            Self::AwaitingHello | Self::Identifying | Self::Resuming
        )
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::AwaitingHello => write!(f, "Waiting for Hello"),
            Self::Identifying => write!(f, "Identifying"),
            Self::Resuming => write!(f, "Resuming"),
            Self::Ready => write!(f, "Ready"),
            Self::Reconnecting => write!(f, "Reconnecting"),
        }
    }
}

/// Connection phase plus heartbeat round-trip bookkeeping.
#[derive(Debug, Default)]
pub struct GatewayState {
    connection: ConnectionState,
    last_heartbeat_sent: Option<Instant>,
    latency: Option<Duration>,
}

impl GatewayState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            connection: ConnectionState::Disconnected,
            last_heartbeat_sent: None,
            latency: None,
        }
    }

    #[must_use]
    pub const fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn transition_to(&mut self, state: ConnectionState) {
        self.connection = state;
        if state == ConnectionState::Disconnected {
            self.last_heartbeat_sent = None;
            self.latency = None;
        }
    }

    pub fn record_heartbeat_sent(&mut self) {
        self.last_heartbeat_sent = Some(Instant::now());
    }

    pub fn record_heartbeat_ack(&mut self) {
        if let Some(sent) = self.last_heartbeat_sent.take() {
            self.latency = Some(sent.elapsed());
        }
    }

    #[must_use]
    pub const fn latency(&self) -> Option<Duration> {
        self.latency
    }
}
