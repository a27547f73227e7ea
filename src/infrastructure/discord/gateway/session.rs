use super::constants::GATEWAY_QUERY;

/// Resumable session bookkeeping for one gateway client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionInfo {
    sequence: u64,
    session_id: Option<String>,
    resume_gateway_url: Option<String>,
    heartbeat_interval_ms: Option<u64>,
}

impl SessionInfo {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sequence: 0,
            session_id: None,
            resume_gateway_url: None,
            heartbeat_interval_ms: None,
        }
    }

    /// Records the session from READY. The resume URL gets the same version
    /// and encoding query as the default gateway URL.
    pub fn set_session(&mut self, session_id: String, resume_url: &str) {
        let base = resume_url.trim_end_matches('/');
        self.session_id = Some(session_id);
        self.resume_gateway_url = Some(format!("{base}{GATEWAY_QUERY}"));
    }

    pub const fn update_sequence(&mut self, sequence: Option<u64>) {
        if let Some(seq) = sequence {
            self.sequence = seq;
        }
    }

    pub const fn set_heartbeat_interval(&mut self, interval_ms: u64) {
        self.heartbeat_interval_ms = Some(interval_ms);
    }

    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    #[must_use]
    pub fn resume_gateway_url(&self) -> Option<&str> {
        self.resume_gateway_url.as_deref()
    }

    #[must_use]
    pub const fn heartbeat_interval_ms(&self) -> Option<u64> {
        self.heartbeat_interval_ms
    }

    /// Resume needs both a sequence and a non-blank session id; otherwise the
    /// handshake falls back to IDENTIFY.
    #[must_use]
    pub fn can_resume(&self) -> bool {
        self.sequence > 0
            && self
                .session_id
                .as_deref()
                .is_some_and(|id| !id.trim().is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
