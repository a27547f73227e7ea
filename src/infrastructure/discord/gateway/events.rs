/// Dispatch events the presence client reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    Ready {
        session_id: String,
        resume_gateway_url: String,
    },
    Resumed,
    Other {
        event_type: String,
    },
}

impl DispatchEvent {
    #[must_use]
    pub fn event_type(&self) -> &str {
        match self {
            Self::Ready { .. } => "READY",
            Self::Resumed => "RESUMED",
            Self::Other { event_type } => event_type,
        }
    }
}
