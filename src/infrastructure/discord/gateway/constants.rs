use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const GATEWAY_URL: &str = "wss://gateway.discord.gg/?v=10&encoding=json";
pub const GATEWAY_QUERY: &str = "/?v=10&encoding=json";

/// Close code sent when the gateway asked us to reconnect; a transport closed
/// with this code is reopened and resumed.
pub const RECONNECT_CLOSE_CODE: u16 = 4000;
pub const RECONNECT_CLOSE_REASON: &str = "Attempting to reconnect";

pub const RECONNECT_DELAY: Duration = Duration::from_millis(200);
pub const INVALID_SESSION_DELAY: Duration = Duration::from_millis(150);

pub const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

pub const CLIENT_PROPERTIES_OS: &str = "Windows";
pub const CLIENT_PROPERTIES_BROWSER: &str = "Chrome";
pub const CLIENT_PROPERTIES_DEVICE: &str = "disco";

pub const DEFAULT_INTENTS: u32 = 0;

pub const OUTBOUND_QUEUE_SIZE: usize = 32;

/// Gateway operation codes.
///
/// Codes the client does not know decode to [`OperationCode::Unknown`] with the
/// raw value preserved, so an unexpected opcode never fails a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum OperationCode {
    Dispatch,
    Heartbeat,
    Identify,
    PresenceUpdate,
    VoiceState,
    Resume,
    Reconnect,
    RequestGuildMembers,
    InvalidSession,
    Hello,
    HeartbeatAck,
    Unknown(i64),
}

impl OperationCode {
    #[must_use]
    pub const fn from_i64(value: i64) -> Self {
        match value {
            0 => Self::Dispatch,
            1 => Self::Heartbeat,
            2 => Self::Identify,
            3 => Self::PresenceUpdate,
            4 => Self::VoiceState,
            6 => Self::Resume,
            7 => Self::Reconnect,
            8 => Self::RequestGuildMembers,
            9 => Self::InvalidSession,
            10 => Self::Hello,
            11 => Self::HeartbeatAck,
            other => Self::Unknown(other),
        }
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::Dispatch => 0,
            Self::Heartbeat => 1,
            Self::Identify => 2,
            Self::PresenceUpdate => 3,
            Self::VoiceState => 4,
            Self::Resume => 6,
            Self::Reconnect => 7,
            Self::RequestGuildMembers => 8,
            Self::InvalidSession => 9,
            Self::Hello => 10,
            Self::HeartbeatAck => 11,
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<i64> for OperationCode {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<OperationCode> for i64 {
    fn from(opcode: OperationCode) -> Self {
        opcode.as_i64()
    }
}

impl std::fmt::Display for OperationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dispatch => write!(f, "DISPATCH"),
            Self::Heartbeat => write!(f, "HEARTBEAT"),
            Self::Identify => write!(f, "IDENTIFY"),
            Self::PresenceUpdate => write!(f, "PRESENCE_UPDATE"),
            Self::VoiceState => write!(f, "VOICE_STATE"),
            Self::Resume => write!(f, "RESUME"),
            Self::Reconnect => write!(f, "RECONNECT"),
            Self::RequestGuildMembers => write!(f, "REQUEST_GUILD_MEMBERS"),
            Self::InvalidSession => write!(f, "INVALID_SESSION"),
            Self::Hello => write!(f, "HELLO"),
            Self::HeartbeatAck => write!(f, "HEARTBEAT_ACK"),
            Self::Unknown(raw) => write!(f, "UNKNOWN({raw})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, OperationCode::Dispatch ; "dispatch")]
    #[test_case(1, OperationCode::Heartbeat ; "heartbeat")]
    #[test_case(2, OperationCode::Identify ; "identify")]
    #[test_case(3, OperationCode::PresenceUpdate ; "presence_update")]
    #[test_case(6, OperationCode::Resume ; "resume")]
    #[test_case(7, OperationCode::Reconnect ; "reconnect")]
    #[test_case(9, OperationCode::InvalidSession ; "invalid_session")]
    #[test_case(10, OperationCode::Hello ; "hello")]
    #[test_case(11, OperationCode::HeartbeatAck ; "heartbeat_ack")]
    fn test_opcode_mapping(raw: i64, expected: OperationCode) {
        assert_eq!(OperationCode::from_i64(raw), expected);
        assert_eq!(expected.as_i64(), raw);
    }

    #[test_case(5 ; "gap")]
    #[test_case(14 ; "lazy_request")]
    #[test_case(-1 ; "negative")]
    fn test_unknown_opcode_keeps_raw_value(raw: i64) {
        let opcode = OperationCode::from_i64(raw);
        assert_eq!(opcode, OperationCode::Unknown(raw));
        assert_eq!(opcode.as_i64(), raw);
    }

    #[test]
    fn test_unknown_opcode_deserializes() {
        let opcode: OperationCode = serde_json::from_str("42").unwrap();
        assert_eq!(opcode, OperationCode::Unknown(42));
        assert_eq!(serde_json::to_string(&OperationCode::Hello).unwrap(), "10");
    }
}
