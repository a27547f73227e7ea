use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::constants::OperationCode;
use crate::domain::entities::Presence;

/// Outbound gateway envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayPayload {
    pub op: OperationCode,
    pub d: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

impl GatewayPayload {
    fn new(op: OperationCode, d: Value) -> Self {
        Self {
            op,
            d,
            s: None,
            t: None,
        }
    }

    /// Heartbeat carrying the last sequence, or `null` before any was seen.
    #[must_use]
    pub fn heartbeat(sequence: u64) -> Self {
        let d = if sequence == 0 {
            Value::Null
        } else {
            Value::Number(sequence.into())
        };
        Self::new(OperationCode::Heartbeat, d)
    }

    #[must_use]
    pub fn identify(token: &str, properties: &IdentifyProperties, intents: u32) -> Self {
        let identify = IdentifyData {
            token,
            properties,
            compress: false,
            intents,
        };

        Self::new(
            OperationCode::Identify,
            serde_json::to_value(identify).unwrap_or(Value::Null),
        )
    }

    #[must_use]
    pub fn resume(token: &str, session_id: &str, sequence: u64) -> Self {
        let resume = ResumeData {
            token,
            session_id,
            seq: sequence,
        };

        Self::new(
            OperationCode::Resume,
            serde_json::to_value(resume).unwrap_or(Value::Null),
        )
    }

    #[must_use]
    pub fn presence_update(presence: &Presence) -> Self {
        Self::new(
            OperationCode::PresenceUpdate,
            serde_json::to_value(presence).unwrap_or(Value::Null),
        )
    }
}

/// Client properties announced in IDENTIFY.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyProperties {
    pub os: String,
    pub browser: String,
    pub device: String,
}

#[derive(Debug, Serialize)]
struct IdentifyData<'a> {
    token: &'a str,
    properties: &'a IdentifyProperties,
    compress: bool,
    intents: u32,
}

#[derive(Debug, Serialize)]
struct ResumeData<'a> {
    token: &'a str,
    session_id: &'a str,
    seq: u64,
}

/// Inbound gateway envelope.
#[derive(Debug, Deserialize)]
pub struct GatewayMessage {
    pub op: OperationCode,
    #[serde(default)]
    pub d: Option<Value>,
    #[serde(default)]
    pub s: Option<u64>,
    #[serde(default)]
    pub t: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HelloPayload {
    pub heartbeat_interval: u64,
}

#[derive(Debug, Deserialize)]
pub struct ReadyPayload {
    pub session_id: String,
    pub resume_gateway_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Activity, PresenceStatus};
    use serde_json::json;

    fn properties() -> IdentifyProperties {
        IdentifyProperties {
            os: "Windows".into(),
            browser: "Chrome".into(),
            device: "disco".into(),
        }
    }

    #[test]
    fn test_heartbeat_payload() {
        let payload = GatewayPayload::heartbeat(42);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"op": 1, "d": 42})
        );
    }

    #[test]
    fn test_heartbeat_without_sequence_is_null() {
        let payload = GatewayPayload::heartbeat(0);
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"op":1,"d":null}"#
        );
    }

    #[test]
    fn test_identify_payload_structure() {
        let payload = GatewayPayload::identify("test_token", &properties(), 0);
        assert_eq!(payload.op, OperationCode::Identify);
        assert_eq!(
            payload.d,
            json!({
                "token": "test_token",
                "properties": {"os": "Windows", "browser": "Chrome", "device": "disco"},
                "compress": false,
                "intents": 0
            })
        );
    }

    #[test]
    fn test_resume_payload() {
        let payload = GatewayPayload::resume("token", "session123", 100);
        assert_eq!(payload.op, OperationCode::Resume);
        assert_eq!(
            payload.d,
            json!({"token": "token", "session_id": "session123", "seq": 100})
        );
    }

    #[test]
    fn test_presence_update_payload() {
        let presence = Presence::with_activity(Activity {
            name: Some("Library".into()),
            ..Activity::default()
        })
        .status(PresenceStatus::Idle);

        let value = serde_json::to_value(GatewayPayload::presence_update(&presence)).unwrap();
        assert_eq!(value["op"], json!(3));
        assert_eq!(value["d"]["status"], json!("idle"));
        assert_eq!(value["d"]["afk"], json!(true));
        assert_eq!(value["d"]["activities"][0]["name"], json!("Library"));
    }

    #[test]
    fn test_message_without_optional_fields() {
        let message: GatewayMessage = serde_json::from_str(r#"{"op":11}"#).unwrap();
        assert_eq!(message.op, OperationCode::HeartbeatAck);
        assert!(message.d.is_none());
        assert!(message.s.is_none());
        assert!(message.t.is_none());
    }
}
