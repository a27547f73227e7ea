use serde_json::Value;

use super::error::{GatewayError, GatewayResult};
use super::events::DispatchEvent;
use super::payloads::{GatewayMessage, HelloPayload, ReadyPayload};

pub struct EventParser;

impl EventParser {
    pub fn parse_message(json: &str) -> GatewayResult<GatewayMessage> {
        serde_json::from_str(json).map_err(|e| GatewayError::serialization(e.to_string()))
    }

    pub fn parse_hello(data: Option<Value>) -> GatewayResult<HelloPayload> {
        let data = data.ok_or_else(|| GatewayError::protocol("Hello missing data"))?;
        serde_json::from_value(data)
            .map_err(|e| GatewayError::serialization(format!("Failed to parse Hello: {e}")))
    }

    /// Decodes the dispatch body for the events the client tracks; everything
    /// else is reported by name only and its body is never inspected.
    pub fn parse_dispatch(event_type: &str, data: Option<Value>) -> GatewayResult<DispatchEvent> {
        match event_type {
            "READY" => {
                let data = data.ok_or_else(|| GatewayError::protocol("Missing dispatch data"))?;
                let ready: ReadyPayload = serde_json::from_value(data).map_err(|e| {
                    GatewayError::serialization(format!("Failed to parse Ready: {e}"))
                })?;

                Ok(DispatchEvent::Ready {
                    session_id: ready.session_id,
                    resume_gateway_url: ready.resume_gateway_url,
                })
            }
            "RESUMED" => Ok(DispatchEvent::Resumed),
            _ => Ok(DispatchEvent::Other {
                event_type: event_type.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::discord::gateway::constants::OperationCode;
    use serde_json::json;

    #[test]
    fn test_parse_hello_message() {
        let message =
            EventParser::parse_message(r#"{"op":10,"d":{"heartbeat_interval":41250},"s":null,"t":null}"#)
                .unwrap();
        assert_eq!(message.op, OperationCode::Hello);

        let hello = EventParser::parse_hello(message.d).unwrap();
        assert_eq!(hello.heartbeat_interval, 41250);
    }

    #[test]
    fn test_parse_hello_without_data() {
        assert!(matches!(
            EventParser::parse_hello(None),
            Err(GatewayError::ProtocolError { .. })
        ));
    }

    #[test]
    fn test_parse_ready_ignores_extra_fields() {
        let data = json!({
            "v": 10,
            "session_id": "abc",
            "resume_gateway_url": "wss://x",
            "user": {"id": "1"},
            "guilds": []
        });

        let event = EventParser::parse_dispatch("READY", Some(data)).unwrap();
        assert_eq!(
            event,
            DispatchEvent::Ready {
                session_id: "abc".into(),
                resume_gateway_url: "wss://x".into(),
            }
        );
    }

    #[test]
    fn test_parse_ready_missing_session() {
        let result = EventParser::parse_dispatch("READY", Some(json!({"v": 10})));
        assert!(matches!(result, Err(GatewayError::SerializationError { .. })));
    }

    #[test]
    fn test_parse_other_dispatch_without_data() {
        let event = EventParser::parse_dispatch("MESSAGE_CREATE", None).unwrap();
        assert_eq!(event.event_type(), "MESSAGE_CREATE");
        assert_eq!(
            EventParser::parse_dispatch("RESUMED", None).unwrap(),
            DispatchEvent::Resumed
        );
    }

    #[test]
    fn test_parse_garbage_frame() {
        assert!(matches!(
            EventParser::parse_message("not json"),
            Err(GatewayError::SerializationError { .. })
        ));
    }
}
