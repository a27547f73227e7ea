//! Discord gateway presence client.
//!
//! Keeps one authenticated WebSocket session open, answers the heartbeat
//! protocol, resumes after server-requested reconnects and publishes
//! presence updates once the session is ready.

mod client;
mod codec;
mod connection;
mod constants;
mod error;
mod events;
mod heartbeat;
mod payloads;
mod session;
mod state;

pub use client::{GatewayClient, GatewayClientConfig};
pub use connection::{GatewayConnector, GatewayTransport, WebSocketConnector};
pub use constants::{GATEWAY_URL, OperationCode};
pub use error::{GatewayCloseCode, GatewayError, GatewayResult};
pub use events::DispatchEvent;
pub use payloads::{GatewayMessage, GatewayPayload, IdentifyProperties};
pub use session::SessionInfo;
pub use state::{ConnectionState, GatewayState};
