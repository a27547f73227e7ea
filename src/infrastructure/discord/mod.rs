//! Discord gateway adapter.

pub mod gateway;

pub use gateway::{GatewayClient, GatewayClientConfig, WebSocketConnector};
