//! Presence gateway - Discord rich presence over the gateway WebSocket.
//!
//! This crate keeps an authenticated gateway session alive (heartbeats,
//! resume after reconnect requests) and publishes rich presence for the
//! screens and video player of a media tracker app.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases, services and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "presence-gateway";
