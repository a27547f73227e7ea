//! Application layer with use cases, services and DTOs.

/// Data transfer objects.
pub mod dto;
/// Presence building and publishing.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{LoginRequest, LoginResponse, TokenSource};
pub use services::{
    DiscordScreen, PlayerData, PresenceBuilder, RichPresenceConfig, RichPresenceService,
};
pub use use_cases::{LoginUseCase, ResolveTokenUseCase, ResolvedToken};
