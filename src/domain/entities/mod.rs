//! Domain entity definitions.

mod presence;
mod token;

pub use presence::{
    Activity, ActivityKind, Assets, Metadata, Presence, PresenceStatus, Timestamps,
};
pub use token::AuthToken;
