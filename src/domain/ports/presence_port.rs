//! Presence publishing port definition.

use async_trait::async_trait;

use crate::domain::entities::Presence;

/// Port for a long-lived presence connection.
///
/// Connection failures are handled inside the adapter, so none of these
/// operations report errors to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PresencePort: Send + Sync {
    /// Starts connecting in the background.
    fn connect(&self);

    /// Waits until the session is ready, then publishes the presence.
    async fn send_activity(&self, presence: &Presence);

    /// Returns whether the underlying transport is open.
    fn is_connected(&self) -> bool;

    /// Tears the connection down and forgets the session.
    fn close(&self);
}
