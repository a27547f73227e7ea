use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

use super::payloads::GatewayPayload;
use super::session::SessionInfo;
use super::state::GatewayState;

/// Periodic heartbeat task. The first beat goes out immediately, then one per
/// interval, each carrying the sequence current at send time.
pub struct HeartbeatManager {
    interval_ms: u64,
    handle: JoinHandle<()>,
}

impl HeartbeatManager {
    #[must_use]
    pub fn start(
        interval_ms: u64,
        session: Arc<Mutex<SessionInfo>>,
        state: Arc<Mutex<GatewayState>>,
        payload_tx: mpsc::Sender<GatewayPayload>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_millis(interval_ms.max(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let sequence = session.lock().sequence();
                if payload_tx
                    .send(GatewayPayload::heartbeat(sequence))
                    .await
                    .is_err()
                {
                    debug!("Heartbeat channel closed");
                    break;
                }
                state.lock().record_heartbeat_sent();
                debug!(sequence, "Sent heartbeat");
            }

            debug!("Heartbeat loop stopped");
        });

        Self {
            interval_ms,
            handle,
        }
    }

    #[must_use]
    pub const fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for HeartbeatManager {
    fn drop(&mut self) {
        self.stop();
    }
}
