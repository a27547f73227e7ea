use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, trace, warn};

use super::codec::EventParser;
use super::connection::{GatewayConnector, GatewayTransport, WebSocketConnector};
use super::constants::{
    CLIENT_PROPERTIES_BROWSER, CLIENT_PROPERTIES_DEVICE, CLIENT_PROPERTIES_OS, DEFAULT_INTENTS,
    GATEWAY_URL, INVALID_SESSION_DELAY, OUTBOUND_QUEUE_SIZE, OperationCode, RECONNECT_CLOSE_CODE,
    RECONNECT_CLOSE_REASON, RECONNECT_DELAY,
};
use super::error::{GatewayCloseCode, GatewayError, GatewayResult};
use super::events::DispatchEvent;
use super::heartbeat::HeartbeatManager;
use super::payloads::{GatewayPayload, IdentifyProperties};
use super::session::SessionInfo;
use super::state::{ConnectionState, GatewayState};
use crate::domain::entities::{AuthToken, Presence};
use crate::domain::ports::PresencePort;

#[derive(Debug, Clone)]
pub struct GatewayClientConfig {
    pub gateway_url: String,
    pub properties: IdentifyProperties,
    pub intents: u32,
    pub reconnect_delay: Duration,
    pub invalid_session_delay: Duration,
}

impl Default for GatewayClientConfig {
    fn default() -> Self {
        Self {
            gateway_url: GATEWAY_URL.to_string(),
            properties: IdentifyProperties {
                os: CLIENT_PROPERTIES_OS.to_string(),
                browser: CLIENT_PROPERTIES_BROWSER.to_string(),
                device: CLIENT_PROPERTIES_DEVICE.to_string(),
            },
            intents: DEFAULT_INTENTS,
            reconnect_delay: RECONNECT_DELAY,
            invalid_session_delay: INVALID_SESSION_DELAY,
        }
    }
}

impl GatewayClientConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = url.into();
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: IdentifyProperties) -> Self {
        self.properties = properties;
        self
    }

    #[must_use]
    pub const fn with_intents(mut self, intents: u32) -> Self {
        self.intents = intents;
        self
    }
}

/// Presence client for the Discord gateway.
///
/// Owns at most one transport at a time. A background session task reads
/// frames and drives the HELLO / IDENTIFY or RESUME / READY handshake; a
/// heartbeat task keeps the connection alive; presence updates wait for READY
/// before they are queued. Dropping the client closes it.
pub struct GatewayClient {
    inner: Arc<ClientInner>,
}

impl GatewayClient {
    #[must_use]
    pub fn new(token: AuthToken, config: GatewayClientConfig) -> Self {
        Self::with_connector(token, config, Arc::new(WebSocketConnector::new()))
    }

    #[must_use]
    pub fn with_connector(
        token: AuthToken,
        config: GatewayClientConfig,
        connector: Arc<dyn GatewayConnector>,
    ) -> Self {
        let (ready, _) = watch::channel(false);

        Self {
            inner: Arc::new(ClientInner {
                token,
                config,
                connector,
                session: Arc::new(Mutex::new(SessionInfo::new())),
                state: Arc::new(Mutex::new(GatewayState::new())),
                ready,
                outbound: Mutex::new(None),
                session_task: Mutex::new(None),
                heartbeat: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Opens a connection in the background, resuming the previous session
    /// when one is known. Failures are logged and end in [`Self::close`].
    pub fn connect(&self) {
        self.inner.spawn_session(None);
    }

    /// Waits until READY was received, then queues a presence update. The
    /// update is dropped if the transport went away in the meantime.
    pub async fn send_activity(&self, presence: &Presence) {
        if !self.wait_until_ready().await {
            return;
        }

        info!("Sending {}", OperationCode::PresenceUpdate);
        if !self
            .inner
            .enqueue(GatewayPayload::presence_update(presence))
            .await
        {
            debug!("Transport inactive, presence update dropped");
        }
    }

    /// Resolves once the handshake completed. Returns `false` only if the
    /// readiness signal can no longer change.
    pub async fn wait_until_ready(&self) -> bool {
        let mut ready = self.inner.ready.subscribe();
        if !self.is_ready() && self.state().is_handshaking() {
            debug!(state = %self.state(), "Waiting for the handshake to finish");
        }
        let became_ready = ready.wait_for(|connected| *connected).await.is_ok();
        became_ready
    }

    /// Transport liveness only; see [`Self::is_ready`] for handshake state.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner
            .outbound
            .lock()
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.borrow()
    }

    pub fn close(&self) {
        self.inner.close();
    }

    #[must_use]
    pub fn session(&self) -> SessionInfo {
        self.inner.session.lock().clone()
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.inner.state.lock().connection()
    }

    #[must_use]
    pub fn latency(&self) -> Option<Duration> {
        self.inner.state.lock().latency()
    }
}

impl Drop for GatewayClient {
    fn drop(&mut self) {
        self.inner.close();
    }
}

#[async_trait]
impl PresencePort for GatewayClient {
    fn connect(&self) {
        Self::connect(self);
    }

    async fn send_activity(&self, presence: &Presence) {
        Self::send_activity(self, presence).await;
    }

    fn is_connected(&self) -> bool {
        Self::is_connected(self)
    }

    fn close(&self) {
        Self::close(self);
    }
}

struct ClientInner {
    token: AuthToken,
    config: GatewayClientConfig,
    connector: Arc<dyn GatewayConnector>,
    session: Arc<Mutex<SessionInfo>>,
    state: Arc<Mutex<GatewayState>>,
    ready: watch::Sender<bool>,
    outbound: Mutex<Option<mpsc::Sender<GatewayPayload>>>,
    session_task: Mutex<Option<JoinHandle<()>>>,
    heartbeat: Mutex<Option<HeartbeatManager>>,
    /// Bumped under the `session` lock by every connect and close. A session
    /// task only touches shared state while its generation is current.
    generation: AtomicU64,
}

impl ClientInner {
    /// Starts a session task. With `expected` set, the spawn only happens
    /// while that generation is still current.
    fn spawn_session(self: &Arc<Self>, expected: Option<u64>) {
        let mut task = self.session_task.lock();
        let generation = {
            let _session = self.session.lock();
            if expected.is_some_and(|generation| !self.is_current(generation)) {
                debug!("Session superseded, reconnect skipped");
                return;
            }
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move { inner.run_session(generation).await });

        if let Some(previous) = task.replace(handle) {
            previous.abort();
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Runs `f` under the session lock, or returns `None` if `generation` was
    /// superseded.
    fn with_session<R>(
        &self,
        generation: u64,
        f: impl FnOnce(&mut SessionInfo) -> R,
    ) -> Option<R> {
        let mut session = self.session.lock();
        self.is_current(generation).then(|| f(&mut session))
    }

    async fn run_session(self: Arc<Self>, generation: u64) {
        info!(generation, "Connect called");
        self.transition(generation, ConnectionState::Connecting);

        let Some(resume_url) = self.with_session(generation, |session| {
            session.resume_gateway_url().map(str::to_owned)
        }) else {
            return;
        };
        let url = resume_url.unwrap_or_else(|| self.config.gateway_url.clone());

        let mut transport = match self.connector.connect(&url).await {
            Ok(transport) => transport,
            Err(e) => {
                error!(error = %e, url = %url, "Failed to connect to gateway");
                self.shutdown(Some(generation));
                return;
            }
        };

        let (payload_tx, mut payload_rx) = mpsc::channel(OUTBOUND_QUEUE_SIZE);
        {
            let mut outbound = self.outbound.lock();
            if !self.is_current(generation) {
                debug!("Session superseded before the transport opened");
                return;
            }
            *outbound = Some(payload_tx);
        }
        self.transition(generation, ConnectionState::AwaitingHello);

        let reason = loop {
            tokio::select! {
                frame = transport.receive() => {
                    let result = match frame {
                        Ok(text) => self.handle_frame(generation, transport.as_mut(), &text).await,
                        Err(e) => Err(e),
                    };
                    if let Err(e) = result {
                        break e;
                    }
                }

                Some(payload) = payload_rx.recv() => {
                    if !transport.is_connected() {
                        debug!(op = %payload.op, "Transport inactive, payload dropped");
                        continue;
                    }
                    if let Err(e) = transport.send(&payload).await {
                        warn!(error = %e, op = %payload.op, "Failed to send payload");
                    }
                }
            }
        };

        {
            let mut outbound = self.outbound.lock();
            if self.is_current(generation) {
                outbound.take();
            }
        }
        drop(payload_rx);
        drop(transport);

        self.handle_close(generation, &reason).await;
    }

    async fn handle_close(self: &Arc<Self>, generation: u64, reason: &GatewayError) {
        let current = self
            .with_session(generation, |_| {
                self.ready.send_replace(false);
            })
            .is_some();
        if !current {
            debug!(reason = %reason, "Superseded session ended");
            return;
        }
        self.stop_heartbeat();

        let code = reason.close_code();
        let can_reconnect = reason.is_reconnect();
        warn!(
            code = ?code,
            meaning = ?code.and_then(GatewayCloseCode::from_u16).map(GatewayCloseCode::description),
            reason = %reason,
            can_reconnect,
            "Gateway connection closed"
        );

        if can_reconnect {
            self.transition(generation, ConnectionState::Reconnecting);
            sleep(self.config.reconnect_delay).await;
            self.spawn_session(Some(generation));
        } else {
            self.shutdown(Some(generation));
        }
    }

    async fn handle_frame(
        &self,
        generation: u64,
        transport: &mut dyn GatewayTransport,
        text: &str,
    ) -> GatewayResult<()> {
        let message = match EventParser::parse_message(text) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Dropping undecodable gateway frame");
                return Ok(());
            }
        };

        debug!(
            op = %message.op,
            seq = ?message.s,
            event = ?message.t,
            "Received gateway message"
        );

        if self
            .with_session(generation, |session| session.update_sequence(message.s))
            .is_none()
        {
            return Ok(());
        }

        match message.op {
            OperationCode::Dispatch => {
                self.handle_dispatch(generation, message.t.as_deref(), message.d);
            }
            OperationCode::Heartbeat => self.send_heartbeat(transport).await?,
            OperationCode::Reconnect => return Self::request_reconnect(transport).await,
            OperationCode::InvalidSession => {
                self.handle_invalid_session(generation, transport).await?;
            }
            OperationCode::Hello => self.handle_hello(generation, transport, message.d).await?,
            OperationCode::HeartbeatAck => {
                let mut state = self.state.lock();
                state.record_heartbeat_ack();
                debug!(latency = ?state.latency(), "Heartbeat acknowledged");
            }
            other => {
                debug!(op = %other, "Unhandled opcode");
            }
        }

        Ok(())
    }

    fn handle_dispatch(&self, generation: u64, event_type: Option<&str>, data: Option<Value>) {
        let Some(event_type) = event_type else {
            return;
        };

        match EventParser::parse_dispatch(event_type, data) {
            Ok(DispatchEvent::Ready {
                session_id,
                resume_gateway_url,
            }) => {
                let applied = self.with_session(generation, |session| {
                    session.set_session(session_id, &resume_gateway_url);
                    info!(
                        resume_gateway_url = ?session.resume_gateway_url(),
                        session_id = ?session.session_id(),
                        "Gateway ready"
                    );
                    self.ready.send_replace(true);
                });
                if applied.is_none() {
                    debug!("Ignoring READY for a superseded session");
                    return;
                }
                self.transition(generation, ConnectionState::Ready);
            }
            Ok(DispatchEvent::Resumed) => {
                info!("Session resumed");
                self.transition(generation, ConnectionState::Ready);
            }
            Ok(DispatchEvent::Other { event_type }) => {
                trace!(event = %event_type, "Ignoring dispatch event");
            }
            Err(e) => {
                warn!(event = event_type, error = %e, "Failed to parse dispatch event");
            }
        }
    }

    async fn handle_hello(
        &self,
        generation: u64,
        transport: &mut dyn GatewayTransport,
        data: Option<Value>,
    ) -> GatewayResult<()> {
        let hello = match EventParser::parse_hello(data) {
            Ok(hello) => hello,
            Err(e) => {
                warn!(error = %e, "Dropping undecodable Hello");
                return Ok(());
            }
        };

        let Some(resume) = self.with_session(generation, |session| {
            session.set_heartbeat_interval(hello.heartbeat_interval);
            session.can_resume().then(|| {
                (
                    session.session_id().unwrap_or_default().to_string(),
                    session.sequence(),
                )
            })
        }) else {
            return Ok(());
        };

        match resume {
            Some((session_id, sequence)) => {
                self.transition(generation, ConnectionState::Resuming);
                self.send_resume(transport, &session_id, sequence).await?;
            }
            None => {
                self.transition(generation, ConnectionState::Identifying);
                self.send_identify(transport).await?;
            }
        }

        info!(
            interval_ms = hello.heartbeat_interval,
            "Setting heartbeat interval"
        );
        self.start_heartbeat(generation, hello.heartbeat_interval);

        Ok(())
    }

    async fn handle_invalid_session(
        &self,
        generation: u64,
        transport: &mut dyn GatewayTransport,
    ) -> GatewayResult<()> {
        info!("Handling invalid session");
        debug!(
            delay = ?self.config.invalid_session_delay,
            "Sending identify after delay"
        );
        sleep(self.config.invalid_session_delay).await;

        self.transition(generation, ConnectionState::Identifying);
        self.send_identify(transport).await
    }

    async fn request_reconnect(transport: &mut dyn GatewayTransport) -> GatewayResult<()> {
        info!("Gateway requested reconnect");
        if let Err(e) = transport
            .close(RECONNECT_CLOSE_CODE, RECONNECT_CLOSE_REASON)
            .await
        {
            debug!(error = %e, "Failed to send reconnect close frame");
        }

        Err(GatewayError::closed(
            RECONNECT_CLOSE_CODE,
            RECONNECT_CLOSE_REASON,
        ))
    }

    async fn send_identify(&self, transport: &mut dyn GatewayTransport) -> GatewayResult<()> {
        info!("Sending {}", OperationCode::Identify);
        let payload = GatewayPayload::identify(
            self.token.as_str(),
            &self.config.properties,
            self.config.intents,
        );
        transport.send(&payload).await
    }

    async fn send_resume(
        &self,
        transport: &mut dyn GatewayTransport,
        session_id: &str,
        sequence: u64,
    ) -> GatewayResult<()> {
        info!(session_id, sequence, "Sending {}", OperationCode::Resume);
        let payload = GatewayPayload::resume(self.token.as_str(), session_id, sequence);
        transport.send(&payload).await
    }

    async fn send_heartbeat(&self, transport: &mut dyn GatewayTransport) -> GatewayResult<()> {
        let sequence = self.session.lock().sequence();
        info!(sequence, "Sending {}", OperationCode::Heartbeat);
        transport.send(&GatewayPayload::heartbeat(sequence)).await?;
        self.state.lock().record_heartbeat_sent();
        Ok(())
    }

    fn start_heartbeat(&self, generation: u64, interval_ms: u64) {
        let Some(payload_tx) = self.outbound.lock().clone() else {
            return;
        };

        let mut heartbeat = self.heartbeat.lock();
        if !self.is_current(generation) {
            debug!("Session superseded, heartbeat not started");
            return;
        }
        if let Some(previous) = heartbeat.take() {
            debug!(
                previous_interval_ms = previous.interval_ms(),
                "Replacing heartbeat loop"
            );
            previous.stop();
        }
        *heartbeat = Some(HeartbeatManager::start(
            interval_ms,
            Arc::clone(&self.session),
            Arc::clone(&self.state),
            payload_tx,
        ));
    }

    fn stop_heartbeat(&self) {
        if let Some(heartbeat) = self.heartbeat.lock().take()
            && heartbeat.is_running()
        {
            heartbeat.stop();
            debug!("Heartbeat stopped");
        }
    }

    async fn enqueue(&self, payload: GatewayPayload) -> bool {
        let Some(payload_tx) = self.outbound.lock().clone() else {
            return false;
        };
        payload_tx.send(payload).await.is_ok()
    }

    fn transition(&self, generation: u64, state: ConnectionState) {
        let mut current = self.state.lock();
        if self.is_current(generation) {
            current.transition_to(state);
        }
    }

    fn close(&self) {
        self.shutdown(None);
    }

    /// Supersedes the running session, then tears down its task, heartbeat
    /// and transport. With `expected` set, nothing happens unless that
    /// generation is still current.
    fn shutdown(&self, expected: Option<u64>) {
        let task = {
            let mut task = self.session_task.lock();
            {
                let mut session = self.session.lock();
                if expected.is_some_and(|generation| !self.is_current(generation)) {
                    debug!("Session superseded, close skipped");
                    return;
                }
                self.generation.fetch_add(1, Ordering::SeqCst);
                session.clear();
                self.ready.send_replace(false);
            }
            task.take()
        };

        self.stop_heartbeat();
        let had_task = task.is_some();
        if let Some(task) = task {
            task.abort();
        }
        let had_transport = self.outbound.lock().take().is_some();

        let was_active = {
            let mut state = self.state.lock();
            let was_active = state.connection().is_active();
            state.transition_to(ConnectionState::Disconnected);
            was_active
        };

        if had_task || had_transport || was_active {
            warn!("Connection to gateway closed");
        } else {
            debug!("Gateway client already closed");
        }
    }
}
