//! The FedPro protocol engine.
//!
//! [`FedProClient`] owns the transport and the session state machine and
//! implements the two pumping modes of the protocol:
//!
//! - **Synchronous calls**: [`FedProClient::call`] sends one `CallRequest`
//!   and blocks until the matching `CallResponse` arrives or the timeout
//!   fires, queueing any callbacks that interleave.
//! - **Evoked callbacks**: [`FedProClient::evoke_callbacks`] drains the
//!   queue and keeps reading frames for a bounded duration, dispatching
//!   each callback to the federate ambassador and answering it with a
//!   `CallbackResponse` echoing the inbound sequence.
//!
//! The engine is single-threaded and cooperative: there are no background
//! workers, and every suspension point is a frame read with a deadline.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use bytes::Bytes;
use fedpro_core::{SessionAction, SessionController, SessionError, SessionState};
use fedpro_proto::{
    Frame, MessageType,
    payloads::calls::{CallRequest, CallResponse},
    payloads::callbacks::{CallbackRequest, CallbackResponse},
};
use tracing::{debug, warn};

use crate::{
    config::ClientConfig,
    dispatch,
    error::{RtiError, TransportError},
    federate::FederateAmbassador,
    transport::FramedTransport,
};

/// A callback held back while a synchronous call is in flight.
#[derive(Debug)]
struct QueuedCallback {
    sequence: u32,
    callback: CallbackRequest,
}

/// Protocol engine for one FedPro connection.
///
/// # Invariants
///
/// - At most one synchronous call is in flight; its expected response tag
///   and sequence are held on the call stack.
/// - A delivered callback is answered before the next frame is consumed.
/// - No callback reaches the ambassador while queueing is enabled.
pub struct FedProClient {
    config: ClientConfig,
    transport: Option<FramedTransport>,
    session: SessionController,
    queue_callbacks: bool,
    callback_queue: VecDeque<QueuedCallback>,
    dispatching: bool,
    connection_lost_signalled: bool,
    federate_resigned_signalled: bool,
}

impl FedProClient {
    /// Create an engine; no connection is opened yet.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let session = SessionController::new(Instant::now(), config.session.clone());
        Self {
            config,
            transport: None,
            session,
            queue_callbacks: true,
            callback_queue: VecDeque::new(),
            dispatching: false,
            connection_lost_signalled: false,
            federate_resigned_signalled: false,
        }
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// True once the session handshake has completed.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.transport.is_some() && self.session.state() == SessionState::Ready
    }

    /// Current session state.
    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// Server-assigned session id; 0 before the handshake completes.
    #[must_use]
    pub fn session_id(&self) -> u64 {
        self.session.session_id()
    }

    /// Number of callbacks waiting to be evoked.
    #[must_use]
    pub fn queued_callback_count(&self) -> usize {
        self.callback_queue.len()
    }

    /// True once a `connectionLost` callback arrived outside a call.
    #[must_use]
    pub fn connection_lost_signalled(&self) -> bool {
        self.connection_lost_signalled
    }

    /// True once a `federateResigned` callback arrived outside a call.
    #[must_use]
    pub fn federate_resigned_signalled(&self) -> bool {
        self.federate_resigned_signalled
    }

    /// Open the transport and run the session handshake.
    ///
    /// Steps: TCP connect, `NewSession`/`NewSessionStatus` exchange
    /// (tolerating heartbeats), then one synchronous heartbeat to confirm
    /// the session is live.
    ///
    /// # Errors
    ///
    /// - `RtiError::AlreadyConnected` if a session is open
    /// - `RtiError::Session` with the typed refusal on handshake failure
    /// - `RtiError::Transport` / `RtiError::Timeout` on connection failure
    pub fn connect(&mut self) -> Result<(), RtiError> {
        if self.transport.is_some() {
            return Err(RtiError::AlreadyConnected);
        }

        let transport = FramedTransport::connect(
            &self.config.fedpro_host,
            self.config.fedpro_port,
            self.config.connect_timeout,
        )?;
        self.transport = Some(transport);

        let now = Instant::now();
        self.session = SessionController::new(now, self.config.session.clone());
        self.callback_queue.clear();
        self.connection_lost_signalled = false;
        self.federate_resigned_signalled = false;

        match self.handshake(now) {
            Ok(()) => {
                debug!(session_id = self.session.session_id(), "session established");
                Ok(())
            },
            Err(error) => {
                self.teardown();
                Err(error)
            },
        }
    }

    fn handshake(&mut self, started: Instant) -> Result<(), RtiError> {
        let hello = self.session.start_handshake(started)?;
        self.send(&hello)?;

        let deadline = started + self.config.connect_timeout;
        loop {
            let frame = self.read_until(deadline, self.config.connect_timeout)?;
            match frame.message_type() {
                Some(MessageType::NewSessionStatus) => {
                    self.session.complete_handshake(&frame, Instant::now())?;
                    break;
                },
                Some(MessageType::Heartbeat | MessageType::HeartbeatResponse) => {},
                other => {
                    warn!(message_type = ?other, "discarding frame during handshake");
                },
            }
        }

        // Confirm liveness with one synchronous heartbeat
        let heartbeat =
            self.session.next_frame(MessageType::Heartbeat, Bytes::new(), Instant::now())?;
        let heartbeat_seq = heartbeat.header.sequence_num();
        self.send(&heartbeat)?;

        loop {
            let frame = self.read_until(deadline, self.config.connect_timeout)?;
            match frame.message_type() {
                Some(MessageType::HeartbeatResponse) => {
                    if frame.header.sequence_num() != heartbeat_seq {
                        warn!(
                            expected = heartbeat_seq,
                            actual = frame.header.sequence_num(),
                            "heartbeat response sequence mismatch"
                        );
                    }
                    return Ok(());
                },
                Some(MessageType::CallbackRequest) => self.enqueue_callback(&frame, false)?,
                Some(MessageType::Heartbeat) => self.answer_heartbeat(&frame)?,
                other => {
                    warn!(message_type = ?other, "discarding frame while confirming session");
                },
            }
        }
    }

    /// Send one `CallRequest` and block for the matching `CallResponse`.
    ///
    /// Interleaved callbacks are queued; heartbeat traffic is serviced;
    /// mismatched responses are logged and discarded (a stale response can
    /// never satisfy a new expectation — the sequence check is
    /// authoritative).
    ///
    /// # Errors
    ///
    /// - `RtiError::CallNotAllowedFromWithinCallback` while dispatching
    /// - `RtiError::NotConnected` without a live session
    /// - `RtiError::Timeout` if no matching response arrived in time (the
    ///   session remains usable)
    /// - Fatal transport/session errors after teardown
    pub fn call(
        &mut self,
        request: CallRequest,
        timeout: Duration,
    ) -> Result<CallResponse, RtiError> {
        if self.dispatching {
            return Err(RtiError::CallNotAllowedFromWithinCallback);
        }
        if !self.is_connected() {
            return Err(RtiError::NotConnected);
        }

        let service = request.service_name();
        let expected_tag = request.response_tag();
        let payload = request.encode()?;

        let now = Instant::now();
        let frame = self.session.next_frame(MessageType::CallRequest, payload, now)?;
        let expected_seq = frame.header.sequence_num();
        debug!(service, sequence = expected_seq, "call request");
        self.send(&frame)?;

        let deadline = now + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                debug!(service, sequence = expected_seq, "call timed out");
                return Err(RtiError::Timeout { elapsed: timeout });
            }

            let frame = match self.recv(remaining) {
                Ok(frame) => frame,
                Err(error) if error.is_timeout() => {
                    debug!(service, sequence = expected_seq, "call timed out");
                    return Err(RtiError::Timeout { elapsed: timeout });
                },
                Err(error) => {
                    self.teardown();
                    return Err(error.into());
                },
            };

            match frame.message_type() {
                Some(MessageType::CallResponse) => {
                    if frame.header.sequence_num() != expected_seq {
                        warn!(
                            expected = expected_seq,
                            actual = frame.header.sequence_num(),
                            "discarding call response with stale sequence"
                        );
                        continue;
                    }
                    let response = match CallResponse::decode(&frame.payload) {
                        Ok(response) => response,
                        Err(error) => {
                            self.teardown();
                            return Err(error.into());
                        },
                    };
                    if response.tag() == expected_tag || response.is_exception() {
                        return Ok(response);
                    }
                    warn!(
                        expected = expected_tag,
                        actual = response.tag(),
                        "discarding call response with unexpected tag"
                    );
                },
                Some(MessageType::HeartbeatResponse) => {},
                Some(MessageType::Heartbeat) => self.answer_heartbeat(&frame)?,
                Some(MessageType::CallbackRequest) => self.enqueue_callback(&frame, true)?,
                Some(MessageType::SessionTerminated) => {
                    self.session.terminated();
                    self.teardown();
                    return Err(SessionError::SessionTerminated.into());
                },
                other => {
                    warn!(message_type = ?other, "discarding unexpected frame during call");
                },
            }
        }
    }

    /// Drain queued callbacks and pump inbound traffic for at most
    /// `max_duration`, dispatching each callback to `ambassador`.
    ///
    /// Returns the number of callbacks delivered. Queueing is re-enabled
    /// on every exit path.
    ///
    /// # Errors
    ///
    /// - `RtiError::NotConnected` without a live session
    /// - Fatal transport/session errors (including `HeartbeatLost`) after
    ///   teardown
    pub fn evoke_callbacks(
        &mut self,
        max_duration: Duration,
        ambassador: &mut dyn FederateAmbassador,
    ) -> Result<usize, RtiError> {
        if self.dispatching {
            return Err(RtiError::CallNotAllowedFromWithinCallback);
        }
        if !self.is_connected() {
            return Err(RtiError::NotConnected);
        }

        self.queue_callbacks = false;
        let result = self.evoke_inner(max_duration, ambassador);
        self.queue_callbacks = true;
        result
    }

    fn evoke_inner(
        &mut self,
        max_duration: Duration,
        ambassador: &mut dyn FederateAmbassador,
    ) -> Result<usize, RtiError> {
        let deadline = Instant::now() + max_duration;
        let mut delivered = 0;

        while let Some(queued) = self.callback_queue.pop_front() {
            self.dispatch_one(queued, ambassador)?;
            delivered += 1;
        }

        loop {
            match self.session.tick(Instant::now())? {
                Some(SessionAction::SendFrame(frame)) => self.send(&frame)?,
                Some(SessionAction::Lost { elapsed }) => {
                    self.teardown();
                    return Err(SessionError::HeartbeatLost { elapsed }.into());
                },
                None => {},
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            let frame = match self.recv(remaining) {
                Ok(frame) => frame,
                Err(error) if error.is_timeout() => break,
                Err(error) => {
                    self.teardown();
                    return Err(error.into());
                },
            };

            match frame.message_type() {
                Some(MessageType::CallbackRequest) => {
                    let sequence = frame.header.sequence_num();
                    match CallbackRequest::decode(&frame.payload) {
                        Ok(callback) => {
                            self.dispatch_one(QueuedCallback { sequence, callback }, ambassador)?;
                            delivered += 1;
                        },
                        Err(error) => {
                            warn!(sequence, error = %error, "failed to decode callback");
                            self.answer_callback(sequence, false)?;
                        },
                    }
                },
                Some(MessageType::HeartbeatResponse) => {},
                Some(MessageType::Heartbeat) => self.answer_heartbeat(&frame)?,
                Some(MessageType::CallResponse) => {
                    warn!(
                        sequence = frame.header.sequence_num(),
                        "discarding call response with no call in flight"
                    );
                },
                Some(MessageType::SessionTerminated) => {
                    self.session.terminated();
                    self.teardown();
                    return Err(SessionError::SessionTerminated.into());
                },
                other => {
                    warn!(message_type = ?other, "discarding unexpected frame during evoke");
                },
            }
        }

        Ok(delivered)
    }

    /// Gracefully terminate the session and close the transport.
    ///
    /// Sends `TerminateSession` and waits briefly for the peer's
    /// `SessionTerminated`; the transport is closed either way.
    ///
    /// # Errors
    ///
    /// - `RtiError::Session` if the terminate frame cannot be built
    pub fn terminate(&mut self) -> Result<(), RtiError> {
        if self.session.state() == SessionState::Ready && self.transport.is_some() {
            let now = Instant::now();
            let frame = self.session.begin_termination(now)?;
            if self.send(&frame).is_ok() {
                let deadline = now + self.config.call_timeout;
                loop {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        warn!("no SessionTerminated before deadline; closing anyway");
                        break;
                    }
                    match self.recv(remaining) {
                        Ok(frame)
                            if frame.message_type() == Some(MessageType::SessionTerminated) =>
                        {
                            self.session.terminated();
                            break;
                        },
                        Ok(frame) => {
                            debug!(
                                message_type = ?frame.message_type(),
                                "discarding frame during termination"
                            );
                        },
                        Err(_) => break,
                    }
                }
            }
        }
        self.teardown();
        Ok(())
    }

    /// Close the transport and drop per-session state.
    ///
    /// Idempotent; subsequent calls fail fast with `NotConnected`.
    pub(crate) fn teardown(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.close();
        }
        if !matches!(self.session.state(), SessionState::Lost | SessionState::Closed) {
            self.session.close();
        }
        self.callback_queue.clear();
        self.queue_callbacks = true;
        self.dispatching = false;
    }

    fn send(&mut self, frame: &Frame) -> Result<(), RtiError> {
        let Some(transport) = self.transport.as_mut() else {
            return Err(RtiError::NotConnected);
        };
        match transport.send_frame(frame) {
            Ok(()) => Ok(()),
            Err(error) => {
                self.teardown();
                Err(error.into())
            },
        }
    }

    fn recv(&mut self, timeout: Duration) -> Result<Frame, TransportError> {
        let Some(transport) = self.transport.as_mut() else {
            return Err(TransportError::NotConnected);
        };
        let frame = transport.read_frame(timeout)?;
        self.session.note_inbound(&frame.header, Instant::now());
        Ok(frame)
    }

    /// Read one frame against an absolute deadline, mapping the timeout to
    /// the call-level error.
    fn read_until(&mut self, deadline: Instant, total: Duration) -> Result<Frame, RtiError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(RtiError::Timeout { elapsed: total });
        }
        match self.recv(remaining) {
            Ok(frame) => Ok(frame),
            Err(error) if error.is_timeout() => Err(RtiError::Timeout { elapsed: total }),
            Err(error) => Err(error.into()),
        }
    }

    fn answer_heartbeat(&mut self, frame: &Frame) -> Result<(), RtiError> {
        let reply = self.session.reply_frame(
            MessageType::HeartbeatResponse,
            Bytes::new(),
            frame.header.sequence_num(),
            Instant::now(),
        );
        self.send(&reply)
    }

    fn answer_callback(&mut self, sequence: u32, succeeded: bool) -> Result<(), RtiError> {
        let response = CallbackResponse::from_outcome(succeeded);
        let reply = self.session.reply_frame(
            MessageType::CallbackResponse,
            response.encode(),
            sequence,
            Instant::now(),
        );
        self.send(&reply)
    }

    /// Queue one inbound callback frame.
    ///
    /// `ConnectionLost` and `FederateResigned` arriving with no call in
    /// flight additionally raise the fatal-signal flags the host can poll.
    fn enqueue_callback(
        &mut self,
        frame: &Frame,
        expectation_pending: bool,
    ) -> Result<(), RtiError> {
        let sequence = frame.header.sequence_num();
        match CallbackRequest::decode(&frame.payload) {
            Ok(callback) => {
                if callback.is_fatal_signal() && !expectation_pending {
                    match &callback {
                        CallbackRequest::ConnectionLost(_) => {
                            self.connection_lost_signalled = true;
                        },
                        CallbackRequest::FederateResigned(_) => {
                            self.federate_resigned_signalled = true;
                        },
                        _ => {},
                    }
                }
                debug!(sequence, callback = callback.callback_name(), "callback queued");
                self.callback_queue.push_back(QueuedCallback { sequence, callback });
                Ok(())
            },
            Err(error) => {
                warn!(sequence, error = %error, "failed to decode callback; answering failure");
                self.answer_callback(sequence, false)
            },
        }
    }

    fn dispatch_one(
        &mut self,
        queued: QueuedCallback,
        ambassador: &mut dyn FederateAmbassador,
    ) -> Result<(), RtiError> {
        debug_assert!(!self.queue_callbacks, "dispatch with queueing enabled");

        self.dispatching = true;
        let outcome = dispatch::deliver(&queued.callback, ambassador);
        self.dispatching = false;

        if let Err(error) = &outcome {
            warn!(
                callback = queued.callback.callback_name(),
                sequence = queued.sequence,
                error = %error,
                "callback handler failed"
            );
        }
        self.answer_callback(queued.sequence, outcome.is_ok())
    }
}
