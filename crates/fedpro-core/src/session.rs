//! Session layer state machine.
//!
//! Manages the FedPro session lifecycle: the new-session handshake,
//! sequence-number minting, heartbeat deadlines, and graceful termination.
//! The state machine is pure (no I/O): time is passed as a parameter and
//! frames are returned for the caller to send. This keeps it testable with
//! virtual time and leaves the socket to the client crate.
//!
//! # State Machine
//!
//! ```text
//! ┌────────────┐ NewSession ┌─────────────┐ Status(Success) ┌───────┐
//! │ Connecting │───────────>│ Handshaking │────────────────>│ Ready │
//! └────────────┘            └─────────────┘                 └───────┘
//!                                  │                            │
//!                                  │ Status(failure)            │ TerminateSession
//!                                  ↓                            ↓
//!                             ┌────────┐  SessionTerminated ┌──────────────┐
//!                             │ Closed │<───────────────────│ ShuttingDown │
//!                             └────────┘                    └──────────────┘
//! ```
//!
//! `Lost` is an exceptional sink reachable from any non-terminal state when
//! the heartbeat timeout expires.

use std::{
    ops::Sub,
    time::{Duration, Instant},
};

use bytes::Bytes;
use fedpro_proto::{
    Frame, FrameHeader, MessageType,
    control::{NewSession, SessionStatus},
};

use crate::error::SessionError;

/// Interval without outbound traffic after which a heartbeat is emitted.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(60);

/// Time without inbound traffic, after a heartbeat was sent, before the
/// session is considered lost.
pub const DEFAULT_HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(180);

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Transport opened, handshake not started.
    Connecting,
    /// `NewSession` sent, waiting for `NewSessionStatus`.
    Handshaking,
    /// Session established; calls and callbacks may flow.
    Ready,
    /// `TerminateSession` sent, waiting for `SessionTerminated`.
    ShuttingDown,
    /// Session ended (gracefully or after a handshake refusal).
    Closed,
    /// Heartbeat timeout expired; the peer is unreachable.
    Lost,
}

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Idle interval before a heartbeat is emitted.
    pub heartbeat_interval: Duration,
    /// Unanswered-heartbeat interval before the session is lost.
    pub heartbeat_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            heartbeat_timeout: DEFAULT_HEARTBEAT_TIMEOUT,
        }
    }
}

/// Actions returned by [`SessionController::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Send this frame to the peer.
    SendFrame(Frame),

    /// The heartbeat timeout expired; the caller must raise
    /// `connectionLost` and tear the connection down.
    Lost {
        /// Time since the unanswered heartbeat was sent.
        elapsed: Duration,
    },
}

/// Session state machine for one FedPro connection.
///
/// Generic over `Instant` to support both real time and virtual time for
/// deterministic testing.
///
/// # Invariants
///
/// - After a successful handshake `session_id != 0`, and every subsequent
///   outbound frame carries it.
/// - Outbound sequence numbers strictly increase; overflow is fatal.
/// - Reply frames (callback responses, heartbeat responses) echo the
///   inbound sequence and never mint a new one.
#[derive(Debug, Clone)]
pub struct SessionController<I = Instant>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    state: SessionState,
    config: SessionConfig,
    session_id: u64,
    out_seq: u32,
    last_in_seq: u32,
    status: SessionStatus,
    /// Last outbound or inbound traffic (base of the heartbeat-interval
    /// deadline).
    last_activity: I,
    /// Set while a heartbeat is outstanding (base of the timeout deadline).
    heartbeat_sent_at: Option<I>,
}

impl<I> SessionController<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    /// Create a controller in [`SessionState::Connecting`].
    pub fn new(now: I, config: SessionConfig) -> Self {
        Self {
            state: SessionState::Connecting,
            config,
            session_id: 0,
            out_seq: 0,
            last_in_seq: 0,
            status: SessionStatus::Unset,
            last_activity: now,
            heartbeat_sent_at: None,
        }
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Server-assigned session id; 0 until the handshake completes.
    #[must_use]
    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    /// Last handshake status received.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Highest peer sequence number processed so far.
    #[must_use]
    pub fn last_in_seq(&self) -> u32 {
        self.last_in_seq
    }

    /// Most recently minted outbound sequence number.
    #[must_use]
    pub fn out_seq(&self) -> u32 {
        self.out_seq
    }

    /// Build the `NewSession` frame and move to `Handshaking`.
    ///
    /// The handshake frame is the only outbound frame with `session_id = 0`
    /// and `sequence_num = 0`.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidState` if not in `Connecting`
    pub fn start_handshake(&mut self, now: I) -> Result<Frame, SessionError> {
        if self.state != SessionState::Connecting {
            return Err(SessionError::InvalidState {
                state: self.state,
                operation: "start_handshake",
            });
        }

        self.state = SessionState::Handshaking;
        self.last_activity = now;

        Ok(Frame::new(MessageType::NewSession, NewSession::default().encode()))
    }

    /// Process the `NewSessionStatus` reply and move to `Ready`.
    ///
    /// On success the server-assigned session id is adopted; every later
    /// outbound frame carries it. Refusals close the session.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidState` if not in `Handshaking`
    /// - `SessionError::UnexpectedFrame` for any other message type
    /// - `SessionError::InvalidSessionId` if the server assigned id 0
    /// - `SessionError::UnsupportedProtocolVersion` /
    ///   `SessionError::OutOfResources` / `SessionError::SessionInternal`
    ///   on refusal statuses
    pub fn complete_handshake(&mut self, frame: &Frame, now: I) -> Result<u64, SessionError> {
        if self.state != SessionState::Handshaking {
            return Err(SessionError::InvalidState {
                state: self.state,
                operation: "complete_handshake",
            });
        }

        if frame.message_type() != Some(MessageType::NewSessionStatus) {
            return Err(SessionError::UnexpectedFrame {
                state: self.state,
                message_type: frame.header.message_type(),
            });
        }

        self.note_inbound(&frame.header, now);
        self.status = SessionStatus::decode(&frame.payload)?;

        match self.status {
            SessionStatus::Success => {
                let session_id = frame.header.session_id();
                if session_id == 0 {
                    self.state = SessionState::Closed;
                    return Err(SessionError::InvalidSessionId);
                }
                self.session_id = session_id;
                self.state = SessionState::Ready;
                Ok(session_id)
            },
            SessionStatus::UnsupportedProtocolVersion => {
                self.state = SessionState::Closed;
                Err(SessionError::UnsupportedProtocolVersion)
            },
            SessionStatus::OutOfResources => {
                self.state = SessionState::Closed;
                Err(SessionError::OutOfResources)
            },
            SessionStatus::Unset | SessionStatus::InternalError => {
                self.state = SessionState::Closed;
                Err(SessionError::SessionInternal)
            },
        }
    }

    /// Build an outbound frame with a freshly minted sequence number.
    ///
    /// Stamps the session id and the highest processed peer sequence.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidState` unless `Ready` or `ShuttingDown`
    /// - `SessionError::SequenceOverflow` if the counter would wrap
    pub fn next_frame(
        &mut self,
        message_type: MessageType,
        payload: Bytes,
        now: I,
    ) -> Result<Frame, SessionError> {
        if !matches!(self.state, SessionState::Ready | SessionState::ShuttingDown) {
            return Err(SessionError::InvalidState { state: self.state, operation: "next_frame" });
        }

        let sequence = self.out_seq.checked_add(1).ok_or(SessionError::SequenceOverflow)?;
        self.out_seq = sequence;
        self.last_activity = now;

        let mut frame = Frame::new(message_type, payload);
        frame.header.set_sequence_num(sequence);
        frame.header.set_session_id(self.session_id);
        frame.header.set_last_received(self.last_in_seq);
        Ok(frame)
    }

    /// Build an outbound frame echoing an inbound sequence number.
    ///
    /// Used for `CallbackResponse` and `HeartbeatResponse`, which carry the
    /// sequence of the frame they answer; no new sequence is minted.
    pub fn reply_frame(
        &mut self,
        message_type: MessageType,
        payload: Bytes,
        sequence: u32,
        now: I,
    ) -> Frame {
        self.last_activity = now;

        let mut frame = Frame::new(message_type, payload);
        frame.header.set_sequence_num(sequence);
        frame.header.set_session_id(self.session_id);
        frame.header.set_last_received(self.last_in_seq);
        frame
    }

    /// Record an inbound frame: updates the last-received sequence and
    /// resets both heartbeat deadlines.
    pub fn note_inbound(&mut self, header: &FrameHeader, now: I) {
        self.last_in_seq = header.sequence_num();
        self.last_activity = now;
        self.heartbeat_sent_at = None;
    }

    /// Run periodic heartbeat maintenance.
    ///
    /// Returns `SendFrame(Heartbeat)` when the idle interval expired, or
    /// `Lost` (after moving to [`SessionState::Lost`]) when a heartbeat has
    /// gone unanswered past the timeout. Only active in `Ready`.
    ///
    /// # Errors
    ///
    /// - `SessionError::SequenceOverflow` if the heartbeat cannot mint a
    ///   sequence number
    pub fn tick(&mut self, now: I) -> Result<Option<SessionAction>, SessionError> {
        if self.state != SessionState::Ready {
            return Ok(None);
        }

        if let Some(sent_at) = self.heartbeat_sent_at {
            let elapsed = now - sent_at;
            if elapsed >= self.config.heartbeat_timeout {
                self.state = SessionState::Lost;
                return Ok(Some(SessionAction::Lost { elapsed }));
            }
            return Ok(None);
        }

        if now - self.last_activity >= self.config.heartbeat_interval {
            let frame = self.next_frame(MessageType::Heartbeat, Bytes::new(), now)?;
            self.heartbeat_sent_at = Some(now);
            return Ok(Some(SessionAction::SendFrame(frame)));
        }

        Ok(None)
    }

    /// Build the `TerminateSession` frame and move to `ShuttingDown`.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidState` if not in `Ready`
    /// - `SessionError::SequenceOverflow` if the counter would wrap
    pub fn begin_termination(&mut self, now: I) -> Result<Frame, SessionError> {
        if self.state != SessionState::Ready {
            return Err(SessionError::InvalidState {
                state: self.state,
                operation: "begin_termination",
            });
        }

        self.state = SessionState::ShuttingDown;
        self.next_frame(MessageType::TerminateSession, Bytes::new(), now)
    }

    /// Record the peer's `SessionTerminated` acknowledgment.
    pub fn terminated(&mut self) {
        self.state = SessionState::Closed;
    }

    /// Mark the session lost (fatal failure outside the heartbeat path).
    pub fn mark_lost(&mut self) {
        self.state = SessionState::Lost;
    }

    /// Mark the session closed.
    pub fn close(&mut self) {
        self.state = SessionState::Closed;
    }

    #[cfg(test)]
    pub(crate) fn force_out_seq(&mut self, value: u32) {
        self.out_seq = value;
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn ready_session(t0: Instant) -> SessionController {
        let mut session = SessionController::new(t0, SessionConfig::default());
        session.start_handshake(t0).unwrap();
        let status = status_frame(SessionStatus::Success, 0x1122_3344_5566_7788, 1);
        session.complete_handshake(&status, t0).unwrap();
        session
    }

    fn status_frame(status: SessionStatus, session_id: u64, sequence: u32) -> Frame {
        let mut frame = Frame::new(MessageType::NewSessionStatus, status.encode());
        frame.header.set_session_id(session_id);
        frame.header.set_sequence_num(sequence);
        frame
    }

    #[test]
    fn handshake_frame_is_byte_exact() {
        let t0 = Instant::now();
        let mut session = SessionController::new(t0, SessionConfig::default());
        assert_eq!(session.state(), SessionState::Connecting);

        let frame = session.start_handshake(t0).unwrap();
        assert_eq!(session.state(), SessionState::Handshaking);

        let wire = frame.to_vec().unwrap();
        assert_eq!(
            wire,
            vec![
                0x00, 0x00, 0x00, 0x1C, // message_size = 28
                0x00, 0x00, 0x00, 0x00, // sequence_num = 0
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // session_id = 0
                0x00, 0x00, 0x00, 0x00, // last_received = 0
                0x00, 0x00, 0x00, 0x01, // message_type = CTRL_NEW_SESSION
                0x00, 0x00, 0x00, 0x01, // protocol_version = 1
            ]
        );
    }

    #[test]
    fn successful_handshake_adopts_session_id() {
        let t0 = Instant::now();
        let mut session = SessionController::new(t0, SessionConfig::default());
        session.start_handshake(t0).unwrap();

        let session_id =
            session.complete_handshake(&status_frame(SessionStatus::Success, 77, 1), t0).unwrap();
        assert_eq!(session_id, 77);
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.session_id(), 77);
        assert_eq!(session.status(), SessionStatus::Success);

        // Next outbound frame carries the session id and sequence 1
        let frame = session.next_frame(MessageType::Heartbeat, Bytes::new(), t0).unwrap();
        assert_eq!(frame.header.session_id(), 77);
        assert_eq!(frame.header.sequence_num(), 1);
        assert_eq!(frame.header.last_received(), 1);
    }

    #[test]
    fn handshake_refusals_close_the_session() {
        for (status, expected) in [
            (
                SessionStatus::UnsupportedProtocolVersion,
                SessionError::UnsupportedProtocolVersion,
            ),
            (SessionStatus::OutOfResources, SessionError::OutOfResources),
            (SessionStatus::InternalError, SessionError::SessionInternal),
        ] {
            let t0 = Instant::now();
            let mut session = SessionController::new(t0, SessionConfig::default());
            session.start_handshake(t0).unwrap();

            let result = session.complete_handshake(&status_frame(status, 0, 1), t0);
            assert_eq!(result, Err(expected));
            assert_eq!(session.state(), SessionState::Closed);
        }
    }

    #[test]
    fn zero_session_id_is_rejected() {
        let t0 = Instant::now();
        let mut session = SessionController::new(t0, SessionConfig::default());
        session.start_handshake(t0).unwrap();

        let result = session.complete_handshake(&status_frame(SessionStatus::Success, 0, 1), t0);
        assert_eq!(result, Err(SessionError::InvalidSessionId));
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn handshake_rejects_wrong_frame_type() {
        let t0 = Instant::now();
        let mut session = SessionController::new(t0, SessionConfig::default());
        session.start_handshake(t0).unwrap();

        let frame = Frame::new(MessageType::Heartbeat, Bytes::new());
        let result = session.complete_handshake(&frame, t0);
        assert!(matches!(result, Err(SessionError::UnexpectedFrame { .. })));
    }

    #[test]
    fn sequence_numbers_strictly_increase() {
        let t0 = Instant::now();
        let mut session = ready_session(t0);

        let mut previous = 0;
        for _ in 0..5 {
            let frame = session.next_frame(MessageType::CallRequest, Bytes::new(), t0).unwrap();
            assert!(frame.header.sequence_num() > previous);
            previous = frame.header.sequence_num();
        }
    }

    #[test]
    fn reply_frames_echo_sequence_without_minting() {
        let t0 = Instant::now();
        let mut session = ready_session(t0);

        let before = session.out_seq();
        let reply = session.reply_frame(MessageType::CallbackResponse, Bytes::new(), 42, t0);
        assert_eq!(reply.header.sequence_num(), 42);
        assert_eq!(reply.header.session_id(), session.session_id());
        assert_eq!(session.out_seq(), before);
    }

    #[test]
    fn sequence_overflow_is_fatal() {
        let t0 = Instant::now();
        let mut session = ready_session(t0);
        session.force_out_seq(u32::MAX);

        let result = session.next_frame(MessageType::CallRequest, Bytes::new(), t0);
        assert_eq!(result.err(), Some(SessionError::SequenceOverflow));
    }

    #[test]
    fn idle_interval_emits_heartbeat() {
        let t0 = Instant::now();
        let mut session = ready_session(t0);

        // No heartbeat before the interval elapses
        let t1 = t0 + Duration::from_secs(30);
        assert_eq!(session.tick(t1).unwrap(), None);

        let t2 = t0 + Duration::from_secs(61);
        let action = session.tick(t2).unwrap();
        match action {
            Some(SessionAction::SendFrame(frame)) => {
                assert_eq!(frame.message_type(), Some(MessageType::Heartbeat));
                assert_eq!(frame.header.session_id(), session.session_id());
            },
            other => panic!("expected heartbeat, got {other:?}"),
        }

        // Heartbeat outstanding: no second heartbeat before the timeout
        let t3 = t2 + Duration::from_secs(30);
        assert_eq!(session.tick(t3).unwrap(), None);
    }

    #[test]
    fn unanswered_heartbeat_loses_the_session() {
        let t0 = Instant::now();
        let mut session = ready_session(t0);

        let t1 = t0 + Duration::from_secs(61);
        assert!(matches!(session.tick(t1).unwrap(), Some(SessionAction::SendFrame(_))));

        let t2 = t1 + Duration::from_secs(180);
        let action = session.tick(t2).unwrap();
        assert_eq!(
            action,
            Some(SessionAction::Lost { elapsed: Duration::from_secs(180) })
        );
        assert_eq!(session.state(), SessionState::Lost);
    }

    #[test]
    fn inbound_traffic_resets_heartbeat_deadlines() {
        let t0 = Instant::now();
        let mut session = ready_session(t0);

        let t1 = t0 + Duration::from_secs(61);
        assert!(matches!(session.tick(t1).unwrap(), Some(SessionAction::SendFrame(_))));

        // Peer answers; the outstanding heartbeat is cleared
        let mut response = Frame::new(MessageType::HeartbeatResponse, Bytes::new());
        response.header.set_sequence_num(9);
        let t2 = t1 + Duration::from_secs(100);
        session.note_inbound(&response.header, t2);
        assert_eq!(session.last_in_seq(), 9);

        // The old timeout deadline no longer applies
        let t3 = t1 + Duration::from_secs(181);
        let action = session.tick(t3).unwrap();
        assert!(!matches!(action, Some(SessionAction::Lost { .. })));
    }

    #[test]
    fn graceful_termination() {
        let t0 = Instant::now();
        let mut session = ready_session(t0);

        let frame = session.begin_termination(t0).unwrap();
        assert_eq!(frame.message_type(), Some(MessageType::TerminateSession));
        assert_eq!(session.state(), SessionState::ShuttingDown);

        session.terminated();
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn next_frame_requires_ready() {
        let t0 = Instant::now();
        let mut session = SessionController::new(t0, SessionConfig::default());

        let result = session.next_frame(MessageType::CallRequest, Bytes::new(), t0);
        assert!(matches!(result, Err(SessionError::InvalidState { .. })));
    }

    proptest! {
        #[test]
        fn minted_sequences_are_strictly_monotonic(count in 1usize..64) {
            let t0 = Instant::now();
            let mut session = ready_session(t0);

            let mut previous = session.out_seq();
            for _ in 0..count {
                let frame =
                    session.next_frame(MessageType::CallRequest, Bytes::new(), t0).unwrap();
                prop_assert!(frame.header.sequence_num() > previous);
                prop_assert_eq!(frame.header.session_id(), session.session_id());
                previous = frame.header.sequence_num();
            }
        }

        #[test]
        fn replies_never_advance_the_counter(sequence in any::<u32>()) {
            let t0 = Instant::now();
            let mut session = ready_session(t0);

            let before = session.out_seq();
            let reply =
                session.reply_frame(MessageType::CallbackResponse, Bytes::new(), sequence, t0);
            prop_assert_eq!(reply.header.sequence_num(), sequence);
            prop_assert_eq!(session.out_seq(), before);
        }
    }
}
