//! FedPro session layer.
//!
//! Pure state machine for one FedPro session: the new-session handshake,
//! sequence-number minting, heartbeat deadlines, and graceful termination.
//! No I/O happens here; the client crate owns the socket and feeds frames
//! and time in.
//!
//! # Components
//!
//! - [`SessionController`]: the per-connection state machine
//! - [`SessionConfig`] / [`SessionAction`]: configuration and tick results
//! - [`SessionError`]: session error taxonomy

mod error;
mod session;

pub use error::SessionError;
pub use session::{
    DEFAULT_HEARTBEAT_INTERVAL, DEFAULT_HEARTBEAT_TIMEOUT, SessionAction, SessionConfig,
    SessionController, SessionState,
};
