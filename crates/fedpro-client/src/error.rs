//! Error types for the FedPro client engine.
//!
//! Three layers: [`TransportError`] for socket failures, [`RtiException`]
//! for RTI-side exceptions decoded from `ExceptionData` responses, and
//! [`RtiError`] as the unified error surfaced by the ambassador façade.
//! RTI exceptions leave the session live; transport and session failures
//! are fatal and are followed by teardown plus a `connectionLost` callback.

use std::time::Duration;

use fedpro_core::SessionError;
use fedpro_proto::{ProtocolError, payloads::calls::ExceptionData};
use thiserror::Error;

/// Errors from the framed TCP transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No transport is open.
    #[error("not connected")]
    NotConnected,

    /// Peer closed the connection.
    #[error("connection closed by peer")]
    Closed,

    /// No complete frame arrived within the deadline.
    #[error("read timed out after {elapsed:?}")]
    Timeout {
        /// The deadline that elapsed.
        elapsed: Duration,
    },

    /// Underlying socket failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed frame on the wire.
    #[error("framing error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl TransportError {
    /// Returns true if this error leaves the connection usable.
    ///
    /// Only a between-frames timeout is recoverable; everything else means
    /// the stream is gone or desynchronized.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Typed RTI-side exception, decoded from an `ExceptionData` response.
///
/// One variant per HLA exception name; each carries the diagnostic string
/// supplied by the RTI. Unrecognized names land in [`RtiException::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[expect(missing_docs, reason = "variant names are the HLA exception names")]
pub enum RtiException {
    #[error("FederationExecutionAlreadyExists: {0}")]
    FederationExecutionAlreadyExists(String),
    #[error("FederationExecutionDoesNotExist: {0}")]
    FederationExecutionDoesNotExist(String),
    #[error("FederateAlreadyExecutionMember: {0}")]
    FederateAlreadyExecutionMember(String),
    #[error("FederateNotExecutionMember: {0}")]
    FederateNotExecutionMember(String),
    #[error("FederatesCurrentlyJoined: {0}")]
    FederatesCurrentlyJoined(String),
    #[error("NameNotFound: {0}")]
    NameNotFound(String),
    #[error("AttributeNotDefined: {0}")]
    AttributeNotDefined(String),
    #[error("ObjectClassNotDefined: {0}")]
    ObjectClassNotDefined(String),
    #[error("ObjectClassNotPublished: {0}")]
    ObjectClassNotPublished(String),
    #[error("InteractionClassNotDefined: {0}")]
    InteractionClassNotDefined(String),
    #[error("InteractionClassNotPublished: {0}")]
    InteractionClassNotPublished(String),
    #[error("InteractionParameterNotDefined: {0}")]
    InteractionParameterNotDefined(String),
    #[error("ObjectInstanceNotKnown: {0}")]
    ObjectInstanceNotKnown(String),
    #[error("ObjectInstanceNameNotReserved: {0}")]
    ObjectInstanceNameNotReserved(String),
    #[error("ObjectInstanceNameInUse: {0}")]
    ObjectInstanceNameInUse(String),
    #[error("IllegalName: {0}")]
    IllegalName(String),
    #[error("DeletePrivilegeNotHeld: {0}")]
    DeletePrivilegeNotHeld(String),
    #[error("InvalidObjectClassHandle: {0}")]
    InvalidObjectClassHandle(String),
    #[error("InvalidInteractionClassHandle: {0}")]
    InvalidInteractionClassHandle(String),
    #[error("InvalidResignAction: {0}")]
    InvalidResignAction(String),
    #[error("OwnershipAcquisitionPending: {0}")]
    OwnershipAcquisitionPending(String),
    #[error("FederateOwnsAttributes: {0}")]
    FederateOwnsAttributes(String),
    #[error("CallNotAllowedFromWithinCallback: {0}")]
    CallNotAllowedFromWithinCallback(String),
    #[error("SaveInProgress: {0}")]
    SaveInProgress(String),
    #[error("RestoreInProgress: {0}")]
    RestoreInProgress(String),
    #[error("NotConnected: {0}")]
    NotConnected(String),
    #[error("AlreadyConnected: {0}")]
    AlreadyConnected(String),
    #[error("ConnectionFailed: {0}")]
    ConnectionFailed(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("UnsupportedCallbackModel: {0}")]
    UnsupportedCallbackModel(String),
    #[error("CouldNotCreateLogicalTimeFactory: {0}")]
    CouldNotCreateLogicalTimeFactory(String),
    #[error("CouldNotOpenFOM: {0}")]
    CouldNotOpenFom(String),
    #[error("ErrorReadingFOM: {0}")]
    ErrorReadingFom(String),
    #[error("InconsistentFOM: {0}")]
    InconsistentFom(String),
    #[error("InvalidFOM: {0}")]
    InvalidFom(String),
    #[error("RTIinternalError: {0}")]
    RtiInternalError(String),
    /// Exception name outside the known set.
    #[error("{name}: {description}")]
    Other {
        /// Exception name as sent by the RTI.
        name: String,
        /// Diagnostic description.
        description: String,
    },
}

impl From<ExceptionData> for RtiException {
    fn from(data: ExceptionData) -> Self {
        let description = data.exception_description;
        match data.exception_name.as_str() {
            "FederationExecutionAlreadyExists" => {
                Self::FederationExecutionAlreadyExists(description)
            },
            "FederationExecutionDoesNotExist" => {
                Self::FederationExecutionDoesNotExist(description)
            },
            "FederateAlreadyExecutionMember" => Self::FederateAlreadyExecutionMember(description),
            "FederateNotExecutionMember" => Self::FederateNotExecutionMember(description),
            "FederatesCurrentlyJoined" => Self::FederatesCurrentlyJoined(description),
            "NameNotFound" => Self::NameNotFound(description),
            "AttributeNotDefined" => Self::AttributeNotDefined(description),
            "ObjectClassNotDefined" => Self::ObjectClassNotDefined(description),
            "ObjectClassNotPublished" => Self::ObjectClassNotPublished(description),
            "InteractionClassNotDefined" => Self::InteractionClassNotDefined(description),
            "InteractionClassNotPublished" => Self::InteractionClassNotPublished(description),
            "InteractionParameterNotDefined" => {
                Self::InteractionParameterNotDefined(description)
            },
            "ObjectInstanceNotKnown" => Self::ObjectInstanceNotKnown(description),
            "ObjectInstanceNameNotReserved" => Self::ObjectInstanceNameNotReserved(description),
            "ObjectInstanceNameInUse" => Self::ObjectInstanceNameInUse(description),
            "IllegalName" => Self::IllegalName(description),
            "DeletePrivilegeNotHeld" => Self::DeletePrivilegeNotHeld(description),
            "InvalidObjectClassHandle" => Self::InvalidObjectClassHandle(description),
            "InvalidInteractionClassHandle" => Self::InvalidInteractionClassHandle(description),
            "InvalidResignAction" => Self::InvalidResignAction(description),
            "OwnershipAcquisitionPending" => Self::OwnershipAcquisitionPending(description),
            "FederateOwnsAttributes" => Self::FederateOwnsAttributes(description),
            "CallNotAllowedFromWithinCallback" => {
                Self::CallNotAllowedFromWithinCallback(description)
            },
            "SaveInProgress" => Self::SaveInProgress(description),
            "RestoreInProgress" => Self::RestoreInProgress(description),
            "NotConnected" => Self::NotConnected(description),
            "AlreadyConnected" => Self::AlreadyConnected(description),
            "ConnectionFailed" => Self::ConnectionFailed(description),
            "Unauthorized" => Self::Unauthorized(description),
            "UnsupportedCallbackModel" => Self::UnsupportedCallbackModel(description),
            "CouldNotCreateLogicalTimeFactory" => {
                Self::CouldNotCreateLogicalTimeFactory(description)
            },
            "CouldNotOpenFOM" => Self::CouldNotOpenFom(description),
            "ErrorReadingFOM" => Self::ErrorReadingFom(description),
            "InconsistentFOM" => Self::InconsistentFom(description),
            "InvalidFOM" => Self::InvalidFom(description),
            "RTIinternalError" => Self::RtiInternalError(description),
            _ => Self::Other { name: data.exception_name, description },
        }
    }
}

/// Unified error surfaced by the ambassador façade.
#[derive(Debug, Error)]
pub enum RtiError {
    /// No live session; only a fresh `connect` recovers.
    #[error("not connected")]
    NotConnected,

    /// A session is already established.
    #[error("already connected")]
    AlreadyConnected,

    /// Transport failure; fatal to the session.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Session-layer failure; fatal to the session.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Framing or payload codec failure; fatal to the session.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The synchronous call did not complete within its timeout. The
    /// session remains usable.
    #[error("call timed out after {elapsed:?}")]
    Timeout {
        /// Timeout that elapsed.
        elapsed: Duration,
    },

    /// `updateAttributeValues` was invoked with an empty value map; no
    /// frame was emitted.
    #[error("no attributes provided")]
    NoAttributesProvided,

    /// An HLA call was issued while a callback was being dispatched.
    #[error("HLA calls are not allowed from within a callback")]
    CallNotAllowedFromWithinCallback,

    /// The matched response carried a variant the service cannot accept.
    #[error("unexpected response variant: tag {actual}")]
    UnexpectedResponse {
        /// Tag actually received.
        actual: u32,
    },

    /// Typed RTI-side exception. The session remains live.
    #[error("RTI exception: {0}")]
    Rti(#[from] RtiException),
}

impl RtiError {
    /// Returns true if this error tears the session down.
    ///
    /// Fatal errors are followed by a `connectionLost` delivery to the
    /// federate ambassador and a transport teardown; non-fatal errors
    /// (timeouts, RTI exceptions, local argument checks) leave the session
    /// live.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Transport(transport) => !transport.is_timeout(),
            Self::Session(session) => session.is_fatal(),
            Self::Protocol(_) => true,
            Self::NotConnected
            | Self::AlreadyConnected
            | Self::Timeout { .. }
            | Self::NoAttributesProvided
            | Self::CallNotAllowedFromWithinCallback
            | Self::UnexpectedResponse { .. }
            | Self::Rti(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exception_names_map_to_variants() {
        let data = ExceptionData {
            exception_name: "FederationExecutionAlreadyExists".to_string(),
            exception_description: "X exists".to_string(),
        };
        assert_eq!(
            RtiException::from(data),
            RtiException::FederationExecutionAlreadyExists("X exists".to_string())
        );

        let data = ExceptionData {
            exception_name: "RTIinternalError".to_string(),
            exception_description: String::new(),
        };
        assert_eq!(RtiException::from(data), RtiException::RtiInternalError(String::new()));
    }

    #[test]
    fn unknown_exception_names_are_preserved() {
        let data = ExceptionData {
            exception_name: "SomeVendorException".to_string(),
            exception_description: "detail".to_string(),
        };
        assert_eq!(
            RtiException::from(data),
            RtiException::Other {
                name: "SomeVendorException".to_string(),
                description: "detail".to_string(),
            }
        );
    }

    #[test]
    fn fatality_classification() {
        assert!(!RtiError::Timeout { elapsed: Duration::from_secs(10) }.is_fatal());
        assert!(!RtiError::NoAttributesProvided.is_fatal());
        assert!(!RtiError::Rti(RtiException::NameNotFound(String::new())).is_fatal());
        assert!(RtiError::Transport(TransportError::Closed).is_fatal());
        assert!(
            !RtiError::Transport(TransportError::Timeout {
                elapsed: Duration::from_secs(1)
            })
            .is_fatal()
        );
        assert!(RtiError::Session(SessionError::SessionTerminated).is_fatal());
        assert!(
            RtiError::Protocol(ProtocolError::UnknownMessageType(42)).is_fatal()
        );
    }
}
