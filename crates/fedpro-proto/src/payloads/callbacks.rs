//! The `CallbackRequest` and `CallbackResponse` unions (RTI → federate).
//!
//! Callbacks flow from the RTI to the federate and are answered with a
//! `CallbackResponse` echoing the inbound sequence number. Two variants,
//! `ConnectionLost` and `FederateResigned`, double as fatal session
//! signals.

use serde::{Deserialize, Serialize};

use bytes::Bytes;

use crate::{
    errors::{ProtocolError, Result},
    handles::{
        AttributeHandleValueMap, FederateHandle, FederationExecutionInformation,
        FederationExecutionMemberInformation, InteractionClassHandle, ObjectClassHandle,
        ObjectInstanceHandle, ParameterHandleValueMap, TransportationTypeHandle,
    },
    payloads::{decode_body, encode_tag_only, encode_tagged, split_tag, tags},
};

/// Body of the `connectionLost` callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionLost {
    /// Description of the fault that severed the connection.
    pub fault_description: String,
}

/// Body of the `reportFederationExecutions` callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFederationExecutions {
    /// Known federation executions.
    pub report: Vec<FederationExecutionInformation>,
}

/// Body of the `reportFederationExecutionMembers` callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFederationExecutionMembers {
    /// Federation execution the report describes.
    pub federation_execution_name: String,
    /// Member federates of the execution.
    pub report: Vec<FederationExecutionMemberInformation>,
}

/// Body of the `reportFederationExecutionDoesNotExist` callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFederationExecutionDoesNotExist {
    /// The queried name that matched no execution.
    pub federation_execution_name: String,
}

/// Body of the `federateResigned` callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederateResigned {
    /// Reason the federate was resigned.
    pub reason_for_resign_description: String,
}

/// Body of the object-instance name-reservation outcome callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInstanceNameReservation {
    /// The name whose reservation was decided.
    pub object_instance_name: String,
}

/// Body of the `discoverObjectInstance` callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverObjectInstance {
    /// Handle of the discovered instance.
    pub object_instance: ObjectInstanceHandle,
    /// Class of the discovered instance.
    pub object_class: ObjectClassHandle,
    /// Name of the discovered instance.
    pub object_instance_name: String,
    /// Federate that registered the instance.
    pub producing_federate: FederateHandle,
}

/// Body of the `removeObjectInstance` callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveObjectInstance {
    /// Handle of the removed instance.
    pub object_instance: ObjectInstanceHandle,
    /// Opaque user tag attached to the deletion.
    pub user_supplied_tag: Vec<u8>,
    /// Federate that deleted the instance.
    pub producing_federate: FederateHandle,
}

/// Body of the `reflectAttributeValues` callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectAttributeValues {
    /// Instance whose attributes changed.
    pub object_instance: ObjectInstanceHandle,
    /// Updated attribute handle to encoded-value map.
    pub attribute_values: AttributeHandleValueMap,
    /// Opaque user tag attached to the update.
    pub user_supplied_tag: Vec<u8>,
    /// Transport the update was delivered over.
    pub transportation_type: TransportationTypeHandle,
    /// Federate that produced the update.
    pub producing_federate: FederateHandle,
}

/// Body of the `receiveInteraction` callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveInteraction {
    /// Interaction class that was sent.
    pub interaction_class: InteractionClassHandle,
    /// Parameter handle to encoded-value map.
    pub parameter_values: ParameterHandleValueMap,
    /// Opaque user tag attached to the send.
    pub user_supplied_tag: Vec<u8>,
    /// Transport the interaction was delivered over.
    pub transportation_type: TransportationTypeHandle,
    /// Federate that sent the interaction.
    pub producing_federate: FederateHandle,
}

/// The `CallbackRequest` union: one variant per federate-ambassador
/// callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackRequest {
    /// The RTI-side connection failed.
    ConnectionLost(ConnectionLost),
    /// Report of known federation executions.
    ReportFederationExecutions(ReportFederationExecutions),
    /// Report of one execution's member federates.
    ReportFederationExecutionMembers(ReportFederationExecutionMembers),
    /// A queried federation execution does not exist.
    ReportFederationExecutionDoesNotExist(ReportFederationExecutionDoesNotExist),
    /// This federate was resigned.
    FederateResigned(FederateResigned),
    /// A name reservation succeeded.
    ObjectInstanceNameReservationSucceeded(ObjectInstanceNameReservation),
    /// A name reservation failed.
    ObjectInstanceNameReservationFailed(ObjectInstanceNameReservation),
    /// A remote object instance was discovered.
    DiscoverObjectInstance(DiscoverObjectInstance),
    /// A known object instance was removed.
    RemoveObjectInstance(RemoveObjectInstance),
    /// Attribute values of a known instance were updated.
    ReflectAttributeValues(ReflectAttributeValues),
    /// An interaction was delivered.
    ReceiveInteraction(ReceiveInteraction),
}

impl CallbackRequest {
    /// Field-number tag of the populated variant.
    #[must_use]
    pub const fn tag(&self) -> u32 {
        match self {
            Self::ConnectionLost(_) => tags::callback::CONNECTION_LOST,
            Self::ReportFederationExecutions(_) => tags::callback::REPORT_FEDERATION_EXECUTIONS,
            Self::ReportFederationExecutionMembers(_) => {
                tags::callback::REPORT_FEDERATION_EXECUTION_MEMBERS
            },
            Self::ReportFederationExecutionDoesNotExist(_) => {
                tags::callback::REPORT_FEDERATION_EXECUTION_DOES_NOT_EXIST
            },
            Self::FederateResigned(_) => tags::callback::FEDERATE_RESIGNED,
            Self::ObjectInstanceNameReservationSucceeded(_) => {
                tags::callback::OBJECT_INSTANCE_NAME_RESERVATION_SUCCEEDED
            },
            Self::ObjectInstanceNameReservationFailed(_) => {
                tags::callback::OBJECT_INSTANCE_NAME_RESERVATION_FAILED
            },
            Self::DiscoverObjectInstance(_) => tags::callback::DISCOVER_OBJECT_INSTANCE,
            Self::RemoveObjectInstance(_) => tags::callback::REMOVE_OBJECT_INSTANCE,
            Self::ReflectAttributeValues(_) => tags::callback::REFLECT_ATTRIBUTE_VALUES,
            Self::ReceiveInteraction(_) => tags::callback::RECEIVE_INTERACTION,
        }
    }

    /// Callback name for log messages.
    #[must_use]
    pub const fn callback_name(&self) -> &'static str {
        match self {
            Self::ConnectionLost(_) => "connectionLost",
            Self::ReportFederationExecutions(_) => "reportFederationExecutions",
            Self::ReportFederationExecutionMembers(_) => "reportFederationExecutionMembers",
            Self::ReportFederationExecutionDoesNotExist(_) => {
                "reportFederationExecutionDoesNotExist"
            },
            Self::FederateResigned(_) => "federateResigned",
            Self::ObjectInstanceNameReservationSucceeded(_) => {
                "objectInstanceNameReservationSucceeded"
            },
            Self::ObjectInstanceNameReservationFailed(_) => {
                "objectInstanceNameReservationFailed"
            },
            Self::DiscoverObjectInstance(_) => "discoverObjectInstance",
            Self::RemoveObjectInstance(_) => "removeObjectInstance",
            Self::ReflectAttributeValues(_) => "reflectAttributeValues",
            Self::ReceiveInteraction(_) => "receiveInteraction",
        }
    }

    /// Whether this callback doubles as a fatal session signal.
    #[must_use]
    pub const fn is_fatal_signal(&self) -> bool {
        matches!(self, Self::ConnectionLost(_) | Self::FederateResigned(_))
    }

    /// Encode to envelope payload bytes: 4-byte tag + CBOR body.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::CborEncode` if body serialization fails
    pub fn encode(&self) -> Result<Bytes> {
        match self {
            Self::ConnectionLost(body) => encode_tagged(self.tag(), body),
            Self::ReportFederationExecutions(body) => encode_tagged(self.tag(), body),
            Self::ReportFederationExecutionMembers(body) => encode_tagged(self.tag(), body),
            Self::ReportFederationExecutionDoesNotExist(body) => encode_tagged(self.tag(), body),
            Self::FederateResigned(body) => encode_tagged(self.tag(), body),
            Self::ObjectInstanceNameReservationSucceeded(body) => {
                encode_tagged(self.tag(), body)
            },
            Self::ObjectInstanceNameReservationFailed(body) => encode_tagged(self.tag(), body),
            Self::DiscoverObjectInstance(body) => encode_tagged(self.tag(), body),
            Self::RemoveObjectInstance(body) => encode_tagged(self.tag(), body),
            Self::ReflectAttributeValues(body) => encode_tagged(self.tag(), body),
            Self::ReceiveInteraction(body) => encode_tagged(self.tag(), body),
        }
    }

    /// Decode from envelope payload bytes.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::ShortPayload` if the tag prefix is missing
    /// - `ProtocolError::UnknownTag` for tags outside the union
    /// - `ProtocolError::CborDecode` if the body does not match the variant
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let (tag, body) = split_tag(payload)?;
        match tag {
            tags::callback::CONNECTION_LOST => Ok(Self::ConnectionLost(decode_body(body)?)),
            tags::callback::REPORT_FEDERATION_EXECUTIONS => {
                Ok(Self::ReportFederationExecutions(decode_body(body)?))
            },
            tags::callback::REPORT_FEDERATION_EXECUTION_MEMBERS => {
                Ok(Self::ReportFederationExecutionMembers(decode_body(body)?))
            },
            tags::callback::REPORT_FEDERATION_EXECUTION_DOES_NOT_EXIST => {
                Ok(Self::ReportFederationExecutionDoesNotExist(decode_body(body)?))
            },
            tags::callback::FEDERATE_RESIGNED => Ok(Self::FederateResigned(decode_body(body)?)),
            tags::callback::OBJECT_INSTANCE_NAME_RESERVATION_SUCCEEDED => {
                Ok(Self::ObjectInstanceNameReservationSucceeded(decode_body(body)?))
            },
            tags::callback::OBJECT_INSTANCE_NAME_RESERVATION_FAILED => {
                Ok(Self::ObjectInstanceNameReservationFailed(decode_body(body)?))
            },
            tags::callback::DISCOVER_OBJECT_INSTANCE => {
                Ok(Self::DiscoverObjectInstance(decode_body(body)?))
            },
            tags::callback::REMOVE_OBJECT_INSTANCE => {
                Ok(Self::RemoveObjectInstance(decode_body(body)?))
            },
            tags::callback::REFLECT_ATTRIBUTE_VALUES => {
                Ok(Self::ReflectAttributeValues(decode_body(body)?))
            },
            tags::callback::RECEIVE_INTERACTION => {
                Ok(Self::ReceiveInteraction(decode_body(body)?))
            },
            other => Err(ProtocolError::UnknownTag { union: "CallbackRequest", tag: other }),
        }
    }
}

/// The `CallbackResponse` union: per-callback delivery outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackResponse {
    /// The ambassador handler returned normally.
    Succeeded,
    /// The ambassador handler raised; delivery failed.
    Failed,
}

impl CallbackResponse {
    /// Build a response from a handler outcome.
    #[must_use]
    pub fn from_outcome(succeeded: bool) -> Self {
        if succeeded { Self::Succeeded } else { Self::Failed }
    }

    /// Whether the callback was handled successfully.
    #[must_use]
    pub const fn succeeded(self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Field-number tag of the variant.
    #[must_use]
    pub const fn tag(self) -> u32 {
        match self {
            Self::Succeeded => tags::callback_response::CALLBACK_SUCCEEDED,
            Self::Failed => tags::callback_response::CALLBACK_FAILED,
        }
    }

    /// Encode to envelope payload bytes (tag only; no body).
    #[must_use]
    pub fn encode(self) -> Bytes {
        encode_tag_only(self.tag())
    }

    /// Decode from envelope payload bytes.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::ShortPayload` if the tag prefix is missing
    /// - `ProtocolError::UnknownTag` for tags outside the union
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let (tag, _body) = split_tag(payload)?;
        match tag {
            tags::callback_response::CALLBACK_SUCCEEDED => Ok(Self::Succeeded),
            tags::callback_response::CALLBACK_FAILED => Ok(Self::Failed),
            other => Err(ProtocolError::UnknownTag { union: "CallbackResponse", tag: other }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handles::AttributeHandle;

    #[test]
    fn callback_round_trip() {
        let callbacks = vec![
            CallbackRequest::ConnectionLost(ConnectionLost {
                fault_description: "heartbeat timeout".to_string(),
            }),
            CallbackRequest::DiscoverObjectInstance(DiscoverObjectInstance {
                object_instance: ObjectInstanceHandle::new(vec![0x01]),
                object_class: ObjectClassHandle::new(vec![0xAB]),
                object_instance_name: "Aircraft_1".to_string(),
                producing_federate: FederateHandle::new(vec![0x10]),
            }),
            CallbackRequest::ReflectAttributeValues(ReflectAttributeValues {
                object_instance: ObjectInstanceHandle::new(vec![0x01]),
                attribute_values: [(AttributeHandle::new(vec![0x07]), vec![0, 0, 0, 5])]
                    .into_iter()
                    .collect(),
                user_supplied_tag: Vec::new(),
                transportation_type: TransportationTypeHandle::new(vec![0x02]),
                producing_federate: FederateHandle::new(vec![0x10]),
            }),
            CallbackRequest::ReportFederationExecutions(ReportFederationExecutions {
                report: vec![FederationExecutionInformation {
                    federation_execution_name: "MAKsimple".to_string(),
                    logical_time_implementation_name: "HLAfloat64Time".to_string(),
                }],
            }),
        ];

        for callback in callbacks {
            let payload = callback.encode().expect("should encode");
            let decoded = CallbackRequest::decode(&payload).expect("should decode");
            assert_eq!(callback, decoded);
        }
    }

    #[test]
    fn fatal_signals_are_flagged() {
        let lost = CallbackRequest::ConnectionLost(ConnectionLost {
            fault_description: String::new(),
        });
        let resigned = CallbackRequest::FederateResigned(FederateResigned {
            reason_for_resign_description: String::new(),
        });
        let discover = CallbackRequest::ObjectInstanceNameReservationSucceeded(
            ObjectInstanceNameReservation { object_instance_name: "x".to_string() },
        );

        assert!(lost.is_fatal_signal());
        assert!(resigned.is_fatal_signal());
        assert!(!discover.is_fatal_signal());
    }

    #[test]
    fn callback_response_round_trip() {
        for response in [CallbackResponse::Succeeded, CallbackResponse::Failed] {
            let payload = response.encode();
            assert_eq!(CallbackResponse::decode(&payload), Ok(response));
        }
        assert!(CallbackResponse::from_outcome(true).succeeded());
        assert!(!CallbackResponse::from_outcome(false).succeeded());
    }
}
